//! Validation for topic and message type names.

use crate::error::{LogError, Result};

/// Validates a topic name before it is recorded.
///
/// A topic must be non-empty, must not be just `/`, and must not contain
/// whitespace, `@`, `~` or an empty path segment (`//`).
///
/// # Examples
///
/// ```
/// use transport_log::compute::validation::validate_topic;
///
/// assert!(validate_topic("/robot/pose").is_ok());
/// assert!(validate_topic("/robot pose").is_err());
/// assert!(validate_topic("").is_err());
/// ```
pub fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(LogError::InvalidInput("Topic name must not be empty".into()));
    }

    if topic == "/" {
        return Err(LogError::InvalidInput(
            "Topic name must not be the root \"/\"".into(),
        ));
    }

    if let Some(c) = topic.chars().find(|c| c.is_whitespace() || *c == '@' || *c == '~') {
        return Err(LogError::InvalidInput(format!(
            "Topic name contains invalid character {:?}: {}",
            c, topic
        )));
    }

    if topic.contains("//") {
        return Err(LogError::InvalidInput(format!(
            "Topic name contains an empty segment: {}",
            topic
        )));
    }

    Ok(())
}

/// Validates a message type name.
pub fn validate_type_name(message_type: &str) -> Result<()> {
    if message_type.is_empty() {
        return Err(LogError::InvalidInput(
            "Message type name must not be empty".into(),
        ));
    }

    if message_type.chars().any(char::is_whitespace) {
        return Err(LogError::InvalidInput(format!(
            "Message type name contains whitespace: {:?}",
            message_type
        )));
    }

    Ok(())
}
