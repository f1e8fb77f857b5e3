use crate::time::Time;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One recorded publication.
///
/// A message owns its payload and names: the constructor copies the caller's
/// buffers, so they may be reused as soon as it returns. The payload is opaque
/// bytes and may contain zero bytes; decoding it is up to whoever knows the
/// type named by [`message_type`](Self::message_type).
///
/// # Examples
///
/// ```
/// use transport_log_types::Message;
/// use std::time::Duration;
///
/// let mut buffer = b"a\0b".to_vec();
/// let msg = Message::new(Duration::from_nanos(10), &buffer, "ign_msgs.StringMsg", "/chatter");
/// buffer.clear();
///
/// assert_eq!(msg.data(), b"a\0b");
/// assert_eq!(msg.topic(), "/chatter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "time_received_ns", with = "crate::time::nanos")]
    time_received: Time,
    data: Bytes,
    message_type: String,
    topic: String,
}

impl Message {
    pub fn new(
        time_received: Time,
        data: impl AsRef<[u8]>,
        message_type: impl AsRef<str>,
        topic: impl AsRef<str>,
    ) -> Self {
        Self {
            time_received,
            data: Bytes::copy_from_slice(data.as_ref()),
            message_type: message_type.as_ref().to_owned(),
            topic: topic.as_ref().to_owned(),
        }
    }

    /// The serialized payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    /// Name of the message type the payload encodes.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Topic the message was published on.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn time_received(&self) -> Time {
        self.time_received
    }

    /// Split into `(time_received, data, message_type, topic)`.
    pub fn into_parts(self) -> (Time, Bytes, String, String) {
        (self.time_received, self.data, self.message_type, self.topic)
    }
}
