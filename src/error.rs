//! Error types for the query engine.
//!
//! The core value types never fail; these errors come from validating input,
//! loading configuration and answering queries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    /// The query's time range finishes before it starts.
    #[error("invalid time range: {0}")]
    InvalidRange(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid topic pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
