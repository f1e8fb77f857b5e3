//! Query engine configuration.
//!
//! `Config` is serializable so it can be kept next to a recording as JSON or
//! TOML and loaded by the player.

use crate::error::Result;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which sample to pick when several share the selected time stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First sample recorded at that time stamp.
    #[default]
    Earliest,
    /// Last sample recorded at that time stamp.
    Latest,
}

/// What a query does with a range whose finish precedes its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRangePolicy {
    /// Return an empty batch.
    #[default]
    Empty,
    /// Fail with `LogError::InvalidRange`.
    Reject,
}

/// Query engine configuration
///
/// # Example
///
/// ```rust
/// use transport_log::{Config, InvalidRangePolicy, TieBreak};
///
/// let json = r#"{
///     "tie_break": "latest",
///     "invalid_range_policy": "reject",
///     "max_results": 500
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.tie_break, TieBreak::Latest);
/// assert_eq!(config.invalid_range_policy, InvalidRangePolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Duplicate time stamp resolution for single-instant lookups
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Handling of invalid ranges in `MessageStore::query`
    #[serde(default)]
    pub invalid_range_policy: InvalidRangePolicy,

    /// Upper bound on messages returned by one query (None means unlimited)
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl Config {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_invalid_range_policy(mut self, policy: InvalidRangePolicy) -> Self {
        self.invalid_range_policy = policy;
        self
    }

    /// Cap the number of messages a single query returns.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        assert!(max_results > 0, "Max results must be greater than zero");
        self.max_results = Some(max_results);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_results == Some(0) {
            return Err("Max results must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read configuration from a file. `.toml` files are parsed as TOML,
    /// everything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::parse_toml_file(path, &contents)?
        } else {
            Self::from_json(&contents)?
        };
        log::debug!("Loaded query config from {}", path.display());
        Ok(config)
    }

    #[cfg(feature = "toml")]
    fn parse_toml_file(_path: &Path, contents: &str) -> Result<Self> {
        Ok(Self::from_toml(contents)?)
    }

    #[cfg(not(feature = "toml"))]
    fn parse_toml_file(path: &Path, _contents: &str) -> Result<Self> {
        Err(crate::error::LogError::InvalidConfig(format!(
            "{} is TOML but the toml feature is disabled",
            path.display()
        )))
    }
}
