//! Display configuration
//!
//! Plain serde data with baked-in defaults. Hosts load overrides from a JSON
//! document; nothing is read from the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Logical clock units per millisecond
pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Font-size breakpoints by formatted-string length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontTiers {
    /// Longer than this uses the medium tier
    pub medium_above: usize,
    /// Longer than this uses the small tier
    pub small_above: usize,
}

impl Default for FontTiers {
    fn default() -> Self {
        Self {
            medium_above: 11,
            small_above: 15,
        }
    }
}

/// Calculator display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Version of the config format (for future migrations)
    pub version: u32,
    /// Delay before a transient status message reverts
    pub status_revert_ms: u64,
    /// Height of one result line
    pub line_height: f64,
    /// Height of the result viewport
    pub viewport_height: f64,
    pub font_tiers: FontTiers,
}

impl DisplayConfig {
    /// Current version of the config format
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if !(self.line_height > 0.0) {
            return Err(ConfigError::Invalid("line_height must be positive".into()));
        }
        if !(self.viewport_height > 0.0) {
            return Err(ConfigError::Invalid(
                "viewport_height must be positive".into(),
            ));
        }
        if self.font_tiers.small_above <= self.font_tiers.medium_above {
            return Err(ConfigError::Invalid(
                "font_tiers.small_above must exceed font_tiers.medium_above".into(),
            ));
        }
        Ok(())
    }

    /// Revert delay on the logical clock
    pub fn status_revert_ns(&self) -> u64 {
        self.status_revert_ms.saturating_mul(NANOS_PER_MILLI)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            status_revert_ms: 1500,
            line_height: 25.2,
            viewport_height: 75.6,
            font_tiers: FontTiers::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.version, DisplayConfig::CURRENT_VERSION);
        assert_eq!(config.status_revert_ms, 1500);
        assert_eq!(config.status_revert_ns(), 1_500_000_000);
        assert_eq!(config.font_tiers.medium_above, 11);
        assert_eq!(config.font_tiers.small_above, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DisplayConfig::from_json(r#"{"status_revert_ms": 800}"#).unwrap();
        assert_eq!(config.status_revert_ms, 800);
        assert_eq!(config.line_height, 25.2);
        assert_eq!(config.font_tiers, FontTiers::default());
    }

    #[test]
    fn test_round_trip_json() {
        let mut config = DisplayConfig::default();
        config.viewport_height = 100.0;
        let json = config.to_json().unwrap();
        assert_eq!(DisplayConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = DisplayConfig::from_json(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let err = DisplayConfig::from_json(r#"{"line_height": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            DisplayConfig::from_json(r#"{"font_tiers": {"medium_above": 20, "small_above": 15}}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = DisplayConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"viewport_height": 50.4}}"#).unwrap();

        let config = DisplayConfig::load(file.path()).unwrap();
        assert_eq!(config.viewport_height, 50.4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DisplayConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
