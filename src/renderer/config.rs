//! Configuration for string serialization

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a serializer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration options for string output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SerializeConfig {
    /// Write childless void elements as `<input/>` instead of `<input>`
    pub self_close_void: bool,

    /// Escape dynamic text and attribute values
    pub escape_dynamic: bool,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            self_close_void: false,
            escape_dynamic: true,
        }
    }
}

impl SerializeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set whether void elements self-close
    pub fn with_self_close_void(mut self, self_close: bool) -> Self {
        self.self_close_void = self_close;
        self
    }

    /// Set whether dynamic values are escaped
    pub fn with_escape_dynamic(mut self, escape: bool) -> Self {
        self.escape_dynamic = escape;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SerializeConfig::default();
        assert!(!config.self_close_void);
        assert!(config.escape_dynamic);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SerializeConfig::new()
            .with_self_close_void(true)
            .with_escape_dynamic(false);

        assert!(config.self_close_void);
        assert!(!config.escape_dynamic);
    }

    #[test]
    fn test_parse_toml_partial() {
        let config = SerializeConfig::from_toml_str("self-close-void = true").unwrap();
        assert_eq!(config, SerializeConfig::new().with_self_close_void(true));
    }

    #[test]
    fn test_parse_toml_empty() {
        let config = SerializeConfig::from_toml_str("").unwrap();
        assert_eq!(config, SerializeConfig::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = SerializeConfig::from_toml_str("escape-dynamic = \"yes\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));

        let result = SerializeConfig::from_toml_str("this is not valid toml {{{{");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_error() {
        let result = SerializeConfig::from_file(Path::new("/nonexistent/slotted.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
