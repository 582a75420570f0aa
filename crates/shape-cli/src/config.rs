//! Configuration for the `shape` command
//!
//! Loads configuration from:
//! 1. shape.yaml (or `--config <path>`) - schema location, validation policy, logging
//! 2. .env file - loaded into the environment before anything else
//!
//! Environment variables always override file values.

use serde::{Deserialize, Serialize};
use shape_core::Presence;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "shape.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {message}")]
    InvalidEnvVar { var: String, message: String },
}

/// Where schema definitions live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub path: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("schema.yaml"),
        }
    }
}

/// Validation behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// "defined" (key must exist) or "truthy" (falsy values count as missing)
    pub presence: Presence,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific directives
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stderr, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
            output: "stderr".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema: SchemaConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.with_env_overrides()
    }

    /// Load `path` if given, else `shape.yaml` when it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Config::default().with_env_overrides(),
        }
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SHAPE_SCHEMA") {
            self.schema.path = PathBuf::from(path);
        }
        if let Some(presence) = lookup("SHAPE_PRESENCE") {
            self.validation.presence =
                presence
                    .parse()
                    .map_err(|e: shape_core::ParsePresenceError| ConfigError::InvalidEnvVar {
                        var: "SHAPE_PRESENCE".to_string(),
                        message: e.to_string(),
                    })?;
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(output) = lookup("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.directory = dir;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema.path, PathBuf::from("schema.yaml"));
        assert_eq!(config.validation.presence, Presence::Defined);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.logging.output, "stderr");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("validation:\n  presence: truthy\n").unwrap();
        assert_eq!(config.validation.presence, Presence::Truthy);
        assert_eq!(config.schema.path, PathBuf::from("schema.yaml"));
        assert_eq!(config.logging.directory, "./logs");
    }

    #[test]
    fn test_env_var_override() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SHAPE_SCHEMA", "/tmp/override.yaml"),
            ("SHAPE_PRESENCE", "truthy"),
            ("LOG_DIR", "/var/log/shape"),
        ]);

        let config_yaml = r#"
schema:
  path: "schema.yaml"
validation:
  presence: defined
logging:
  level: "info"
  format: "pretty"
  output: "stderr"
  directory: "./logs"
"#;
        let config: Config = serde_yaml::from_str(config_yaml).unwrap();
        let config = config
            .with_overrides(|var| env.get(var).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.schema.path, PathBuf::from("/tmp/override.yaml"));
        assert_eq!(config.validation.presence, Presence::Truthy);
        assert_eq!(config.logging.directory, "/var/log/shape");
        assert_eq!(config.logging.format, "pretty"); // Not overridden
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_presence_override() {
        let err = Config::default()
            .with_overrides(|var| (var == "SHAPE_PRESENCE").then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { var, .. } if var == "SHAPE_PRESENCE"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
