//! # Configuration
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. TOML file: the `--config` path, or `gradebook.toml` in the working
//!    directory when it exists
//! 3. Environment: `GRADEBOOK_DATA`, `GRADEBOOK_LOG_FORMAT`
//! 4. Command-line flags (`--data`, `--json`), applied by the caller
//!
//! ```toml
//! data_file = "records/gradebook.json"
//! log_format = "json"
//! output = "text"
//! ```

use gradebook_core::primitives::DEFAULT_DATA_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gradebook.toml";

/// Environment variable overriding the data file path.
pub const ENV_DATA: &str = "GRADEBOOK_DATA";

/// Environment variable overriding the log format.
pub const ENV_LOG_FORMAT: &str = "GRADEBOOK_LOG_FORMAT";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid {key} value `{value}` (expected: {expected})")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

// =============================================================================
// FORMATS
// =============================================================================

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "log_format",
                value: s.to_string(),
                expected: "text, json",
            }),
        }
    }
}

/// Command output format on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path of the JSON data file.
    pub data_file: PathBuf,
    pub log_format: LogFormat,
    pub output: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_format: LogFormat::default(),
            output: OutputFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load defaults, the config file and the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(explicit, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable environment lookup.
    ///
    /// An explicit config path must exist; the default one is optional.
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(env)?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Override settings from environment variables. Empty values are ignored.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(data) = env(ENV_DATA).filter(|v| !v.is_empty()) {
            self.data_file = PathBuf::from(data);
        }
        if let Some(format) = env(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            self.log_format = format.parse()?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
