//! Configuration management for safeinteract
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.safeinteract/config.toml

use crate::errors::{InteractError, Result};
use crate::interactor::RetryPolicy;
use crate::interactor::retry::{BASE_DELAY_MS, MAX_ATTEMPTS, MAX_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for safeinteract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recovery: RecoveryConfig,
    pub retry: RetryConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// Recovery policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub enabled: bool,
}

/// Flaky-safety retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub recent_events: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: MAX_ATTEMPTS,
            base_delay_ms: BASE_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Backoff policy described by this section
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay_ms: self.base_delay_ms,
            max_delay_ms: self.max_delay_ms,
            jitter: self.jitter,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recent_events: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from specific file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            InteractError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Load configuration from `path`, the standard location, or built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load(config_path);
        }

        match Self::default_path() {
            Some(config_path) if config_path.exists() => Self::load(&config_path),
            _ => Ok(Config::default()),
        }
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml_string()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                InteractError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| InteractError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Write the built-in defaults to `path`, replacing any existing file
    pub fn init_file(path: &Path) -> Result<Self> {
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".safeinteract").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(InteractError::ConfigError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(InteractError::ConfigError(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(InteractError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.recovery.enabled);
        assert!(!config.retry.enabled);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.telemetry.recent_events, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_delays() {
        let mut config = Config::default();
        config.retry.base_delay_ms = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str("[retry]\nenabled = true\nmax_attempts = 3\n").unwrap();
        assert!(config.retry.enabled);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 100);
        assert!(config.recovery.enabled);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[retry\n").unwrap_err();
        assert!(matches!(err, InteractError::TomlParse(_)));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let mut config = Config::default();
        config.retry.jitter = false;
        config.retry.max_delay_ms = 800;
        let policy = config.retry.policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.max_delay_ms, 800);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_toml_string_contains_sections() {
        let text = Config::default().to_toml_string().unwrap();
        assert!(text.contains("[recovery]"));
        assert!(text.contains("[retry]"));
        assert!(text.contains("level = \"info\""));
    }
}
