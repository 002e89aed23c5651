//! Configuration validator for Module-Bridge
//!
//! Validates configuration values before the bridge is built from them.

use super::loader::{Config, ConfigError, LoggingConfig, ProviderConfig};

/// Log levels accepted in `[logging] level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_provider(&config.provider)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates provider configuration
    fn validate_provider(provider: &ProviderConfig) -> Result<(), ConfigError> {
        if let Some(snapshot) = &provider.snapshot {
            if snapshot.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Snapshot path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let level = logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}', expected one of: {}",
                logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if logging.file.is_empty() {
            return Err(ConfigError::Invalid(
                "Log file path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log level 'verbose'"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_log_file() {
        let mut config = Config::default();
        config.logging.file = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_snapshot_path() {
        let mut config = Config::default();
        config.provider.snapshot = Some("  ".to_string());
        assert!(validate_config(&config).is_err());

        config.provider.snapshot = Some("snapshot.json".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
