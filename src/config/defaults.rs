//! Default configuration values for Module-Bridge

use crate::core::types::PointerFormat;
use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub bridge: BridgeDefaults,
    pub provider: ProviderDefaults,
    pub logging: LoggingDefaults,
}

/// Default bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeDefaults {
    pub pointer_format: PointerFormat,
}

/// Default provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDefaults {
    pub snapshot: Option<String>,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub file: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        bridge: BridgeDefaults {
            pointer_format: PointerFormat::Compact,
        },
        provider: ProviderDefaults { snapshot: None },
        logging: LoggingDefaults {
            level: "info".to_string(),
            file: "module-bridge.log".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_defaults() {
        let config = default_config();
        assert_eq!(config.bridge.pointer_format, PointerFormat::Compact);
        assert!(config.provider.snapshot.is_none());
    }

    #[test]
    fn test_logging_defaults() {
        let config = default_config();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "module-bridge.log");
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("pointer_format = \"compact\""));
        assert!(serialized.contains("level"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.logging.level, config.logging.level);
        assert_eq!(deserialized.bridge.pointer_format, config.bridge.pointer_format);
    }
}
