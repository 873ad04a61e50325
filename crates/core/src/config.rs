//! Generator configuration

use crate::error::{Error, Result};
use crate::types::HeaderVersion;
use serde::{Deserialize, Serialize};

/// Generator configuration, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Header layout version used when the command line does not name one
    pub default_header_version: HeaderVersion,
    /// Capacity of the virtual-dispatch table rendered into each descriptor
    pub vtable_slots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_header_version: HeaderVersion::V29,
            vtable_slots: 32,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_header_version, HeaderVersion::V29);
        assert_eq!(config.vtable_slots, 32);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Config {
            default_header_version: HeaderVersion::V24_1,
            vtable_slots: 255,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.default_header_version, HeaderVersion::V24_1);
        assert_eq!(back.vtable_slots, 255);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let back: Config = serde_json::from_str(r#"{"vtable_slots": 64}"#).unwrap();
        assert_eq!(back.default_header_version, HeaderVersion::V29);
        assert_eq!(back.vtable_slots, 64);
    }
}
