//! Charm configuration handling for loading and validating charm options.
//!
//! Options arrive as a JSON document with kebab-case keys, matching the
//! option names the operator sees. Values are validated before any file is
//! written or any payload is sent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::overlay::validate_overlay_network_types;

/// Charm configuration that can be saved/loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CharmConfig {
    /// Space-separated overlay network types for tenant networks.
    pub overlay_network_type: String,
}

impl Default for CharmConfig {
    fn default() -> Self {
        Self {
            overlay_network_type: "vlan".to_string(),
        }
    }
}

impl CharmConfig {
    /// Create a new configuration with the default option values
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_overlay_network_types(&self.overlay_network_type)?;
        Ok(())
    }

    /// The validated, comma-joined overlay network type list.
    pub fn overlay_net_types(&self) -> crate::error::Result<String> {
        validate_overlay_network_types(&self.overlay_network_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CharmError;

    #[test]
    fn test_default_config_is_valid() {
        let config = CharmConfig::default();
        assert_eq!(config.overlay_network_type, "vlan");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_overlay_type_fails_validation() {
        let config = CharmConfig {
            overlay_network_type: "vxlan".to_string(),
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CharmError::UnsupportedOverlayType(t) if t == "vxlan"));
    }

    #[test]
    fn test_overlay_net_types_joins_tokens() {
        let config = CharmConfig {
            overlay_network_type: "vlan vlan".to_string(),
        };
        assert_eq!(config.overlay_net_types().unwrap(), "vlan,vlan");
    }

    #[test]
    fn test_kebab_case_keys() {
        let config: CharmConfig =
            serde_json::from_str(r#"{"overlay-network-type": "vlan"}"#).unwrap();
        assert_eq!(config.overlay_network_type, "vlan");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("overlay-network-type"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: CharmConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.overlay_network_type, "vlan");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = CharmConfig {
            overlay_network_type: "vlan vlan".to_string(),
        };
        config.save_to_file(&path).unwrap();

        let loaded = CharmConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.overlay_network_type, config.overlay_network_type);
    }
}
