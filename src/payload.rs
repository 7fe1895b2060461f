//! Plugin configuration payload for the principal relation.
//!
//! The neutron-api principal does not read our plugin files directly: it is
//! told what to load through the subordinate relation. The payload built
//! here carries the fixed plugin identity, the release-specific service
//! plugin list, and a nested configuration mapping the principal merges
//! into its own files.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::profiles::{ML2_CONF, NEUTRON_CONF, ReleaseProfile};

/// Plugin identity handed to the principal, fixed across releases.
pub const NEUTRON_PLUGIN: &str = "ovs";

/// Core plugin class, fixed across releases.
pub const CORE_PLUGIN: &str = "neutron.plugins.ml2.plugin.Ml2Plugin";

/// Principal service the subordinate configuration targets.
pub const PRINCIPAL_SERVICE: &str = "neutron-api";

/// Ordered key/value pairs for one config file section.
pub type SectionEntries = Vec<(String, String)>;

/// Sections to merge into one config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigSections {
    pub sections: BTreeMap<String, SectionEntries>,
}

/// Configuration injected into a downstream service's files.
///
/// Keyed by service name, then file path, then section name. Serializes to
/// the wire shape the principal expects:
/// `{service: {file: {"sections": {SECTION: [[key, value], ...]}}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InjectConfig(pub BTreeMap<String, BTreeMap<String, ConfigSections>>);

impl InjectConfig {
    /// Add a section for a service's config file.
    pub fn insert_section(
        &mut self,
        service: &str,
        file: &str,
        section: &str,
        entries: SectionEntries,
    ) {
        self.0
            .entry(service.to_string())
            .or_default()
            .entry(file.to_string())
            .or_default()
            .sections
            .insert(section.to_string(), entries);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full payload sent across the subordinate relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginConfigPayload {
    pub neutron_plugin: String,
    pub core_plugin: String,
    pub neutron_plugin_config: String,
    pub service_plugins: String,
    pub subordinate_configuration: InjectConfig,
}

impl PluginConfigPayload {
    /// Flatten the payload to relation settings.
    ///
    /// Scalar fields become plain key/value pairs; the nested subordinate
    /// configuration is JSON-encoded, which is how the principal's relation
    /// interface expects it.
    pub fn to_relation_settings(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("neutron-plugin".to_string(), self.neutron_plugin.clone()),
            ("core-plugin".to_string(), self.core_plugin.clone()),
            (
                "neutron-plugin-config".to_string(),
                self.neutron_plugin_config.clone(),
            ),
            (
                "service-plugins".to_string(),
                self.service_plugins.clone(),
            ),
            (
                "subordinate_configuration".to_string(),
                serde_json::to_string(&self.subordinate_configuration)?,
            ),
        ])
    }
}

/// Build the plugin configuration payload for a resolved profile.
///
/// Adds a (currently empty) DEFAULT section for the principal's main
/// configuration file; keys land there as future releases need them.
pub fn build_plugin_configuration(profile: &ReleaseProfile) -> PluginConfigPayload {
    let mut inject = InjectConfig::default();
    inject.insert_section(PRINCIPAL_SERVICE, NEUTRON_CONF, "DEFAULT", Vec::new());

    PluginConfigPayload {
        neutron_plugin: NEUTRON_PLUGIN.to_string(),
        core_plugin: CORE_PLUGIN.to_string(),
        neutron_plugin_config: ML2_CONF.to_string(),
        service_plugins: profile.service_plugins.to_string(),
        subordinate_configuration: inject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::resolve_profile;
    use crate::release::OpenStackRelease;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_fixed_fields_regardless_of_release() {
        for release in OpenStackRelease::iter() {
            let payload = build_plugin_configuration(&resolve_profile(release));
            assert_eq!(payload.neutron_plugin, "ovs");
            assert_eq!(payload.core_plugin, "neutron.plugins.ml2.plugin.Ml2Plugin");
            assert_eq!(
                payload.neutron_plugin_config,
                "/etc/neutron/plugins/ml2/ml2_conf.ini"
            );
        }
    }

    #[test]
    fn test_service_plugins_taken_from_profile() {
        let profile = resolve_profile(OpenStackRelease::Kilo);
        let payload = build_plugin_configuration(&profile);
        assert_eq!(payload.service_plugins, profile.service_plugins);
    }

    #[test]
    fn test_inject_config_wire_shape() {
        let payload = build_plugin_configuration(&resolve_profile(OpenStackRelease::Pike));
        let value = serde_json::to_value(&payload.subordinate_configuration).unwrap();
        assert_eq!(
            value,
            json!({
                "neutron-api": {
                    "/etc/neutron/neutron.conf": {
                        "sections": {"DEFAULT": []}
                    }
                }
            })
        );
    }

    #[test]
    fn test_inject_config_entries_serialize_as_pairs() {
        let mut inject = InjectConfig::default();
        inject.insert_section(
            "neutron-api",
            "/etc/neutron/neutron.conf",
            "DEFAULT",
            vec![("debug".to_string(), "True".to_string())],
        );
        let value = serde_json::to_value(&inject).unwrap();
        assert_eq!(
            value["neutron-api"]["/etc/neutron/neutron.conf"]["sections"]["DEFAULT"],
            json!([["debug", "True"]])
        );
    }

    #[test]
    fn test_relation_settings_shape() {
        let payload = build_plugin_configuration(&resolve_profile(OpenStackRelease::Newton));
        let settings = payload.to_relation_settings().unwrap();
        let keys: Vec<&str> = settings.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "neutron-plugin",
                "core-plugin",
                "neutron-plugin-config",
                "service-plugins",
                "subordinate_configuration",
            ]
        );

        // The nested configuration round-trips as JSON
        let nested = &settings[4].1;
        let parsed: serde_json::Value = serde_json::from_str(nested).unwrap();
        assert!(parsed.get("neutron-api").is_some());
    }
}
