//! Principal relation channel.
//!
//! This unit is strictly a subordinate: it only operates when a principal
//! provides the `neutron-plugin-api-subordinate` interface. The channel to
//! the principal sits behind the [`PrincipalApi`] trait; the concrete
//! implementation shells out to the host framework's relation hook tools.

use anyhow::Context;
use std::process::Command;
use tracing::{debug, info};

use crate::error::{CharmError, Result};
use crate::payload::PluginConfigPayload;
use crate::profiles::{PRINCIPAL_RELATION, ReleaseProfile};

/// Boundary to the inter-unit relation channel.
pub trait PrincipalApi {
    /// Relation ids currently joined for the named relation.
    fn relation_ids(&self, relation: &str) -> Result<Vec<String>>;

    /// Transmit the plugin configuration payload to the principal.
    fn configure_plugin(&mut self, payload: &PluginConfigPayload) -> Result<()>;
}

/// Relation channel backed by the framework's hook tools.
pub struct RelationChannel {
    dry_run: bool,
}

impl RelationChannel {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl PrincipalApi for RelationChannel {
    fn relation_ids(&self, relation: &str) -> Result<Vec<String>> {
        let stdout = run_hook_tool(
            Command::new("relation-ids").args(["--format=json", relation]),
        )
        .map_err(|e| CharmError::relation(format!("{e:#}")))?;

        let ids: Vec<String> = serde_json::from_str(stdout.trim())?;
        debug!("{} has {} joined relation(s)", relation, ids.len());
        Ok(ids)
    }

    fn configure_plugin(&mut self, payload: &PluginConfigPayload) -> Result<()> {
        let settings = payload.to_relation_settings()?;
        let ids = self.relation_ids(PRINCIPAL_RELATION)?;
        if ids.is_empty() {
            return Err(CharmError::missing_relation(PRINCIPAL_RELATION));
        }

        for id in &ids {
            if self.dry_run {
                info!("dry-run: would relation-set on {}: {:?}", id, settings);
                continue;
            }
            let mut cmd = Command::new("relation-set");
            cmd.args(["-r", id.as_str()]);
            for (key, value) in &settings {
                cmd.arg(format!("{key}={value}"));
            }
            run_hook_tool(&mut cmd).map_err(|e| CharmError::relation(format!("{e:#}")))?;
            info!("Sent plugin configuration on relation {}", id);
        }
        Ok(())
    }
}

/// Run a relation hook tool to completion, capturing stdout.
fn run_hook_tool(cmd: &mut Command) -> anyhow::Result<String> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let output = cmd
        .output()
        .with_context(|| format!("Failed to spawn {program}"))?;

    if !output.status.success() {
        anyhow::bail!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Refuse to act when a required relation has no principal attached.
pub fn ensure_required_relations(
    profile: &ReleaseProfile,
    api: &dyn PrincipalApi,
) -> Result<()> {
    for relation in profile.required_relations {
        if api.relation_ids(relation)?.is_empty() {
            return Err(CharmError::missing_relation(*relation));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::build_plugin_configuration;
    use crate::profiles::resolve_profile;
    use crate::release::OpenStackRelease;

    /// In-memory principal for orchestration tests.
    #[derive(Default)]
    struct MockPrincipal {
        joined: Vec<String>,
        received: Vec<PluginConfigPayload>,
    }

    impl PrincipalApi for MockPrincipal {
        fn relation_ids(&self, _relation: &str) -> Result<Vec<String>> {
            Ok(self.joined.clone())
        }

        fn configure_plugin(&mut self, payload: &PluginConfigPayload) -> Result<()> {
            self.received.push(payload.clone());
            Ok(())
        }
    }

    #[test]
    fn test_gate_passes_with_principal() {
        let profile = resolve_profile(OpenStackRelease::Pike);
        let api = MockPrincipal {
            joined: vec!["neutron-plugin-api-subordinate:0".to_string()],
            ..Default::default()
        };
        assert!(ensure_required_relations(&profile, &api).is_ok());
    }

    #[test]
    fn test_gate_refuses_without_principal() {
        let profile = resolve_profile(OpenStackRelease::Pike);
        let api = MockPrincipal::default();
        let err = ensure_required_relations(&profile, &api).unwrap_err();
        assert!(
            matches!(err, CharmError::MissingRelation(name)
                if name == "neutron-plugin-api-subordinate")
        );
    }

    #[test]
    fn test_mock_principal_receives_payload() {
        let profile = resolve_profile(OpenStackRelease::Newton);
        let mut api = MockPrincipal {
            joined: vec!["neutron-plugin-api-subordinate:3".to_string()],
            ..Default::default()
        };

        let payload = build_plugin_configuration(&profile);
        api.configure_plugin(&payload).unwrap();
        assert_eq!(api.received.len(), 1);
        assert_eq!(api.received[0].service_plugins, profile.service_plugins);
    }
}
