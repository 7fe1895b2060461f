//! Hook-level orchestration.
//!
//! A [`Charm`] is built once per hook invocation: the installed release is
//! detected, the matching profile resolved, and the operator configuration
//! loaded. The hook entry points then call into the external collaborators
//! (package backends, the config writer, the relation channel) in a fixed
//! order. No state persists between invocations beyond the files and
//! packages on disk; re-running a hook re-derives everything.

use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::config::CharmConfig;
use crate::error::{CharmError, Result};
use crate::installer::{PackageBackend, install_profile};
use crate::payload::build_plugin_configuration;
use crate::profiles::{ML2_CONF, ML2_CONF_ARISTA, ReleaseProfile, resolve_profile};
use crate::relation::{PrincipalApi, ensure_required_relations};
use crate::release::{OpenStackRelease, detect_installed_release};
use crate::render::{ConfigWriter, IniSections, render_ini};

/// One hook invocation's view of the unit.
pub struct Charm {
    pub release: OpenStackRelease,
    pub profile: ReleaseProfile,
    pub config: CharmConfig,
    dry_run: bool,
}

impl Charm {
    /// Build a charm for a known release and configuration.
    pub fn new(release: OpenStackRelease, config: CharmConfig, dry_run: bool) -> Self {
        Self {
            profile: resolve_profile(release),
            release,
            config,
            dry_run,
        }
    }

    /// Build a charm from the running system.
    ///
    /// Detects the release from the installed `neutron-common` package and
    /// loads the configuration file when one is given; option defaults
    /// apply otherwise.
    pub fn from_system(config_path: Option<&Path>, dry_run: bool) -> Result<Self> {
        let release = detect_installed_release()?;
        let config = match config_path {
            Some(path) => CharmConfig::load_from_file(path)
                .map_err(|e| CharmError::config(format!("{e:#}")))?,
            None => CharmConfig::default(),
        };
        info!("Detected OpenStack release: {}", release);
        Ok(Self::new(release, config, dry_run))
    }

    /// Install hook: pip package first, then the apt package list.
    pub fn install(&self, backend: &mut dyn PackageBackend) -> Result<()> {
        install_profile(&self.profile, backend)
    }

    /// Configure hook: validate options, write the plugin files, restart
    /// services the restart map lists for the changed paths.
    pub fn configure(&self) -> Result<Vec<String>> {
        self.configure_with(&ConfigWriter::new("/", self.dry_run))
    }

    /// Configure against an explicit writer (tests target a temp root).
    pub fn configure_with(&self, writer: &ConfigWriter) -> Result<Vec<String>> {
        let mut changed = Vec::new();
        for (path, content) in self.plugin_files()? {
            if writer.write_if_changed(path, &content)? {
                changed.push(path.to_string());
            }
        }
        self.restart_changed(&changed)?;
        Ok(changed)
    }

    /// Relation hook: gate on the principal, then send the payload.
    pub fn relate(&self, principal: &mut dyn PrincipalApi) -> Result<()> {
        ensure_required_relations(&self.profile, principal)?;
        let payload = build_plugin_configuration(&self.profile);
        principal.configure_plugin(&payload)
    }

    /// The managed plugin files and their rendered contents.
    ///
    /// Validation happens here: an invalid overlay-network-type aborts the
    /// configure step before anything is written.
    fn plugin_files(&self) -> Result<Vec<(&'static str, String)>> {
        let overlay = self.config.overlay_net_types()?;

        let ml2: IniSections = vec![(
            "ml2".to_string(),
            vec![
                ("mechanism_drivers".to_string(), "arista".to_string()),
                ("tenant_network_types".to_string(), overlay),
            ],
        )];
        let arista: IniSections = vec![("ml2_arista".to_string(), Vec::new())];

        Ok(vec![
            (ML2_CONF, render_ini(&ml2)),
            (ML2_CONF_ARISTA, render_ini(&arista)),
        ])
    }

    fn restart_changed(&self, changed: &[String]) -> Result<()> {
        for path in changed {
            for service in self.profile.services_for(path) {
                restart_service(service, self.dry_run)?;
            }
        }
        Ok(())
    }
}

/// Restart a system service via systemctl.
fn restart_service(service: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        info!("dry-run: would restart {}", service);
        return Ok(());
    }

    info!("Restarting {}", service);
    let output = Command::new("systemctl")
        .args(["restart", service])
        .output()
        .map_err(|e| CharmError::system(format!("Failed to run systemctl: {e}")))?;

    if !output.status.success() {
        return Err(CharmError::system(format!(
            "systemctl restart {} failed: {}",
            service,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
