//! Package installation for the charm.
//!
//! Distro packages go through apt; the Arista driver itself ships on PyPI
//! and is installed out-of-band via pip before the apt set. Both backends
//! sit behind the [`PackageBackend`] trait so hook orchestration can be
//! tested without touching the system.
//!
//! Installation failures are not retried here. They propagate unmodified to
//! the host framework, whose hook retry policy governs recovery.

use anyhow::Context;
use std::process::Command;
use tracing::{info, warn};

use crate::error::{CharmError, Result};
use crate::profiles::ReleaseProfile;

/// Boundary to the system's package installers.
pub trait PackageBackend {
    /// Install distro packages via the system package manager.
    fn install_packages(&mut self, targets: &[&str]) -> Result<()>;

    /// Install one out-of-band package via pip.
    fn pip_install(&mut self, target: &str) -> Result<()>;
}

/// apt/pip backend targeting the running system.
pub struct SystemBackend {
    dry_run: bool,
}

impl SystemBackend {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl PackageBackend for SystemBackend {
    fn install_packages(&mut self, targets: &[&str]) -> Result<()> {
        if targets.is_empty() {
            warn!("install_packages called with empty target list");
            return Ok(());
        }
        if self.dry_run {
            info!("dry-run: would apt install {:?}", targets);
            return Ok(());
        }

        info!("Installing packages: {:?}", targets);
        let mut cmd = Command::new("apt-get");
        cmd.args(["install", "--yes"])
            .args(targets)
            .env("DEBIAN_FRONTEND", "noninteractive");
        run_installer(cmd).map_err(|e| CharmError::installation(format!("{e:#}")))?;
        info!("Package installation complete: {:?}", targets);
        Ok(())
    }

    fn pip_install(&mut self, target: &str) -> Result<()> {
        if self.dry_run {
            info!("dry-run: would pip install {}", target);
            return Ok(());
        }

        info!("Installing pip package: {}", target);
        let mut cmd = Command::new("pip");
        cmd.args(["install", target]);
        run_installer(cmd).map_err(|e| CharmError::installation(format!("{e:#}")))
    }
}

/// Run an installer command to completion, failing on non-zero exit.
fn run_installer(mut cmd: Command) -> anyhow::Result<()> {
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
    Ok(())
}

/// Install everything the resolved profile requires.
///
/// Out-of-band pip packages are installed first, then the apt package list.
/// The pip step originates at the chain root and is inherited by every
/// later release, so it runs exactly once per invocation, never duplicated.
pub fn install_profile(profile: &ReleaseProfile, backend: &mut dyn PackageBackend) -> Result<()> {
    for package in profile.extra_install_packages {
        backend.pip_install(package)?;
    }
    backend.install_packages(profile.packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::resolve_profile;
    use crate::release::OpenStackRelease;
    use strum::IntoEnumIterator;

    /// Backend that records calls instead of touching the system.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<String>,
        fail_pip: bool,
    }

    impl PackageBackend for RecordingBackend {
        fn install_packages(&mut self, targets: &[&str]) -> Result<()> {
            self.calls.push(format!("apt:{}", targets.join(",")));
            Ok(())
        }

        fn pip_install(&mut self, target: &str) -> Result<()> {
            if self.fail_pip {
                return Err(CharmError::installation(format!("{target} install failed")));
            }
            self.calls.push(format!("pip:{target}"));
            Ok(())
        }
    }

    #[test]
    fn test_pip_runs_once_before_apt() {
        let profile = resolve_profile(OpenStackRelease::Icehouse);
        let mut backend = RecordingBackend::default();
        install_profile(&profile, &mut backend).unwrap();

        assert_eq!(
            backend.calls,
            vec![
                "pip:networking-arista".to_string(),
                "apt:neutron-common,neutron-plugin-ml2,python-pip".to_string(),
            ]
        );
    }

    #[test]
    fn test_derived_releases_do_not_duplicate_pip() {
        for release in OpenStackRelease::iter() {
            let profile = resolve_profile(release);
            let mut backend = RecordingBackend::default();
            install_profile(&profile, &mut backend).unwrap();

            let pip_calls = backend
                .calls
                .iter()
                .filter(|c| c.starts_with("pip:"))
                .count();
            assert_eq!(pip_calls, 1, "{release} should pip install exactly once");
        }
    }

    #[test]
    fn test_pip_failure_stops_apt() {
        let profile = resolve_profile(OpenStackRelease::Kilo);
        let mut backend = RecordingBackend {
            fail_pip: true,
            ..Default::default()
        };

        let err = install_profile(&profile, &mut backend).unwrap_err();
        assert!(matches!(err, CharmError::Installation(_)));
        assert!(backend.calls.is_empty(), "apt must not run after pip fails");
    }
}
