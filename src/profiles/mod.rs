//! Release profile management.
//!
//! This module provides the release-versioned configuration for the Arista
//! ML2 driver. Package lists and plugin settings are maintained in Rust
//! constants for easy updates and compile-time verification.
//!
//! # Supported Releases
//!
//! | Release  | Changes over its predecessor |
//! |----------|------------------------------|
//! | icehouse | Baseline: packages, relations, restart map, service plugins |
//! | kilo     | None (pure inheritance) |
//! | newton   | LBaaS v2 service plugin string |
//! | pike     | None (pure inheritance) |
//!
//! # Resolution Model
//!
//! Profiles form a linear derivation chain: each release inherits every
//! attribute of its predecessor unless it carries an explicit override.
//! Resolution walks the chain from the oldest release up to the requested
//! one and takes the nearest override for each attribute. There is no
//! registry and no dynamic dispatch; the chain is a plain ordered slice.

use crate::error::Result;
use crate::release::OpenStackRelease;

/// Path of the ML2 core plugin configuration file.
pub const ML2_CONF: &str = "/etc/neutron/plugins/ml2/ml2_conf.ini";

/// Path of the Arista mechanism driver configuration file.
pub const ML2_CONF_ARISTA: &str = "/etc/neutron/plugins/ml2/ml2_conf_arista.ini";

/// The principal's main configuration file, owned by neutron-api.
pub const NEUTRON_CONF: &str = "/etc/neutron/neutron.conf";

/// Out-of-band driver package, installed via pip rather than apt.
pub const NETWORKING_ARISTA_PACKAGE: &str = "networking-arista";

/// Relation this subordinate requires before it can operate.
pub const PRINCIPAL_RELATION: &str = "neutron-plugin-api-subordinate";

/// Distro packages installed on every release.
pub const BASE_PACKAGES: &[&str] = &["neutron-common", "neutron-plugin-ml2", "python-pip"];

/// Service plugin strings, versioned by release.
pub mod service_plugins {
    /// LBaaS v1 plugin set (icehouse through mitaka).
    pub const LBAAS_V1: &str = "router,firewall,lbaas,vpnaas,metering";

    /// LBaaS v2 plugin set (newton onward).
    pub const LBAAS_V2: &str = "router,firewall,vpnaas,metering,\
        neutron_lbaas.services.loadbalancer.plugin.LoadBalancerPluginv2";
}

/// A mapping from config file path to services restarted when it changes.
pub type RestartMap = &'static [(&'static str, &'static [&'static str])];

const DEFAULT_RESTART_MAP: RestartMap = &[(ML2_CONF, &[]), (ML2_CONF_ARISTA, &[])];

// ============================================================================
// Override Chain
// ============================================================================

/// Per-release overrides. A `None` field inherits from the previous release.
#[derive(Debug, Clone, Copy)]
pub struct ProfileOverride {
    pub release: OpenStackRelease,
    pub packages: Option<&'static [&'static str]>,
    pub required_relations: Option<&'static [&'static str]>,
    pub restart_map: Option<RestartMap>,
    pub service_plugins: Option<&'static str>,
    pub extra_install_packages: Option<&'static [&'static str]>,
}

impl ProfileOverride {
    /// An entry with no overrides: the release inherits everything.
    const fn inherit(release: OpenStackRelease) -> Self {
        Self {
            release,
            packages: None,
            required_relations: None,
            restart_map: None,
            service_plugins: None,
            extra_install_packages: None,
        }
    }
}

/// The ordered derivation chain, oldest release first.
///
/// The root entry must populate every field; resolution relies on it.
pub const PROFILE_CHAIN: &[ProfileOverride] = &[
    ProfileOverride {
        release: OpenStackRelease::Icehouse,
        packages: Some(BASE_PACKAGES),
        required_relations: Some(&[PRINCIPAL_RELATION]),
        restart_map: Some(DEFAULT_RESTART_MAP),
        service_plugins: Some(service_plugins::LBAAS_V1),
        extra_install_packages: Some(&[NETWORKING_ARISTA_PACKAGE]),
    },
    ProfileOverride::inherit(OpenStackRelease::Kilo),
    ProfileOverride {
        service_plugins: Some(service_plugins::LBAAS_V2),
        ..ProfileOverride::inherit(OpenStackRelease::Newton)
    },
    ProfileOverride::inherit(OpenStackRelease::Pike),
];

// ============================================================================
// Resolved Profile
// ============================================================================

/// A fully resolved release profile.
///
/// Immutable for the duration of one hook invocation; re-resolved from the
/// chain on the next invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseProfile {
    pub release: OpenStackRelease,
    /// Distro packages installed via apt.
    pub packages: &'static [&'static str],
    /// Relations that must be joined before the charm operates.
    pub required_relations: &'static [&'static str],
    /// Config files managed by the charm and the services to restart on change.
    pub restart_map: RestartMap,
    /// Comma-joined service plugin list handed to the principal.
    pub service_plugins: &'static str,
    /// Out-of-band packages installed via pip before the apt packages.
    pub extra_install_packages: &'static [&'static str],
}

impl ReleaseProfile {
    /// Services to restart when the file at `path` changes.
    pub fn services_for(&self, path: &str) -> &'static [&'static str] {
        self.restart_map
            .iter()
            .find(|(file, _)| *file == path)
            .map(|(_, services)| *services)
            .unwrap_or(&[])
    }
}

/// Resolve the profile for a release by walking the override chain.
///
/// Walks from the root up to and including `release`, taking the nearest
/// explicit override for each attribute.
pub fn resolve_profile(release: OpenStackRelease) -> ReleaseProfile {
    // The chain root populates every field, so each attribute below is
    // overwritten at least once before the loop exits.
    let mut packages: &'static [&'static str] = &[];
    let mut required_relations: &'static [&'static str] = &[];
    let mut restart_map: RestartMap = &[];
    let mut service_plugins: &'static str = "";
    let mut extra_install_packages: &'static [&'static str] = &[];

    for entry in PROFILE_CHAIN {
        if entry.release > release {
            break;
        }
        if let Some(v) = entry.packages {
            packages = v;
        }
        if let Some(v) = entry.required_relations {
            required_relations = v;
        }
        if let Some(v) = entry.restart_map {
            restart_map = v;
        }
        if let Some(v) = entry.service_plugins {
            service_plugins = v;
        }
        if let Some(v) = entry.extra_install_packages {
            extra_install_packages = v;
        }
    }

    ReleaseProfile {
        release,
        packages,
        required_relations,
        restart_map,
        service_plugins,
        extra_install_packages,
    }
}

/// Resolve the profile for a release tag.
///
/// Unknown tags fail with `UnsupportedRelease`. This is the explicit factory
/// that replaces any registration-at-import-time machinery: detection of the
/// installed release feeds this function, nothing else selects behavior.
pub fn choose_profile(tag: &str) -> Result<ReleaseProfile> {
    let release = OpenStackRelease::from_tag(tag)?;
    Ok(resolve_profile(release))
}

// ============================================================================
// Tests
// ============================================================================
