//! neutron-arista Library
//!
//! This library provides the deployment-automation logic for the Arista ML2
//! Neutron driver: release-versioned profile selection, option validation,
//! plugin file management, and the configuration payload handed to the
//! neutron-api principal over the subordinate relation.

pub mod charm;
pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod overlay;
pub mod payload;
pub mod profiles;
pub mod relation;
pub mod release;
pub mod render;
pub mod sanity;

// Re-export main types for convenience
pub use charm::Charm;
pub use config::CharmConfig;
pub use error::{CharmError, Result};
pub use installer::{PackageBackend, SystemBackend, install_profile};
pub use overlay::{OVERLAY_NET_TYPES, validate_overlay_network_types};
pub use payload::{
    InjectConfig, PluginConfigPayload, SectionEntries, build_plugin_configuration,
};
pub use profiles::{
    PROFILE_CHAIN, ProfileOverride, ReleaseProfile, choose_profile, resolve_profile,
};
pub use relation::{PrincipalApi, RelationChannel, ensure_required_relations};
pub use release::{OpenStackRelease, detect_installed_release, release_from_package_version};
pub use render::{ConfigWriter, render_ini};
