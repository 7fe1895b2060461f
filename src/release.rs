//! OpenStack release tags and installed-release detection.
//!
//! The charm's behavior is keyed by the OpenStack release of the principal
//! service. The release is never configured directly: it is derived from the
//! version the installed `neutron-common` package reports, the same source
//! of truth the principal itself uses.

use serde::{Deserialize, Serialize};
use std::process::Command;
use strum::{Display, EnumIter, EnumString};

use crate::error::{CharmError, Result};

/// Package whose version determines the active OpenStack release.
pub const RELEASE_PACKAGE: &str = "neutron-common";

/// Known OpenStack releases, oldest first.
///
/// The declaration order is the derivation order: profile overrides for a
/// release apply to every later release until overridden again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OpenStackRelease {
    Icehouse,
    Kilo,
    Newton,
    Pike,
}

impl OpenStackRelease {
    /// Parse a release tag, mapping unknown tags to `UnsupportedRelease`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        tag.parse()
            .map_err(|_| CharmError::unsupported_release(tag))
    }
}

/// Version prefixes reported by `neutron-common`, mapped to release tags.
///
/// Pre-Liberty packages carry year-based versions (2014.1, 2015.1); later
/// releases switched to plain major versions (9 = newton, 11 = pike).
const VERSION_MAP: &[(&str, OpenStackRelease)] = &[
    ("2014.1", OpenStackRelease::Icehouse),
    ("2015.1", OpenStackRelease::Kilo),
    ("9", OpenStackRelease::Newton),
    ("11", OpenStackRelease::Pike),
];

/// Map a `neutron-common` package version string to a release.
///
/// Tolerates Debian epoch prefixes (`2:11.0.0-0ubuntu1`) and package
/// revision suffixes. Versions outside the supported chain fail with
/// `UnsupportedRelease`.
pub fn release_from_package_version(version: &str) -> Result<OpenStackRelease> {
    let upstream = version.split_once(':').map_or(version, |(_, v)| v);

    let mut components = upstream.split('.');
    let major = components.next().and_then(leading_number);
    let minor = components.next().and_then(leading_number);

    let key = match (major, minor) {
        // Year-based versions need the minor component to disambiguate
        (Some(major), Some(minor)) if major >= 2014 => format!("{major}.{minor}"),
        (Some(major), _) => major.to_string(),
        _ => return Err(CharmError::unsupported_release(version)),
    };

    VERSION_MAP
        .iter()
        .find(|(prefix, _)| *prefix == key)
        .map(|(_, release)| *release)
        .ok_or_else(|| CharmError::unsupported_release(version))
}

/// Detect the active OpenStack release from the installed system.
pub fn detect_installed_release() -> Result<OpenStackRelease> {
    let version = installed_package_version(RELEASE_PACKAGE)?;
    let release = release_from_package_version(&version)?;
    tracing::debug!("{} {} maps to release {}", RELEASE_PACKAGE, version, release);
    Ok(release)
}

/// Query dpkg for the installed version of a package.
fn installed_package_version(package: &str) -> Result<String> {
    let output = Command::new("dpkg-query")
        .args(["-W", "-f=${Version}", package])
        .output()
        .map_err(|e| CharmError::system(format!("Failed to run dpkg-query: {e}")))?;

    if !output.status.success() {
        return Err(CharmError::system(format!(
            "dpkg-query failed for {}: {}",
            package,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Err(CharmError::system(format!(
            "{package} is not installed, cannot determine release"
        )));
    }
    Ok(version)
}

/// Parse the leading decimal digits of a version component.
fn leading_number(component: &str) -> Option<u32> {
    let digits: String = component
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
