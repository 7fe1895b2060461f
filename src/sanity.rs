//! Pre-flight sanity checks for the runtime environment
//!
//! This module verifies the system environment before a hook mutates
//! anything:
//! - Required runtime binaries are present
//! - Running with root privileges (EUID 0)
//!
//! If a check fails, the hook exits with a clear error message before any
//! package install or file write happens.

use std::process::Command;

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }
}

/// Required runtime binaries for install and configure hooks
const REQUIRED_BINARIES: &[&str] = &[
    "apt-get",     // Distro package installation
    "pip",         // Out-of-band driver package installation
    "dpkg-query",  // Installed-release detection
    "systemctl",   // Service restarts from the restart map
];

/// Optional binaries (warn if missing but don't fail)
///
/// The relation hook tools only exist inside a hook execution context, so
/// their absence is expected when running by hand.
const OPTIONAL_BINARIES: &[&str] = &["relation-ids", "relation-set"];

/// Check if a binary is available in PATH
fn binary_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    // Using nix crate for reliable EUID check
    nix::unistd::geteuid().is_root()
}

/// Perform all sanity checks and return the result
pub fn verify_environment() -> SanityCheckResult {
    let mut missing = Vec::new();

    for binary in REQUIRED_BINARIES {
        if !binary_exists(binary) {
            missing.push((*binary).to_string());
        }
    }

    for binary in OPTIONAL_BINARIES {
        if !binary_exists(binary) {
            tracing::debug!(
                "Optional binary not found: {} (only present in a hook context)",
                binary
            );
        }
    }

    SanityCheckResult {
        missing_binaries: missing,
        is_root: is_running_as_root(),
    }
}
