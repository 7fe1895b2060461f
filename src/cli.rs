use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// neutron-arista - deployment automation for the Arista ML2 driver
#[derive(Parser)]
#[command(name = "neutron-arista")]
#[command(about = "Installs and configures the Arista ML2 driver for neutron-api")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: log what would be done without changing the system.
    ///
    /// Package installs, file writes, service restarts, and relation
    /// updates are skipped and logged. Read-only operations (release
    /// detection, validation) still execute so the preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to the charm configuration file (JSON).
    ///
    /// Option defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install the driver packages (pip package first, then apt)
    Install,
    /// Validate options and write the ML2 plugin configuration files
    Configure,
    /// Send the plugin configuration payload to the principal unit
    Relate,
    /// Validate a configuration file and exit
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
    /// Print the detected OpenStack release and its resolved profile
    Release,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
