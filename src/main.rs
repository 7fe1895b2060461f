//! neutron-arista - Main entry point
//!
//! Maps the host framework's lifecycle hooks onto subcommands. Each
//! invocation is serial and runs to completion; failures propagate to the
//! framework, which owns retry policy.

use tracing::{debug, error, info};

use neutron_arista::charm::Charm;
use neutron_arista::cli::{Cli, Commands};
use neutron_arista::config::CharmConfig;
use neutron_arista::installer::SystemBackend;
use neutron_arista::relation::RelationChannel;
use neutron_arista::sanity;

/// Initialize the logger with appropriate settings
fn init_logger() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    info!("neutron-arista starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Validate { config } => {
            info!("Validating configuration file: {:?}", config);
            match CharmConfig::load_from_file(&config) {
                Ok(config) => match config.validate() {
                    Ok(_) => {
                        info!("Configuration validation successful");
                        println!("✓ Configuration file is valid: {:?}", config);
                    }
                    Err(e) => {
                        error!("Configuration validation failed: {}", e);
                        eprintln!("✗ Configuration validation failed: {}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    error!("Failed to load configuration file: {:#}", e);
                    eprintln!("✗ Failed to load configuration file: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Release => {
            let charm = Charm::from_system(cli.config.as_deref(), cli.dry_run)?;
            println!("release: {}", charm.release);
            println!("packages: {}", charm.profile.packages.join(" "));
            println!(
                "extra-install-packages: {}",
                charm.profile.extra_install_packages.join(" ")
            );
            println!("service-plugins: {}", charm.profile.service_plugins);
        }
        Commands::Install => {
            ensure_environment(cli.dry_run);
            let charm = Charm::from_system(cli.config.as_deref(), cli.dry_run)?;
            let mut backend = SystemBackend::new(cli.dry_run);
            charm.install(&mut backend)?;
            info!("Install hook complete");
        }
        Commands::Configure => {
            ensure_environment(cli.dry_run);
            let charm = Charm::from_system(cli.config.as_deref(), cli.dry_run)?;
            let changed = charm.configure()?;
            info!("Configure hook complete, {} file(s) changed", changed.len());
        }
        Commands::Relate => {
            let charm = Charm::from_system(cli.config.as_deref(), cli.dry_run)?;
            let mut channel = RelationChannel::new(cli.dry_run);
            charm.relate(&mut channel)?;
            info!("Relation hook complete");
        }
    }

    Ok(())
}

/// Run the pre-flight checks, exiting early when the environment is unusable.
///
/// Dry-run skips the root requirement so operators can preview hooks from
/// an unprivileged shell.
fn ensure_environment(dry_run: bool) {
    let result = sanity::verify_environment();

    if !result.missing_binaries.is_empty() {
        error!("Missing required binaries: {}", result.missing_binaries.join(", "));
        eprintln!(
            "✗ Missing required binaries: {}",
            result.missing_binaries.join(", ")
        );
        std::process::exit(1);
    }

    if !result.is_root && !dry_run {
        error!("This hook must run as root");
        eprintln!("✗ This hook must run as root (use --dry-run to preview)");
        std::process::exit(1);
    }
}
