//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use linkgate_core::config::AppConfig;
use linkgate_core::error::AppError;
use linkgate_database::connection::redact_url;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration as JSON
    Show,
    /// Validate the configuration and print a summary
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, config_path: &str) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = redact_url(&shown.database.url);
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        ConfigCommand::Validate => {
            // Loading already validated it.
            println!("Configuration '{config_path}' is valid");
            println!("  Database: {}", redact_url(&config.database.url));
            println!("  Share driver: {}", config.public_share.driver);
            println!(
                "  Cleanup: {} (every {}s, inline {:?})",
                config.public_share.enable_expired_shares_cleanup,
                config.public_share.janitor_run_interval,
                config.public_share.inline_sweep
            );
        }
    }
    Ok(())
}
