//! CLI command definitions and dispatch.

pub mod config;
pub mod janitor;
pub mod migrate;
pub mod sweep;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use linkgate_core::config::AppConfig;
use linkgate_core::error::AppError;
use linkgate_database::{DatabasePool, ShareStoreManager};

/// LinkGate: public link sharing and capability authentication
#[derive(Debug, Parser)]
#[command(name = "linkgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending share store migrations
    Migrate,
    /// Orphan expired shares once and exit
    Sweep(sweep::SweepArgs),
    /// Run the expired share janitor until interrupted
    Janitor,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Sweep(args) => sweep::execute(args, &config).await,
            Commands::Janitor => janitor::execute(&config).await,
            Commands::Config(args) => config::execute(args, &config, &self.config),
        }
    }
}

/// Helper: open the configured share store.
///
/// A pool is only opened for the `sql` driver; it is returned so the caller
/// can close it on exit.
pub async fn open_store(
    config: &AppConfig,
) -> Result<(Option<DatabasePool>, Arc<ShareStoreManager>), AppError> {
    let pool = match config.public_share.driver.as_str() {
        "sql" => Some(DatabasePool::connect(&config.database).await?),
        _ => None,
    };
    let store = ShareStoreManager::new(&config.public_share, pool.as_ref())?;
    Ok((pool, Arc::new(store)))
}
