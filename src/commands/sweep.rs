//! One-shot expired share sweep.

use clap::Args;

use linkgate_core::config::AppConfig;
use linkgate_core::error::AppError;
use linkgate_service::ExpiredShareCleanup;

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Sweep even when expired share cleanup is disabled in configuration
    #[arg(long)]
    pub force: bool,
}

/// Orphan every share expired by now.
pub async fn execute(args: &SweepArgs, config: &AppConfig) -> Result<(), AppError> {
    let (pool, store) = super::open_store(config).await?;

    let enabled = args.force || config.public_share.enable_expired_shares_cleanup;
    if !enabled {
        println!("Expired share cleanup is disabled; pass --force to sweep anyway.");
    }
    let cleanup = ExpiredShareCleanup::new(store, enabled, config.public_share.inline_sweep);
    let result = cleanup.sweep().await;

    if let Some(pool) = pool {
        pool.close().await;
    }
    let orphaned = result?;

    println!("Orphaned {orphaned} expired share(s).");
    Ok(())
}
