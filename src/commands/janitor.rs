//! Long-running expired share janitor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use linkgate_core::config::AppConfig;
use linkgate_core::error::AppError;
use linkgate_service::{ExpiredShareCleanup, Janitor};

/// Run the janitor until Ctrl+C or SIGTERM.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let (pool, store) = super::open_store(config).await?;
    let cleanup = Arc::new(ExpiredShareCleanup::from_config(store, &config.public_share));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interval = Duration::from_secs(config.public_share.janitor_run_interval);

    match Janitor::start(cleanup, interval, shutdown_rx) {
        Some(handle) => {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping janitor");
            let _ = shutdown_tx.send(true);
            if let Err(e) = handle.await {
                error!(error = %e, "Janitor task failed");
            }
        }
        None => {
            warn!("Set public_share.enable_expired_shares_cleanup to run the janitor");
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
