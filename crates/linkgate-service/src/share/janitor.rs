//! Janitor: periodic background sweep of expired shares.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};

use super::cleanup::ExpiredShareCleanup;

/// Runs [`ExpiredShareCleanup::sweep`] on a fixed interval.
#[derive(Debug)]
pub struct Janitor;

impl Janitor {
    /// Spawn the janitor task.
    ///
    /// Returns `None` when cleanup is disabled. The first sweep happens one
    /// full `interval` after start. The task exits as soon as `cancel`
    /// carries `true` or its sender is dropped.
    pub fn start(
        cleanup: Arc<ExpiredShareCleanup>,
        interval: Duration,
        cancel: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        if !cleanup.is_enabled() {
            info!("Expired share cleanup disabled, janitor not started");
            return None;
        }
        Some(tokio::spawn(run(cleanup, interval, cancel)))
    }
}

async fn run(
    cleanup: Arc<ExpiredShareCleanup>,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    info!(interval_seconds = interval.as_secs(), "Share janitor started");

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = cleanup.sweep().await {
                    error!(error = %e, "Expired share sweep failed");
                }
            }
        }
    }

    info!("Share janitor stopped");
}
