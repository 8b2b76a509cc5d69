//! Reclamation of expired public shares.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use linkgate_core::config::{InlineSweep, PublicShareConfig};
use linkgate_core::result::AppResult;
use linkgate_database::ShareStoreManager;
use linkgate_database::store::{OrphanPredicate, ShareStore};

/// Flags expired shares as orphaned.
///
/// Does nothing unless cleanup is enabled in configuration.
#[derive(Debug, Clone)]
pub struct ExpiredShareCleanup {
    store: Arc<ShareStoreManager>,
    enabled: bool,
    inline: InlineSweep,
}

impl ExpiredShareCleanup {
    /// Creates a cleanup bound to `store`.
    pub fn new(store: Arc<ShareStoreManager>, enabled: bool, inline: InlineSweep) -> Self {
        Self {
            store,
            enabled,
            inline,
        }
    }

    /// Creates a cleanup from the public share settings.
    pub fn from_config(store: Arc<ShareStoreManager>, config: &PublicShareConfig) -> Self {
        Self::new(
            store,
            config.enable_expired_shares_cleanup,
            config.inline_sweep,
        )
    }

    /// Whether sweeps do anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Orphan every share expired by now. Returns the number of shares
    /// newly orphaned.
    pub async fn sweep(&self) -> AppResult<u64> {
        if !self.enabled {
            return Ok(0);
        }
        let orphaned = self
            .store
            .mark_orphan(&OrphanPredicate::expired_at(Utc::now()))
            .await?;
        if orphaned > 0 {
            info!(orphaned, "Orphaned expired public shares");
        }
        Ok(orphaned)
    }

    /// Sweep after a read observed the expired shares `tokens`.
    pub async fn sweep_observed(&self, tokens: &[&str]) -> AppResult<u64> {
        if !self.enabled || tokens.is_empty() {
            return Ok(0);
        }
        match self.inline {
            InlineSweep::Bulk => self.sweep().await,
            InlineSweep::Single => {
                let now = Utc::now();
                let mut orphaned = 0;
                for token in tokens {
                    orphaned += self
                        .store
                        .mark_orphan(&OrphanPredicate::single(now, *token))
                        .await?;
                }
                debug!(orphaned, "Orphaned observed expired shares");
                Ok(orphaned)
            }
        }
    }
}
