//! Share store manager that dispatches to the configured driver.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::info;

use linkgate_core::config::PublicShareConfig;
use linkgate_core::error::AppError;
use linkgate_core::result::AppResult;
use linkgate_entity::share::{NewShareRow, ShareId, ShareRow};

use crate::connection::DatabasePool;
use crate::repositories::{MemoryShareStore, PgShareStore};
use crate::store::{FieldUpdate, ListPredicate, OrphanPredicate, ShareSelector, ShareStore};

/// Share store manager that wraps the configured driver.
///
/// The driver is selected at construction time by name.
#[derive(Clone)]
pub struct ShareStoreManager {
    inner: Arc<dyn ShareStore>,
    driver: &'static str,
}

impl std::fmt::Debug for ShareStoreManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareStoreManager")
            .field("driver", &self.driver)
            .finish()
    }
}

impl ShareStoreManager {
    /// Create a store manager from configuration.
    ///
    /// The `sql` driver needs an open pool.
    pub fn new(config: &PublicShareConfig, pool: Option<&DatabasePool>) -> AppResult<Self> {
        let (inner, driver): (Arc<dyn ShareStore>, &'static str) = match config.driver.as_str() {
            "sql" => {
                let pool = pool.ok_or_else(|| {
                    AppError::configuration("The 'sql' share driver requires a database pool")
                })?;
                info!(batch_size = config.list_batch_size, "Initializing SQL share store");
                (
                    Arc::new(PgShareStore::new(
                        pool.pool().clone(),
                        config.list_batch_size,
                    )),
                    "sql",
                )
            }
            "memory" => {
                info!("Initializing in-memory share store");
                (Arc::new(MemoryShareStore::new()), "memory")
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown share store driver: '{other}'. Supported: sql, memory"
                )));
            }
        };

        Ok(Self { inner, driver })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn ShareStore>) -> Self {
        Self {
            inner: store,
            driver: "custom",
        }
    }

    /// Name of the active driver.
    pub fn driver(&self) -> &'static str {
        self.driver
    }
}

#[async_trait]
impl ShareStore for ShareStoreManager {
    async fn insert(&self, row: &NewShareRow) -> AppResult<ShareId> {
        self.inner.insert(row).await
    }

    async fn update_fields(
        &self,
        selector: &ShareSelector,
        update: &FieldUpdate,
    ) -> AppResult<u64> {
        self.inner.update_fields(selector, update).await
    }

    async fn find_one(&self, selector: &ShareSelector) -> AppResult<Option<ShareRow>> {
        self.inner.find_one(selector).await
    }

    fn find_many(&self, predicate: ListPredicate) -> BoxStream<'_, AppResult<ShareRow>> {
        self.inner.find_many(predicate)
    }

    async fn delete(&self, selector: &ShareSelector) -> AppResult<u64> {
        self.inner.delete(selector).await
    }

    async fn mark_orphan(&self, predicate: &OrphanPredicate) -> AppResult<u64> {
        self.inner.mark_orphan(predicate).await
    }
}
