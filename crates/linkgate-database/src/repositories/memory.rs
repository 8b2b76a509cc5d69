//! In-process share store backed by a concurrent map.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::debug;

use linkgate_core::error::AppError;
use linkgate_core::result::AppResult;
use linkgate_entity::share::{NewShareRow, ShareId, ShareRow};

use crate::store::{FieldUpdate, ListPredicate, OrphanPredicate, ShareSelector, ShareStore};

/// Share store holding rows in a [`DashMap`] keyed by id.
///
/// Honors the same visibility rules as the SQL driver, including token
/// uniqueness among live rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    rows: Arc<DashMap<i64, ShareRow>>,
    /// Token of every live row, mapped to its id.
    live_tokens: Arc<DashMap<String, i64>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row, orphaned ones included, ordered by id.
    pub fn snapshot(&self) -> Vec<ShareRow> {
        let mut rows: Vec<ShareRow> = self.rows.iter().map(|e| e.value().clone()).collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    /// Insert a fully formed row as-is, bypassing validation.
    pub fn insert_raw(&self, row: ShareRow) {
        self.next_id.fetch_max(row.id, Ordering::SeqCst);
        if !row.is_orphan() {
            self.live_tokens.insert(row.token.clone(), row.id);
        }
        self.rows.insert(row.id, row);
    }

    fn matching_ids(&self, selector: &ShareSelector) -> Vec<i64> {
        self.rows
            .iter()
            .filter(|e| selector.matches(e.value()))
            .map(|e| *e.key())
            .collect()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn insert(&self, row: &NewShareRow) -> AppResult<ShareId> {
        // The token entry stays locked until the row is stored.
        let slot = match self.live_tokens.entry(row.token.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::database(
                    "Failed to insert share: token already in use",
                ));
            }
            Entry::Vacant(slot) => slot,
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = ShareRow {
            id,
            uid_owner: row.uid_owner.clone(),
            uid_initiator: row.uid_initiator.clone(),
            item_type: row.item_type.as_str().to_string(),
            fileid_prefix: row.resource_id.storage_id.clone(),
            item_source: row.resource_id.opaque_id.clone(),
            permissions: i32::from(row.permissions),
            stime: row.stime,
            token: row.token.clone(),
            share_name: row.share_name.clone(),
            quicklink: row.quicklink,
            description: row.description.clone(),
            internal: row.internal,
            share_with: row.password_hash.clone(),
            expiration: row.expiration,
            orphan: None,
        };
        self.rows.insert(id, stored);
        slot.insert(id);
        debug!(share_id = id, "Inserted public share row");
        Ok(ShareId(id))
    }

    async fn update_fields(
        &self,
        selector: &ShareSelector,
        update: &FieldUpdate,
    ) -> AppResult<u64> {
        let mut affected = 0;
        for id in self.matching_ids(selector) {
            if let Some(mut row) = self.rows.get_mut(&id) {
                update.apply(&mut row);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn find_one(&self, selector: &ShareSelector) -> AppResult<Option<ShareRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|e| selector.matches(e.value()))
            .min_by_key(|e| *e.key())
            .map(|e| e.value().clone()))
    }

    fn find_many(&self, predicate: ListPredicate) -> BoxStream<'_, AppResult<ShareRow>> {
        let mut rows: Vec<ShareRow> = self
            .rows
            .iter()
            .filter(|e| predicate.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        stream::iter(rows.into_iter().map(Ok)).boxed()
    }

    async fn delete(&self, selector: &ShareSelector) -> AppResult<u64> {
        let mut affected = 0;
        for id in self.matching_ids(selector) {
            if let Some((_, row)) = self.rows.remove(&id) {
                self.live_tokens.remove_if(&row.token, |_, live| *live == id);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn mark_orphan(&self, predicate: &OrphanPredicate) -> AppResult<u64> {
        let mut orphaned = Vec::new();
        for mut entry in self.rows.iter_mut() {
            if predicate.matches(entry.value()) {
                entry.value_mut().orphan = Some(true);
                orphaned.push((*entry.key(), entry.value().token.clone()));
            }
        }
        // Released only after the row locks above are dropped.
        for (id, token) in &orphaned {
            self.live_tokens.remove_if(token, |_, live| live == id);
        }
        Ok(orphaned.len() as u64)
    }
}
