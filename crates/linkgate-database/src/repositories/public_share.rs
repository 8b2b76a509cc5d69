//! PostgreSQL share store over the legacy `oc_share` table.
//!
//! Statements are assembled with [`QueryBuilder`]: only column names and
//! operators are pushed as text, every value goes through `push_bind`.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;

use linkgate_core::error::{AppError, ErrorKind};
use linkgate_core::result::AppResult;
use linkgate_entity::share::{NewShareRow, ShareId, ShareRow};

use crate::store::{
    FieldUpdate, ListPredicate, OrphanPredicate, SHARE_TYPE, ShareKey, ShareSelector, ShareStore,
    Visibility,
};

/// Columns read back for every share. Legacy rows may hold `NULL` in text
/// columns, which are folded to empty strings.
const SELECT_COLUMNS: &str = "SELECT id, \
    COALESCE(uid_owner, '') AS uid_owner, \
    COALESCE(uid_initiator, '') AS uid_initiator, \
    COALESCE(item_type, '') AS item_type, \
    COALESCE(fileid_prefix, '') AS fileid_prefix, \
    COALESCE(item_source, '') AS item_source, \
    permissions, stime, \
    COALESCE(token, '') AS token, \
    COALESCE(share_name, '') AS share_name, \
    COALESCE(quicklink, FALSE) AS quicklink, \
    COALESCE(description, '') AS description, \
    COALESCE(internal, FALSE) AS internal, \
    share_with, expiration, orphan \
    FROM oc_share";

const LIVE: &str = " WHERE (orphan IS NULL OR orphan = FALSE) AND share_type = ";

/// Share store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgShareStore {
    pool: PgPool,
    batch_size: u32,
}

impl PgShareStore {
    /// Create a store that pages listings `batch_size` rows at a time.
    pub fn new(pool: PgPool, batch_size: u32) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
        }
    }
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

fn push_selector(qb: &mut QueryBuilder<'static, Postgres>, selector: &ShareSelector) {
    match &selector.key {
        ShareKey::Id(id) => {
            qb.push(" AND id = ").push_bind(id.0);
        }
        ShareKey::Token(token) => {
            qb.push(" AND token = ").push_bind(token.clone());
        }
    }
    if let Some(uid) = &selector.scope {
        push_owned_by(qb, uid);
    }
}

fn push_owned_by(qb: &mut QueryBuilder<'static, Postgres>, uid: &str) {
    qb.push(" AND (uid_owner = ")
        .push_bind(uid.to_string())
        .push(" OR uid_initiator = ")
        .push_bind(uid.to_string())
        .push(")");
}

pub(crate) fn insert_query(row: &NewShareRow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "INSERT INTO oc_share (share_type, uid_owner, uid_initiator, item_type, fileid_prefix, \
         item_source, file_source, permissions, stime, token, share_name, quicklink, description, \
         internal, share_with, expiration) VALUES (",
    );
    let mut values = qb.separated(", ");
    values
        .push_bind(SHARE_TYPE)
        .push_bind(row.uid_owner.clone())
        .push_bind(row.uid_initiator.clone())
        .push_bind(row.item_type.as_str())
        .push_bind(row.resource_id.storage_id.clone())
        .push_bind(row.resource_id.opaque_id.clone())
        .push_bind(row.resource_id.file_source())
        .push_bind(i32::from(row.permissions))
        .push_bind(row.stime)
        .push_bind(row.token.clone())
        .push_bind(row.share_name.clone())
        .push_bind(row.quicklink)
        .push_bind(row.description.clone())
        .push_bind(row.internal)
        .push_bind(row.password_hash.clone())
        .push_bind(row.expiration);
    qb.push(") RETURNING id");
    qb
}

pub(crate) fn select_one_query(selector: &ShareSelector) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(LIVE).push_bind(SHARE_TYPE);
    push_selector(&mut qb, selector);
    qb
}

pub(crate) fn update_query(
    selector: &ShareSelector,
    update: &FieldUpdate,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE oc_share SET ");
    qb.push(update.column()).push(" = ");
    match update {
        FieldUpdate::DisplayName(v) | FieldUpdate::PasswordHash(v) | FieldUpdate::Description(v) => {
            qb.push_bind(v.clone());
        }
        FieldUpdate::Permissions(bits) => {
            qb.push_bind(*bits);
        }
        FieldUpdate::Expiration(exp) => {
            qb.push_bind(*exp);
        }
    }
    qb.push(LIVE).push_bind(SHARE_TYPE);
    push_selector(&mut qb, selector);
    qb
}

pub(crate) fn delete_query(selector: &ShareSelector) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("DELETE FROM oc_share");
    qb.push(LIVE).push_bind(SHARE_TYPE);
    push_selector(&mut qb, selector);
    qb
}

pub(crate) fn orphan_query(predicate: &OrphanPredicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE oc_share SET orphan = TRUE");
    qb.push(LIVE)
        .push_bind(SHARE_TYPE)
        .push(" AND expiration IS NOT NULL AND expiration <= ")
        .push_bind(predicate.expired_at);
    if let Some(token) = &predicate.token {
        qb.push(" AND token = ").push_bind(token.clone());
    }
    qb
}

/// One page of a listing: rows with `id > after`, in id order.
pub(crate) fn list_page_query(
    predicate: &ListPredicate,
    after: i64,
    limit: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(LIVE)
        .push_bind(SHARE_TYPE)
        .push(" AND (internal IS NULL OR internal = FALSE)");

    if !predicate.resources.is_empty() {
        qb.push(" AND (");
        for (i, resource) in predicate.resources.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("(fileid_prefix = ")
                .push_bind(resource.storage_id.clone())
                .push(" AND item_source = ")
                .push_bind(resource.opaque_id.clone())
                .push(")");
        }
        qb.push(")");
    }
    push_any_of(&mut qb, "uid_owner", &predicate.owners);
    push_any_of(&mut qb, "uid_initiator", &predicate.creators);

    if let Visibility::OwnedBy(uid) = &predicate.visibility {
        push_owned_by(&mut qb, uid);
    }

    qb.push(" AND id > ")
        .push_bind(after)
        .push(" ORDER BY id LIMIT ")
        .push_bind(i64::from(limit));
    qb
}

fn push_any_of(qb: &mut QueryBuilder<'static, Postgres>, column: &'static str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    qb.push(" AND (");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(column).push(" = ").push_bind(value.clone());
    }
    qb.push(")");
}

fn decode_row(row: &PgRow) -> AppResult<ShareRow> {
    ShareRow::from_row(row).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed share row: {e}"),
            e,
        )
    })
}

#[async_trait]
impl ShareStore for PgShareStore {
    async fn insert(&self, row: &NewShareRow) -> AppResult<ShareId> {
        let id: i64 = insert_query(row)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to insert share"))?;
        debug!(share_id = id, "Inserted public share row");
        Ok(ShareId(id))
    }

    async fn update_fields(
        &self,
        selector: &ShareSelector,
        update: &FieldUpdate,
    ) -> AppResult<u64> {
        let result = update_query(selector, update)
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update share"))?;
        Ok(result.rows_affected())
    }

    async fn find_one(&self, selector: &ShareSelector) -> AppResult<Option<ShareRow>> {
        let row = select_one_query(selector)
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find share"))?;
        row.as_ref().map(decode_row).transpose()
    }

    fn find_many(&self, predicate: ListPredicate) -> BoxStream<'_, AppResult<ShareRow>> {
        let limit = self.batch_size;
        let pages = stream::try_unfold(Some(0_i64), move |cursor| {
            let predicate = predicate.clone();
            let pool = self.pool.clone();
            async move {
                let Some(after) = cursor else {
                    return Ok(None);
                };
                let rows = list_page_query(&predicate, after, limit)
                    .build()
                    .fetch_all(&pool)
                    .await
                    .map_err(db_error("Failed to list shares"))?;
                if rows.is_empty() {
                    return Ok(None);
                }
                let next = if rows.len() < limit as usize {
                    None
                } else {
                    let last = rows.last().map(|r| r.try_get::<i64, _>("id")).transpose();
                    last.map_err(db_error("Failed to read listing cursor"))?
                };
                let page: Vec<AppResult<ShareRow>> = rows.iter().map(decode_row).collect();
                Ok::<_, AppError>(Some((page, next)))
            }
        });
        pages.map_ok(stream::iter).try_flatten().boxed()
    }

    async fn delete(&self, selector: &ShareSelector) -> AppResult<u64> {
        let result = delete_query(selector)
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete share"))?;
        Ok(result.rows_affected())
    }

    async fn mark_orphan(&self, predicate: &OrphanPredicate) -> AppResult<u64> {
        let result = orphan_query(predicate)
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to orphan expired shares"))?;
        Ok(result.rows_affected())
    }
}
