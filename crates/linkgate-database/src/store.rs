//! The share store contract and the typed predicates it accepts.
//!
//! Every operation is implicitly scoped to public links
//! ([`PUBLIC_LINK_SHARE_TYPE`]) and, except for inserts, to rows that are
//! not orphaned. Predicates are closed data types rather than SQL fragments,
//! so drivers decide how to render them and caller values can only ever
//! reach a driver as bound parameters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use linkgate_core::result::AppResult;
use linkgate_entity::resource::ResourceId;
use linkgate_entity::share::{NewShareRow, PUBLIC_LINK_SHARE_TYPE, ShareId, ShareRow};

/// Persistence for public link shares.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Insert a new share and return its id.
    async fn insert(&self, row: &NewShareRow) -> AppResult<ShareId>;

    /// Apply one field update to the selected share; returns rows affected.
    async fn update_fields(&self, selector: &ShareSelector, update: &FieldUpdate)
    -> AppResult<u64>;

    /// Fetch the selected share.
    async fn find_one(&self, selector: &ShareSelector) -> AppResult<Option<ShareRow>>;

    /// Lazily stream every share matching `predicate`, ordered by id.
    ///
    /// The stream is finite and not restartable. Dropping it early releases
    /// whatever the driver holds. A row that cannot be decoded is yielded as
    /// an error of kind `Serialization` without ending the stream; any other
    /// error ends it.
    fn find_many(&self, predicate: ListPredicate) -> BoxStream<'_, AppResult<ShareRow>>;

    /// Hard delete the selected share; returns rows affected.
    async fn delete(&self, selector: &ShareSelector) -> AppResult<u64>;

    /// Flag expired shares as orphaned; returns rows newly flagged.
    async fn mark_orphan(&self, predicate: &OrphanPredicate) -> AppResult<u64>;
}

/// The key of a single share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareKey {
    /// Primary key.
    Id(ShareId),
    /// Public token.
    Token(String),
}

/// Addresses one share, optionally restricted to an owner or creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSelector {
    /// Which share.
    pub key: ShareKey,
    /// When set, the share must be owned or created by this stored uid.
    pub scope: Option<String>,
}

impl ShareSelector {
    /// Select by id, restricted to `uid` as owner or creator.
    pub fn by_id_for(id: ShareId, uid: impl Into<String>) -> Self {
        Self {
            key: ShareKey::Id(id),
            scope: Some(uid.into()),
        }
    }

    /// Select by token, restricted to `uid` as owner or creator.
    pub fn by_token_for(token: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            key: ShareKey::Token(token.into()),
            scope: Some(uid.into()),
        }
    }

    /// Select by token with no ownership restriction.
    pub fn by_token(token: impl Into<String>) -> Self {
        Self {
            key: ShareKey::Token(token.into()),
            scope: None,
        }
    }

    /// Whether a live row satisfies this selector.
    pub fn matches(&self, row: &ShareRow) -> bool {
        if row.is_orphan() {
            return false;
        }
        let key_matches = match &self.key {
            ShareKey::Id(id) => row.id == id.0,
            ShareKey::Token(token) => &row.token == token,
        };
        key_matches && scope_matches(self.scope.as_deref(), row)
    }
}

/// Which shares a listing may return regardless of filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Only shares the stored uid owns or created.
    OwnedBy(String),
    /// Every share, used for project space admins.
    Unrestricted,
}

/// Listing predicate: base scope plus caller filters.
///
/// Non-empty filter groups are OR-ed internally and AND-ed together.
/// Internal shares are never listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPredicate {
    /// Resource filters.
    pub resources: Vec<ResourceId>,
    /// Owner filters (stored uids).
    pub owners: Vec<String>,
    /// Creator filters (stored uids).
    pub creators: Vec<String>,
    /// Ownership restriction.
    pub visibility: Visibility,
}

impl ListPredicate {
    /// A predicate with no filters.
    pub fn new(visibility: Visibility) -> Self {
        Self {
            resources: Vec::new(),
            owners: Vec::new(),
            creators: Vec::new(),
            visibility,
        }
    }

    /// Whether a row satisfies this predicate.
    pub fn matches(&self, row: &ShareRow) -> bool {
        if row.is_orphan() || row.internal {
            return false;
        }
        let resource_ok = self.resources.is_empty()
            || self
                .resources
                .iter()
                .any(|r| r.storage_id == row.fileid_prefix && r.opaque_id == row.item_source);
        let owner_ok = self.owners.is_empty() || self.owners.iter().any(|o| *o == row.uid_owner);
        let creator_ok =
            self.creators.is_empty() || self.creators.iter().any(|c| *c == row.uid_initiator);
        let visible = match &self.visibility {
            Visibility::OwnedBy(uid) => scope_matches(Some(uid), row),
            Visibility::Unrestricted => true,
        };
        resource_ok && owner_ok && creator_ok && visible
    }
}

/// One column group to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// `share_name`.
    DisplayName(String),
    /// `permissions`.
    Permissions(i32),
    /// `expiration`; `None` clears it.
    Expiration(Option<DateTime<Utc>>),
    /// `share_with`; empty string clears protection.
    PasswordHash(String),
    /// `description`.
    Description(String),
}

impl FieldUpdate {
    /// Column written by this update.
    pub fn column(&self) -> &'static str {
        match self {
            Self::DisplayName(_) => "share_name",
            Self::Permissions(_) => "permissions",
            Self::Expiration(_) => "expiration",
            Self::PasswordHash(_) => "share_with",
            Self::Description(_) => "description",
        }
    }

    /// Apply the update to an in-memory row.
    pub fn apply(&self, row: &mut ShareRow) {
        match self {
            Self::DisplayName(name) => row.share_name = name.clone(),
            Self::Permissions(bits) => row.permissions = *bits,
            Self::Expiration(exp) => row.expiration = *exp,
            Self::PasswordHash(hash) => row.share_with = Some(hash.clone()),
            Self::Description(text) => row.description = text.clone(),
        }
    }
}

/// Selects live shares whose expiration has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanPredicate {
    /// Shares with `expiration <= expired_at` are reclaimed.
    pub expired_at: DateTime<Utc>,
    /// Narrow the sweep to a single token.
    pub token: Option<String>,
}

impl OrphanPredicate {
    /// Every share expired at `now`.
    pub fn expired_at(now: DateTime<Utc>) -> Self {
        Self {
            expired_at: now,
            token: None,
        }
    }

    /// Only the share with `token`, if it is expired at `now`.
    pub fn single(now: DateTime<Utc>, token: impl Into<String>) -> Self {
        Self {
            expired_at: now,
            token: Some(token.into()),
        }
    }

    /// Whether a live row would be reclaimed.
    pub fn matches(&self, row: &ShareRow) -> bool {
        !row.is_orphan()
            && row.is_expired_at(self.expired_at)
            && self.token.as_ref().is_none_or(|t| *t == row.token)
    }
}

/// Share type every driver scopes its statements to.
pub const SHARE_TYPE: i32 = PUBLIC_LINK_SHARE_TYPE;

fn scope_matches(scope: Option<&str>, row: &ShareRow) -> bool {
    scope.is_none_or(|uid| row.uid_owner == uid || row.uid_initiator == uid)
}
