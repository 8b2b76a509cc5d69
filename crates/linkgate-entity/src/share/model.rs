//! Public share entity model and its `oc_share` row layout.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use linkgate_core::error::AppError;

use super::permissions::SharePermissions;
use super::signature::ShareSignature;
use crate::resource::{ItemType, ResourceId};
use crate::user::UserId;

/// `share_type` discriminator of public links in the shared `oc_share` table.
pub const PUBLIC_LINK_SHARE_TYPE: i32 = 3;

/// Store-assigned share identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareId(pub i64);

impl ShareId {
    /// Return the inner value.
    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShareId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for ShareId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A row of `oc_share` as read back by the share store.
///
/// Legacy nullable text columns are read through `COALESCE(.., '')`, so
/// only `share_with`, `expiration` and `orphan` are optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShareRow {
    /// Primary key.
    pub id: i64,
    /// Resource owner.
    pub uid_owner: String,
    /// Share creator.
    pub uid_initiator: String,
    /// `file`, `folder`, ...
    pub item_type: String,
    /// Storage provider id of the resource.
    pub fileid_prefix: String,
    /// Opaque id of the resource.
    pub item_source: String,
    /// Permission bitmask.
    pub permissions: i32,
    /// Creation time, epoch seconds.
    pub stime: i64,
    /// Public token.
    pub token: String,
    /// Display name.
    pub share_name: String,
    /// Quicklink flag.
    pub quicklink: bool,
    /// Free text description.
    pub description: String,
    /// Internal (not publicly listed) flag.
    pub internal: bool,
    /// Versioned password hash; empty or `NULL` when unprotected.
    #[serde(skip_serializing)]
    pub share_with: Option<String>,
    /// Expiration instant.
    pub expiration: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub orphan: Option<bool>,
}

impl ShareRow {
    /// The stored password hash, when the share is protected.
    pub fn password_hash(&self) -> Option<&str> {
        self.share_with.as_deref().filter(|h| !h.is_empty())
    }

    /// Whether the row has been reclaimed by the janitor.
    pub fn is_orphan(&self) -> bool {
        self.orphan.unwrap_or(false)
    }

    /// Whether the row is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| now >= exp)
    }
}

/// Column values written when a share is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareRow {
    /// Resource owner.
    pub uid_owner: String,
    /// Share creator.
    pub uid_initiator: String,
    /// Resource kind.
    pub item_type: ItemType,
    /// Resource reference.
    pub resource_id: ResourceId,
    /// Permission bitmask.
    pub permissions: SharePermissions,
    /// Creation time, epoch seconds.
    pub stime: i64,
    /// Public token.
    pub token: String,
    /// Display name.
    pub share_name: String,
    /// Quicklink flag.
    pub quicklink: bool,
    /// Free text description.
    pub description: String,
    /// Internal flag.
    pub internal: bool,
    /// Versioned password hash, if protected.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Expiration instant, if any.
    pub expiration: Option<DateTime<Utc>>,
}

/// A public link share as returned to callers.
///
/// The password hash never leaves the store layer; callers only learn
/// whether the share is protected, and may receive a capability signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicShare {
    /// Store-assigned id.
    pub id: ShareId,
    /// Public token used in links.
    pub token: String,
    /// Shared resource.
    pub resource_id: ResourceId,
    /// Kind of the shared resource.
    pub resource_type: ItemType,
    /// Resource owner.
    pub owner: UserId,
    /// Share creator.
    pub creator: UserId,
    /// Granted permissions.
    pub permissions: SharePermissions,
    /// Display name.
    pub display_name: String,
    /// Free text description.
    pub description: String,
    /// Derived from the presence of a password hash.
    pub password_protected: bool,
    /// Expiration instant, if any.
    pub expiration: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Quicklink flag.
    pub quicklink: bool,
    /// Internal flag.
    pub internal: bool,
    /// Capability signature, attached on request for protected shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<ShareSignature>,
}

impl TryFrom<ShareRow> for PublicShare {
    type Error = AppError;

    fn try_from(row: ShareRow) -> Result<Self, Self::Error> {
        if row.token.is_empty() {
            return Err(AppError::serialization(format!(
                "Share {} has an empty token",
                row.id
            )));
        }
        let resource_type = row.item_type.parse::<ItemType>()?;
        let permissions = SharePermissions::try_from(row.permissions).map_err(|bits| {
            AppError::serialization(format!("Share {} has invalid permissions {bits}", row.id))
        })?;
        let created_at = DateTime::<Utc>::from_timestamp(row.stime, 0).ok_or_else(|| {
            AppError::serialization(format!("Share {} has invalid stime {}", row.id, row.stime))
        })?;
        let password_protected = row.password_hash().is_some();

        Ok(Self {
            id: ShareId(row.id),
            token: row.token,
            resource_id: ResourceId::new(row.fileid_prefix, row.item_source),
            resource_type,
            owner: UserId::from_stored(row.uid_owner),
            creator: UserId::from_stored(row.uid_initiator),
            permissions,
            display_name: row.share_name,
            description: row.description,
            password_protected,
            expiration: row.expiration,
            created_at,
            quicklink: row.quicklink,
            internal: row.internal,
            signature: None,
        })
    }
}
