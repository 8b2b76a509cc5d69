//! Resource references and the metadata returned by a storage provider stat.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use linkgate_core::error::AppError;

use crate::user::UserId;

/// A storage-provider scoped resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Storage provider instance; persisted as `fileid_prefix`.
    pub storage_id: String,
    /// Provider-local id; persisted as `item_source`.
    pub opaque_id: String,
}

impl ResourceId {
    /// Create a resource id.
    pub fn new(storage_id: impl Into<String>, opaque_id: impl Into<String>) -> Self {
        Self {
            storage_id: storage_id.into(),
            opaque_id: opaque_id.into(),
        }
    }

    /// Numeric form of the opaque id, written to `file_source`.
    ///
    /// Non-numeric ids, and ids that do not fit the column, map to `0`.
    pub fn file_source(&self) -> i64 {
        self.opaque_id
            .parse::<u64>()
            .ok()
            .and_then(|v| i64::try_from(v).ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.storage_id, self.opaque_id)
    }
}

/// Kind of shared resource, persisted in `item_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A regular file.
    File,
    /// A directory.
    Folder,
    /// A reference to another resource.
    Reference,
    /// A symbolic link.
    Symlink,
}

impl ItemType {
    /// Column representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::Reference => "reference",
            Self::Symlink => "symlink",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            "reference" => Ok(Self::Reference),
            "symlink" => Ok(Self::Symlink),
            other => Err(AppError::serialization(format!(
                "Unknown item type: '{other}'"
            ))),
        }
    }
}

/// Result of a stat call against the storage provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Resource identifier.
    pub id: ResourceId,
    /// Resource kind.
    pub resource_type: ItemType,
    /// Owner of the resource, if the provider reports one.
    pub owner: Option<UserId>,
    /// Absolute path within the namespace, e.g. `/eos/project/c/cernbox`.
    pub path: String,
    /// Free-form metadata (`name`, `quicklink`, ...).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ResourceInfo {
    /// Create resource info without metadata.
    pub fn new(
        id: ResourceId,
        resource_type: ItemType,
        owner: Option<UserId>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            resource_type,
            owner,
            path: path.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The `quicklink` metadata flag.
    ///
    /// Accepts the usual boolean spellings (`1`, `t`, `true`, `TRUE`, ...);
    /// anything else, including absence, reads as `false`.
    pub fn quicklink(&self) -> bool {
        matches!(
            self.metadata.get("quicklink").map(String::as_str),
            Some("1" | "t" | "T" | "true" | "TRUE" | "True")
        )
    }

    /// The `name` metadata entry, used as the default share display name.
    pub fn display_name(&self) -> Option<&str> {
        self.metadata.get("name").map(String::as_str)
    }
}
