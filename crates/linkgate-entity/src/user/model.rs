//! Identity references supplied by the directory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user as issued by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId {
    /// Identity provider that issued the account.
    pub idp: String,
    /// Provider-scoped account identifier.
    pub opaque_id: String,
}

impl UserId {
    /// Create a user id.
    pub fn new(idp: impl Into<String>, opaque_id: impl Into<String>) -> Self {
        Self {
            idp: idp.into(),
            opaque_id: opaque_id.into(),
        }
    }

    /// Rebuild an id from the value kept in `uid_owner` / `uid_initiator`.
    ///
    /// The table only keeps the opaque id, so the provider is unknown.
    pub fn from_stored(uid: impl Into<String>) -> Self {
        Self {
            idp: String::new(),
            opaque_id: uid.into(),
        }
    }

    /// The value written to `uid_owner` / `uid_initiator`.
    pub fn stored_form(&self) -> &str {
        &self.opaque_id
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.idp.is_empty() {
            write!(f, "{}", self.opaque_id)
        } else {
            write!(f, "{}@{}", self.opaque_id, self.idp)
        }
    }
}

/// An authenticated caller together with its group memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Groups the account belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl User {
    /// Create a user without group memberships.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            groups: Vec::new(),
        }
    }

    /// Add group memberships.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Whether the user is a member of `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}
