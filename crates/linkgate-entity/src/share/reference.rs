//! References used to address a single share.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::ShareId;

/// Either the store-assigned id (private lookup) or the public token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareReference {
    /// Lookup by id, restricted to the owner or creator.
    Id(ShareId),
    /// Lookup by token, open to anyone holding the link.
    Token(String),
}

impl ShareReference {
    /// Reference a share by id.
    pub fn id(id: ShareId) -> Self {
        Self::Id(id)
    }

    /// Reference a share by token.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }
}

impl fmt::Display for ShareReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Token(token) => write!(f, "token:{token}"),
        }
    }
}
