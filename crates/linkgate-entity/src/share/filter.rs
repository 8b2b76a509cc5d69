//! Filters accepted when listing shares.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceId;
use crate::user::UserId;

/// One listing filter. Filters of the same kind are OR-ed, kinds are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    /// Shares of a given resource.
    ResourceId(ResourceId),
    /// Shares owned by a given user.
    Owner(UserId),
    /// Shares created by a given user.
    Creator(UserId),
}
