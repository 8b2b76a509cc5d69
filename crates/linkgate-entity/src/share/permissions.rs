//! Share permission bitmask.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Operations granted through a share, persisted as an integer bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharePermissions(u32);

impl SharePermissions {
    /// List and download.
    pub const READ: Self = Self(1);
    /// Overwrite existing content.
    pub const UPDATE: Self = Self(2);
    /// Upload new content.
    pub const CREATE: Self = Self(4);
    /// Remove content.
    pub const DELETE: Self = Self(8);
    /// Re-share.
    pub const SHARE: Self = Self(16);

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Read-only link.
    pub const fn viewer() -> Self {
        Self::READ
    }

    /// Read-write link.
    pub const fn editor() -> Self {
        Self(Self::READ.0 | Self::UPDATE.0 | Self::CREATE.0 | Self::DELETE.0)
    }

    /// Upload-only ("drop box") link.
    pub const fn uploader() -> Self {
        Self::CREATE
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no permission is granted.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SharePermissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl TryFrom<i32> for SharePermissions {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Self).map_err(|_| value)
    }
}

impl From<SharePermissions> for i32 {
    fn from(value: SharePermissions) -> Self {
        value.0 as i32
    }
}

impl fmt::Display for SharePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
