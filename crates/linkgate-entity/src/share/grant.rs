//! Grants and update requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use linkgate_core::error::AppError;

use super::permissions::SharePermissions;
use super::reference::ShareReference;

/// Access granted by a link: permissions, optional password, optional expiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grant {
    /// Granted permissions.
    pub permissions: SharePermissions,
    /// Plaintext password; `None` or empty means unprotected.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Expiration; `None` or the Unix epoch means never.
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
}

impl Grant {
    /// Create a grant with the given permissions and nothing else.
    pub fn new(permissions: SharePermissions) -> Self {
        Self {
            permissions,
            password: None,
            expiration: None,
        }
    }

    /// Set a password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set an expiration.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// The password, if one was actually supplied.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// The expiration, if set to something other than the zero timestamp.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration.filter(|exp| exp.timestamp() != 0)
    }
}

/// Which field group an update touches. Must be set explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// No field group selected; always rejected.
    #[default]
    Unspecified,
    /// `displayName` from the request.
    DisplayName,
    /// `permissions` from the grant.
    Permissions,
    /// `expiration` from the grant.
    Expiration,
    /// `password` from the grant.
    Password,
    /// `description` from the request.
    Description,
}

/// An update as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Share to update.
    pub reference: ShareReference,
    /// Field group to update.
    pub kind: UpdateKind,
    /// New display name, read for [`UpdateKind::DisplayName`].
    #[serde(default)]
    pub display_name: String,
    /// New description, read for [`UpdateKind::Description`].
    #[serde(default)]
    pub description: String,
}

impl UpdateRequest {
    /// Create an update request with empty payload fields.
    pub fn new(reference: ShareReference, kind: UpdateKind) -> Self {
        Self {
            reference,
            kind,
            display_name: String::new(),
            description: String::new(),
        }
    }
}

/// A validated update carrying exactly the data of one field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareUpdate {
    /// Rename the share.
    DisplayName(String),
    /// Replace the permission bitmask.
    Permissions(SharePermissions),
    /// Replace or clear the expiration.
    Expiration(Option<DateTime<Utc>>),
    /// Set a new plaintext password, or clear protection with `None`.
    Password(Option<String>),
    /// Replace the description.
    Description(String),
}

impl ShareUpdate {
    /// Pick the field group named by `request.kind`.
    pub fn from_request(request: &UpdateRequest, grant: &Grant) -> Result<Self, AppError> {
        match request.kind {
            UpdateKind::Unspecified => Err(AppError::validation("Invalid update type: unspecified")),
            UpdateKind::DisplayName => Ok(Self::DisplayName(request.display_name.clone())),
            UpdateKind::Permissions => Ok(Self::Permissions(grant.permissions)),
            UpdateKind::Expiration => Ok(Self::Expiration(grant.expiration())),
            UpdateKind::Password => Ok(Self::Password(grant.password().map(str::to_owned))),
            UpdateKind::Description => Ok(Self::Description(request.description.clone())),
        }
    }
}
