//! Capability signatures and authentication attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed proof of access to a password protected share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSignature {
    /// Hex encoded MAC.
    pub signature: String,
    /// Instant after which the signature is no longer accepted.
    pub expiration: DateTime<Utc>,
}

/// What an anonymous caller presents when opening a link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareAuthentication {
    /// Nothing presented.
    #[default]
    None,
    /// The share password in plaintext.
    Password(String),
    /// A signature issued earlier for this share.
    Signature(ShareSignature),
}
