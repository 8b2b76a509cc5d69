//! Client secrets for public links.
//!
//! A client opening a public link identifies with the share token and a
//! secret of one of two forms:
//!
//! - `password|<plaintext>`
//! - `signature|<hex signature>|<RFC 3339 expiration>`

use std::str::FromStr;

use chrono::{DateTime, Utc};

use linkgate_core::error::AppError;
use linkgate_entity::share::{ShareAuthentication, ShareSignature};

const PASSWORD_PREFIX: &str = "password";
const SIGNATURE_PREFIX: &str = "signature";

/// A parsed public-share client secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicShareCredentials(ShareAuthentication);

impl PublicShareCredentials {
    /// Parse a client secret.
    pub fn parse(secret: &str) -> Result<Self, AppError> {
        secret.parse()
    }

    /// The authentication attempt carried by the secret.
    pub fn into_authentication(self) -> ShareAuthentication {
        self.0
    }

    /// Render back to the wire form.
    pub fn to_secret(&self) -> String {
        match &self.0 {
            ShareAuthentication::None => String::new(),
            ShareAuthentication::Password(p) => format!("{PASSWORD_PREFIX}|{p}"),
            ShareAuthentication::Signature(sig) => format!(
                "{SIGNATURE_PREFIX}|{}|{}",
                sig.signature,
                sig.expiration.to_rfc3339()
            ),
        }
    }
}

impl From<ShareAuthentication> for PublicShareCredentials {
    fn from(auth: ShareAuthentication) -> Self {
        Self(auth)
    }
}

impl FromStr for PublicShareCredentials {
    type Err = AppError;

    fn from_str(secret: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = secret
            .split_once('|')
            .ok_or_else(|| AppError::invalid_credentials("Malformed public share secret"))?;

        match kind {
            // Passwords may themselves contain '|'.
            PASSWORD_PREFIX => Ok(Self(ShareAuthentication::Password(rest.to_string()))),
            SIGNATURE_PREFIX => {
                let (signature, expiration) = rest.split_once('|').ok_or_else(|| {
                    AppError::invalid_credentials("Signature secret has no expiration")
                })?;
                let expiration = DateTime::parse_from_rfc3339(expiration)
                    .map_err(|e| {
                        AppError::invalid_credentials(format!(
                            "Invalid signature expiration: {e}"
                        ))
                    })?
                    .with_timezone(&Utc);
                Ok(Self(ShareAuthentication::Signature(ShareSignature {
                    signature: signature.to_string(),
                    expiration,
                })))
            }
            other => Err(AppError::invalid_credentials(format!(
                "Unsupported public share secret type: '{other}'"
            ))),
        }
    }
}
