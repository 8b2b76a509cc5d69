//! HMAC-SHA512 capability signatures.
//!
//! A signature proves the holder authenticated against a protected share
//! recently. It is keyed by the share's stored password hash, so changing
//! or clearing the password invalidates every outstanding signature.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha512;

use linkgate_core::error::AppError;
use linkgate_entity::share::ShareSignature;

type HmacSha512 = Hmac<Sha512>;

/// Issues and checks capability signatures.
#[derive(Debug, Clone)]
pub struct CapabilitySigner {
    ttl: Duration,
}

impl CapabilitySigner {
    /// Create a signer whose signatures are valid for `ttl_seconds`.
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self { ttl }
    }

    /// Sign `token` until `expiration` with `secret`.
    pub fn sign(
        &self,
        token: &str,
        secret: &str,
        expiration: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let mac = mac_for(token, secret, expiration)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check `candidate` against the signature for `token` and `expiration`.
    pub fn verify(
        &self,
        token: &str,
        secret: &str,
        expiration: DateTime<Utc>,
        candidate: &str,
    ) -> bool {
        self.verify_at(Utc::now(), token, secret, expiration, candidate)
    }

    /// Like [`verify`](Self::verify), evaluated at `now`.
    pub fn verify_at(
        &self,
        now: DateTime<Utc>,
        token: &str,
        secret: &str,
        expiration: DateTime<Utc>,
        candidate: &str,
    ) -> bool {
        if now >= expiration {
            return false;
        }
        let Ok(bytes) = hex::decode(candidate) else {
            return false;
        };
        match mac_for(token, secret, expiration) {
            Ok(mac) => mac.verify_slice(&bytes).is_ok(),
            Err(_) => false,
        }
    }

    /// Produce a fresh signature for `token`.
    ///
    /// The window never outlives the share itself.
    pub fn issue(
        &self,
        token: &str,
        secret: &str,
        share_expiration: Option<DateTime<Utc>>,
    ) -> Result<ShareSignature, AppError> {
        let window_end = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let end = share_expiration.map_or(window_end, |exp| exp.min(window_end));
        let expiration = DateTime::<Utc>::from_timestamp(end.timestamp(), 0).unwrap_or(end);

        Ok(ShareSignature {
            signature: self.sign(token, secret, expiration)?,
            expiration,
        })
    }
}

fn mac_for(token: &str, secret: &str, expiration: DateTime<Utc>) -> Result<HmacSha512, AppError> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to key signature MAC: {e}")))?;
    mac.update(token.as_bytes());
    mac.update(b"|");
    mac.update(
        expiration
            .to_rfc3339_opts(SecondsFormat::Secs, true)
            .as_bytes(),
    );
    Ok(mac)
}
