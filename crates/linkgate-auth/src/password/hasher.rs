//! Versioned Argon2id hashing for share passwords.
//!
//! Stored hashes carry a version tag, `"<version>|<encoded hash>"`, so the
//! algorithm can change without invalidating existing shares.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::debug;

use linkgate_core::config::public_share::{MAX_PASSWORD_HASH_COST, MIN_PASSWORD_HASH_COST};
use linkgate_core::error::AppError;

/// Version tag of hashes produced by this hasher.
pub const HASH_VERSION: &str = "1";

const ARGON2_ITERATIONS: u32 = 2;
const ARGON2_LANES: u32 = 1;

/// Hashes and verifies share passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher for the given cost factor.
    ///
    /// The cost selects a memory budget of `2^(cost + 3)` KiB.
    pub fn new(cost: u32) -> Result<Self, AppError> {
        if !(MIN_PASSWORD_HASH_COST..=MAX_PASSWORD_HASH_COST).contains(&cost) {
            return Err(AppError::configuration(format!(
                "Password hash cost {cost} outside {MIN_PASSWORD_HASH_COST}..={MAX_PASSWORD_HASH_COST}"
            )));
        }
        let m_cost = 1u32 << (cost + 3);
        let params = Params::new(m_cost, ARGON2_ITERATIONS, ARGON2_LANES, None)
            .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { cost, params })
    }

    /// The configured cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(format!("{HASH_VERSION}|{hash}"))
    }

    /// Check a plaintext password against a stored, versioned hash.
    ///
    /// A missing or unknown version tag, or an unparsable hash, never
    /// matches.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((version, encoded)) = stored.split_once('|') else {
            debug!("Stored share password hash has no version tag");
            return false;
        };
        match version {
            HASH_VERSION => verify_argon2(password, encoded),
            other => {
                debug!(version = other, "Unknown share password hash version");
                false
            }
        }
    }
}

fn verify_argon2(password: &str, encoded: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(encoded) else {
        debug!("Stored share password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
