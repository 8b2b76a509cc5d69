//! # linkgate-auth
//!
//! Credential primitives used by the public link share manager.
//!
//! ## Modules
//!
//! - `password`: versioned share password hashing (Argon2id)
//! - `signature`: time-boxed HMAC capability signatures
//! - `credentials`: parsing of public-share client secrets

pub mod credentials;
pub mod password;
pub mod signature;

pub use credentials::PublicShareCredentials;
pub use password::PasswordHasher;
pub use signature::CapabilitySigner;
