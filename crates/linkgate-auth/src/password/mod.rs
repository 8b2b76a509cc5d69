//! Share password hashing.

pub mod hasher;

pub use hasher::{HASH_VERSION, PasswordHasher};
