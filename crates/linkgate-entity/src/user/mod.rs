//! Caller identities.

pub mod model;

pub use model::{User, UserId};
