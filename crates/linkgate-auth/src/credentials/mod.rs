//! Client secrets presented for public links.

pub mod public_share;

pub use public_share::PublicShareCredentials;
