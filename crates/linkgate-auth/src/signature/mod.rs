//! Capability signatures for password protected shares.

pub mod signer;

pub use signer::CapabilitySigner;
