//! # linkgate-entity
//!
//! Domain entity models for LinkGate. Structs in this crate are either
//! rows of the legacy `oc_share` table (deriving `sqlx::FromRow`) or value
//! objects exchanged with callers of the share manager.

pub mod resource;
pub mod share;
pub mod user;
