//! # linkgate-database
//!
//! Persistence for public link shares: the [`ShareStore`] contract, the
//! PostgreSQL driver over the legacy `oc_share` table, an in-memory driver,
//! and the [`ShareStoreManager`] that picks one by name.

pub mod connection;
pub mod manager;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use manager::ShareStoreManager;
pub use store::{
    FieldUpdate, ListPredicate, OrphanPredicate, ShareKey, ShareSelector, ShareStore, Visibility,
};
