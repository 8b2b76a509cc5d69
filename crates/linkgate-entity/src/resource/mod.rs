//! Storage resources that shares point at.

pub mod model;

pub use model::{ItemType, ResourceId, ResourceInfo};
