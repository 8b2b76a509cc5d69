//! Share store drivers.

pub mod memory;
pub mod public_share;

pub use memory::MemoryShareStore;
pub use public_share::PgShareStore;
