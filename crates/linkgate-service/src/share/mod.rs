//! Public link shares: lifecycle, listing filters, and reclamation.

pub mod cleanup;
pub mod filter;
pub mod janitor;
pub mod link;
pub mod service;

pub use cleanup::ExpiredShareCleanup;
pub use filter::FilterEngine;
pub use janitor::Janitor;
pub use link::TokenGenerator;
pub use service::ShareManager;
