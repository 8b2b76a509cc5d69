//! # linkgate-service
//!
//! The public link share manager and everything it composes: token
//! generation, list filter construction, expired share reclamation, and the
//! public-share auth provider.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod resolver;
pub mod share;

pub use auth::{AuthManager, AuthManagerRegistry, AuthOutcome, PublicShareAuthProvider};
pub use context::RequestContext;
pub use resolver::{ResourceResolver, StaticResourceResolver};
pub use share::{ExpiredShareCleanup, FilterEngine, Janitor, ShareManager, TokenGenerator};
