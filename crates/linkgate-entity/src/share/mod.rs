//! Public link share domain entities.

pub mod filter;
pub mod grant;
pub mod model;
pub mod permissions;
pub mod reference;
pub mod signature;

pub use filter::ListFilter;
pub use grant::{Grant, ShareUpdate, UpdateKind, UpdateRequest};
pub use model::{NewShareRow, PUBLIC_LINK_SHARE_TYPE, PublicShare, ShareId, ShareRow};
pub use permissions::SharePermissions;
pub use reference::ShareReference;
pub use signature::{ShareAuthentication, ShareSignature};
