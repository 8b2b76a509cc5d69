//! Auth managers: turn client credentials into an authenticated outcome.
//!
//! Managers are looked up by name in an [`AuthManagerRegistry`]. The
//! registry only knows managers registered at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use linkgate_auth::PublicShareCredentials;
use linkgate_core::error::AppError;
use linkgate_core::result::AppResult;
use linkgate_entity::share::{PublicShare, ShareSignature};

use crate::share::ShareManager;

/// Name under which the public share auth manager is registered.
pub const PUBLIC_SHARES: &str = "publicshares";

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The share the credentials opened.
    pub share: PublicShare,
    /// Capability signature to present on later requests, for protected
    /// shares.
    pub signature: Option<ShareSignature>,
}

/// Authenticates a client id and secret pair.
#[async_trait]
pub trait AuthManager: Send + Sync + 'static {
    /// Registry name of this manager.
    fn name(&self) -> &'static str;

    /// Authenticate `client_id` with `client_secret`.
    async fn authenticate(&self, client_id: &str, client_secret: &str) -> AppResult<AuthOutcome>;
}

/// Authenticates holders of a public link.
///
/// The client id is the share token; the secret is a
/// [`PublicShareCredentials`] string.
#[derive(Debug, Clone)]
pub struct PublicShareAuthProvider {
    shares: Arc<ShareManager>,
}

impl PublicShareAuthProvider {
    /// Creates a provider over `shares`.
    pub fn new(shares: Arc<ShareManager>) -> Self {
        Self { shares }
    }
}

#[async_trait]
impl AuthManager for PublicShareAuthProvider {
    fn name(&self) -> &'static str {
        PUBLIC_SHARES
    }

    async fn authenticate(&self, client_id: &str, client_secret: &str) -> AppResult<AuthOutcome> {
        let auth = PublicShareCredentials::parse(client_secret)?.into_authentication();
        let share = self
            .shares
            .authenticate_by_token(client_id, &auth, true)
            .await?;
        debug!(share_id = %share.id, "Public share holder authenticated");
        let signature = share.signature.clone();
        Ok(AuthOutcome { share, signature })
    }
}

/// Dependencies handed to auth manager factories.
#[derive(Debug, Clone)]
pub struct AuthManagerDeps {
    /// The share manager.
    pub shares: Arc<ShareManager>,
}

/// Builds an auth manager.
pub type AuthManagerFactory = fn(&AuthManagerDeps) -> AppResult<Arc<dyn AuthManager>>;

/// Static, name-keyed table of auth manager factories.
#[derive(Debug, Clone)]
pub struct AuthManagerRegistry {
    factories: HashMap<&'static str, AuthManagerFactory>,
}

impl AuthManagerRegistry {
    /// A registry with the built-in managers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(PUBLIC_SHARES, |deps| {
            Ok(Arc::new(PublicShareAuthProvider::new(deps.shares.clone())))
        });
        registry
    }

    /// Register a factory, replacing any previous one with that name.
    pub fn register(&mut self, name: &'static str, factory: AuthManagerFactory) {
        self.factories.insert(name, factory);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build the manager registered as `name`.
    pub fn create(&self, name: &str, deps: &AuthManagerDeps) -> AppResult<Arc<dyn AuthManager>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Auth manager not found: '{name}'")))?;
        factory(deps)
    }
}

impl Default for AuthManagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
