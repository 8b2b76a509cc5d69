//! Shared test helpers for integration tests.

use std::sync::Arc;

use linkgate_core::config::PublicShareConfig;
use linkgate_database::ShareStoreManager;
use linkgate_database::repositories::MemoryShareStore;
use linkgate_entity::resource::{ItemType, ResourceId, ResourceInfo};
use linkgate_entity::share::ShareRow;
use linkgate_entity::user::{User, UserId};
use linkgate_service::{RequestContext, ShareManager, StaticResourceResolver};

/// Identity provider of every test user.
pub const IDP: &str = "https://idp.example.org";

/// Test application context
pub struct TestApp {
    /// Direct handle on the rows behind the manager
    pub memory: MemoryShareStore,
    /// Resource metadata returned by stat
    pub resolver: StaticResourceResolver,
    /// Store shared by the manager and the janitor
    pub store: Arc<ShareStoreManager>,
    /// The share manager under test
    pub shares: Arc<ShareManager>,
}

impl TestApp {
    /// Create a test application with cleanup enabled and the cheapest
    /// hashing cost.
    pub fn new() -> Self {
        Self::with_config(PublicShareConfig {
            driver: "memory".to_string(),
            password_hash_cost: 4,
            enable_expired_shares_cleanup: true,
            ..Default::default()
        })
    }

    /// Create a test application from explicit settings.
    pub fn with_config(config: PublicShareConfig) -> Self {
        let memory = MemoryShareStore::new();
        let resolver = StaticResourceResolver::new();
        let store = Arc::new(ShareStoreManager::from_store(Arc::new(memory.clone())));
        let shares = ShareManager::from_config(&config, store.clone(), Arc::new(resolver.clone()))
            .expect("Failed to build share manager");

        Self {
            memory,
            resolver,
            store,
            shares: Arc::new(shares),
        }
    }

    /// Stored row of the share with `token`, orphaned or not.
    pub fn row(&self, token: &str) -> ShareRow {
        self.memory
            .snapshot()
            .into_iter()
            .find(|r| r.token == token)
            .expect("row exists")
    }
}

/// A request context for `name` with the given groups.
pub fn ctx(name: &str, groups: &[&str]) -> RequestContext {
    RequestContext::new(User::new(UserId::new(IDP, name), name).with_groups(groups.iter().copied()))
}

/// A file owned by `owner` in a home storage.
pub fn home_file(opaque_id: &str, owner: &str) -> ResourceInfo {
    ResourceInfo::new(
        ResourceId::new("eoshome-i01", opaque_id),
        ItemType::File,
        Some(UserId::new(IDP, owner)),
        format!("/eos/user/{}/{owner}/{opaque_id}", &owner[..1]),
    )
}

/// A folder inside the project space `project`.
pub fn project_folder(opaque_id: &str, project: &str, owner: &str) -> ResourceInfo {
    ResourceInfo::new(
        ResourceId::new("newproject-c", opaque_id),
        ItemType::Folder,
        Some(UserId::new(IDP, owner)),
        format!("/eos/project/{}/{project}/shared", &project[..1]),
    )
}
