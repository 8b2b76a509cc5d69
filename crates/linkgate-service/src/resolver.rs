//! Resource metadata resolution.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use linkgate_core::error::AppError;
use linkgate_core::result::AppResult;
use linkgate_entity::resource::{ResourceId, ResourceInfo};

use crate::context::RequestContext;

/// Looks up metadata of a resource on behalf of the caller.
#[async_trait]
pub trait ResourceResolver: Send + Sync + 'static {
    /// Stat a resource.
    async fn stat(&self, ctx: &RequestContext, id: &ResourceId) -> AppResult<ResourceInfo>;
}

/// Resolver answering from a fixed table. Used by tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceResolver {
    entries: Arc<DashMap<ResourceId, ResourceInfo>>,
}

impl StaticResourceResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource.
    pub fn insert(&self, info: ResourceInfo) {
        self.entries.insert(info.id.clone(), info);
    }

    /// Register a resource, builder style.
    pub fn with(self, info: ResourceInfo) -> Self {
        self.insert(info);
        self
    }
}

#[async_trait]
impl ResourceResolver for StaticResourceResolver {
    async fn stat(&self, _ctx: &RequestContext, id: &ResourceId) -> AppResult<ResourceInfo> {
        self.entries
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Resource {id} not found")))
    }
}
