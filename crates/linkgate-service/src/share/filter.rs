//! Construction of listing predicates from caller filters.
//!
//! By default a caller only sees shares it owns or created. Admins of a
//! project space see every share on resources of that space.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use linkgate_core::config::ProjectSpaceConfig;
use linkgate_database::store::{ListPredicate, Visibility};
use linkgate_entity::share::ListFilter;

use crate::context::RequestContext;
use crate::resolver::ResourceResolver;

/// Turns list filters into a [`ListPredicate`].
#[derive(Clone)]
pub struct FilterEngine {
    resolver: Arc<dyn ResourceResolver>,
    project_spaces: ProjectSpaceConfig,
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("project_spaces", &self.project_spaces)
            .finish()
    }
}

impl FilterEngine {
    /// Creates a filter engine.
    pub fn new(resolver: Arc<dyn ResourceResolver>, project_spaces: ProjectSpaceConfig) -> Self {
        Self {
            resolver,
            project_spaces,
        }
    }

    /// Full predicate for a listing: caller filters plus visibility.
    pub async fn predicate(&self, ctx: &RequestContext, filters: &[ListFilter]) -> ListPredicate {
        let mut predicate = ListPredicate::new(self.visibility(ctx, filters).await);
        for filter in filters {
            match filter {
                ListFilter::ResourceId(id) => predicate.resources.push(id.clone()),
                ListFilter::Owner(uid) => predicate.owners.push(uid.stored_form().to_string()),
                ListFilter::Creator(uid) => {
                    predicate.creators.push(uid.stored_form().to_string())
                }
            }
        }
        predicate
    }

    /// Which shares the caller may see.
    ///
    /// Escalates to [`Visibility::Unrestricted`] as soon as one filtered
    /// resource lives in a project space the caller administers. Resources
    /// that cannot be resolved are skipped.
    pub async fn visibility(&self, ctx: &RequestContext, filters: &[ListFilter]) -> Visibility {
        let span = info_span!(parent: &ctx.span, "share.visibility");
        async {
            for filter in filters {
                let ListFilter::ResourceId(id) = filter else {
                    continue;
                };
                if !id.storage_id.starts_with(&self.project_spaces.instance_prefix) {
                    continue;
                }
                let info = match self.resolver.stat(ctx, id).await {
                    Ok(info) => info,
                    Err(e) => {
                        debug!(resource = %id, error = %e, "Skipping unresolvable project resource");
                        continue;
                    }
                };
                let Some(group) = self.admin_group(&info.path) else {
                    continue;
                };
                if ctx.in_group(&group) {
                    debug!(resource = %id, group = %group, "Caller is project space admin");
                    return Visibility::Unrestricted;
                }
            }
            Visibility::OwnedBy(ctx.stored_uid().to_string())
        }
        .instrument(span)
        .await
    }

    /// Admin group of the project space containing `path`.
    ///
    /// Project paths look like `/eos/project/c/cernbox/...`; the project
    /// name is the fifth `/`-separated component.
    pub fn admin_group(&self, path: &str) -> Option<String> {
        let parts: Vec<&str> = path.splitn(6, '/').collect();
        let project = parts.get(4)?;
        Some(format!(
            "{}{}{}",
            self.project_spaces.group_prefix, project, self.project_spaces.admin_group_suffix
        ))
    }
}
