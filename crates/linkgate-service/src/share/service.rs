//! Public link share lifecycle: create, update, get, list, revoke and
//! anonymous access by token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::{Instrument, debug, info, info_span, warn};

use linkgate_auth::{CapabilitySigner, PasswordHasher};
use linkgate_core::config::PublicShareConfig;
use linkgate_core::error::{AppError, ErrorKind};
use linkgate_core::result::AppResult;
use linkgate_database::ShareStoreManager;
use linkgate_database::store::{FieldUpdate, ShareSelector, ShareStore};
use linkgate_entity::resource::ResourceInfo;
use linkgate_entity::share::{
    Grant, ListFilter, NewShareRow, PublicShare, ShareAuthentication, ShareReference, ShareRow,
    ShareUpdate, UpdateRequest,
};

use super::cleanup::ExpiredShareCleanup;
use super::filter::FilterEngine;
use super::link::TokenGenerator;
use crate::context::RequestContext;
use crate::resolver::ResourceResolver;

/// Manages public link shares.
#[derive(Debug, Clone)]
pub struct ShareManager {
    /// Share store.
    store: Arc<ShareStoreManager>,
    /// Password hasher for protected shares.
    hasher: Arc<PasswordHasher>,
    /// Capability signer for protected shares.
    signer: Arc<CapabilitySigner>,
    /// Token generator.
    tokens: TokenGenerator,
    /// Listing visibility.
    filters: Arc<FilterEngine>,
    /// Inline reclamation of expired shares.
    cleanup: Arc<ExpiredShareCleanup>,
}

impl ShareManager {
    /// Creates a new share manager.
    pub fn new(
        store: Arc<ShareStoreManager>,
        hasher: Arc<PasswordHasher>,
        signer: Arc<CapabilitySigner>,
        filters: Arc<FilterEngine>,
        cleanup: Arc<ExpiredShareCleanup>,
    ) -> Self {
        Self {
            store,
            hasher,
            signer,
            tokens: TokenGenerator::new(),
            filters,
            cleanup,
        }
    }

    /// Wires a share manager from the public share settings.
    pub fn from_config(
        config: &PublicShareConfig,
        store: Arc<ShareStoreManager>,
        resolver: Arc<dyn ResourceResolver>,
    ) -> AppResult<Self> {
        let hasher = PasswordHasher::new(config.password_hash_cost)?;
        let signer = CapabilitySigner::new(config.signature_ttl_seconds);
        let filters = FilterEngine::new(resolver, config.project_spaces.clone());
        let cleanup = ExpiredShareCleanup::from_config(store.clone(), config);
        debug!(
            driver = store.driver(),
            password_hash_cost = hasher.cost(),
            cleanup = cleanup.is_enabled(),
            "Share manager configured"
        );
        Ok(Self::new(
            store,
            Arc::new(hasher),
            Arc::new(signer),
            Arc::new(filters),
            Arc::new(cleanup),
        ))
    }

    /// The cleanup shared with the janitor.
    pub fn cleanup(&self) -> Arc<ExpiredShareCleanup> {
        self.cleanup.clone()
    }

    /// Creates a public link to `resource`.
    ///
    /// The display name defaults to the resource's `name` metadata, or to
    /// the token when that is absent.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        resource: &ResourceInfo,
        grant: &Grant,
        description: &str,
        internal: bool,
    ) -> AppResult<PublicShare> {
        let span = info_span!(parent: &ctx.span, "share.create", resource = %resource.id);
        async {
            let owner = resource.owner.clone().ok_or_else(|| {
                AppError::validation(format!("Resource {} has no owner", resource.id))
            })?;

            let token = self.tokens.generate();
            let display_name = resource.display_name().unwrap_or(&token).to_string();
            let password_hash = grant
                .password()
                .map(|p| self.hasher.hash(p))
                .transpose()
                .map_err(|e| e.into_internal("Failed to create share"))?;

            let now = ctx.request_time;
            let row = NewShareRow {
                uid_owner: owner.stored_form().to_string(),
                uid_initiator: ctx.stored_uid().to_string(),
                item_type: resource.resource_type,
                resource_id: resource.id.clone(),
                permissions: grant.permissions,
                stime: now.timestamp(),
                token: token.clone(),
                share_name: display_name.clone(),
                quicklink: resource.quicklink(),
                description: description.to_string(),
                internal,
                password_hash,
                expiration: grant.expiration(),
            };

            let id = self
                .store
                .insert(&row)
                .await
                .map_err(|e| e.into_internal("Failed to create share"))?;

            info!(
                user = %ctx.user_id(),
                share_id = %id,
                permissions = %row.permissions,
                "Public share created"
            );

            Ok(PublicShare {
                id,
                token,
                resource_id: row.resource_id,
                resource_type: row.item_type,
                owner,
                creator: ctx.user_id().clone(),
                permissions: row.permissions,
                display_name,
                description: row.description,
                password_protected: row.password_hash.is_some(),
                expiration: row.expiration,
                created_at: DateTime::<Utc>::from_timestamp(row.stime, 0).unwrap_or(now),
                quicklink: row.quicklink,
                internal,
                signature: None,
            })
        }
        .instrument(span)
        .await
    }

    /// Updates exactly one field group of a share the caller owns or
    /// created, and returns the refreshed share.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        request: &UpdateRequest,
        grant: &Grant,
    ) -> AppResult<PublicShare> {
        let span = info_span!(parent: &ctx.span, "share.update", kind = ?request.kind);
        async {
            let update = ShareUpdate::from_request(request, grant)?;
            let selector = scoped_selector(ctx, &request.reference)?;
            let field = self.field_update(update)?;

            let updated = self
                .store
                .update_fields(&selector, &field)
                .await
                .map_err(|e| e.into_internal("Failed to update share"))?;
            if updated == 0 {
                return Err(not_found(&request.reference));
            }

            info!(
                user = %ctx.user_id(),
                column = field.column(),
                "Public share updated"
            );

            self.get(ctx, &request.reference, false).await
        }
        .instrument(span)
        .await
    }

    /// Fetches a live share.
    ///
    /// Lookups by id are restricted to the owner or creator; lookups by
    /// token are not. With `sign`, protected shares carry a fresh
    /// capability signature.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        reference: &ShareReference,
        sign: bool,
    ) -> AppResult<PublicShare> {
        let span = info_span!(parent: &ctx.span, "share.get");
        async {
            let selector = match reference {
                ShareReference::Id(id) => ShareSelector::by_id_for(*id, ctx.stored_uid()),
                ShareReference::Token(token) if token.is_empty() => {
                    return Err(not_found(reference));
                }
                ShareReference::Token(token) => ShareSelector::by_token(token.as_str()),
            };

            let row = self
                .find_live(&selector)
                .await?
                .ok_or_else(|| not_found(reference))?;

            let hash = row.password_hash().map(str::to_owned);
            let mut share =
                PublicShare::try_from(row).map_err(|e| e.into_internal("Failed to get share"))?;
            if sign {
                self.attach_signature(&mut share, hash.as_deref())?;
            }
            Ok(share)
        }
        .instrument(span)
        .await
    }

    /// Lists live, non-internal shares matching `filters` that the caller
    /// may see.
    ///
    /// Rows that cannot be decoded are logged and skipped.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filters: &[ListFilter],
        sign: bool,
    ) -> AppResult<Vec<PublicShare>> {
        let span = info_span!(parent: &ctx.span, "share.list", filters = filters.len());
        async {
            let predicate = self.filters.predicate(ctx, filters).await;
            let now = Utc::now();

            let mut shares = Vec::new();
            let mut expired: Vec<String> = Vec::new();
            {
                let mut rows = self.store.find_many(predicate);
                while let Some(row) = rows.next().await {
                    let row = match row {
                        Ok(row) => row,
                        Err(e) if e.kind == ErrorKind::Serialization => {
                            warn!(error = %e, "Skipping malformed share row");
                            continue;
                        }
                        Err(e) => return Err(e.into_internal("Failed to list shares")),
                    };
                    if row.is_expired_at(now) {
                        expired.push(row.token);
                        continue;
                    }

                    let share_id = row.id;
                    let hash = row.password_hash().map(str::to_owned);
                    let mut share = match PublicShare::try_from(row) {
                        Ok(share) => share,
                        Err(e) => {
                            warn!(share_id, error = %e, "Skipping malformed share row");
                            continue;
                        }
                    };
                    if sign {
                        self.attach_signature(&mut share, hash.as_deref())?;
                    }
                    shares.push(share);
                }
            }

            if !expired.is_empty() {
                let observed: Vec<&str> = expired.iter().map(String::as_str).collect();
                self.sweep_observed(&observed).await;
            }

            Ok(shares)
        }
        .instrument(span)
        .await
    }

    /// Deletes a share the caller owns or created.
    pub async fn revoke(&self, ctx: &RequestContext, reference: &ShareReference) -> AppResult<()> {
        let span = info_span!(parent: &ctx.span, "share.revoke");
        async {
            let selector = scoped_selector(ctx, reference)?;
            let deleted = self
                .store
                .delete(&selector)
                .await
                .map_err(|e| e.into_internal("Failed to revoke share"))?;
            if deleted == 0 {
                return Err(not_found(reference));
            }
            info!(user = %ctx.user_id(), "Public share revoked");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Opens a share by token on behalf of an anonymous holder.
    ///
    /// Unprotected shares need nothing. Protected shares need the password
    /// or a signature issued earlier and not yet expired. With `sign`,
    /// protected shares carry a fresh capability signature.
    pub async fn authenticate_by_token(
        &self,
        token: &str,
        auth: &ShareAuthentication,
        sign: bool,
    ) -> AppResult<PublicShare> {
        let span = info_span!("share.authenticate", token_len = token.len());
        async {
            let reference = ShareReference::token(token);
            if token.is_empty() {
                return Err(not_found(&reference));
            }

            let row = self
                .find_live(&ShareSelector::by_token(token))
                .await?
                .ok_or_else(|| not_found(&reference))?;

            let hash = row.password_hash().map(str::to_owned);
            if let Some(hash) = hash.as_deref() {
                if !self.check_credentials(&row, hash, auth) {
                    warn!(token_len = token.len(), "Public share authentication failed");
                    return Err(AppError::invalid_credentials(format!(
                        "Invalid credentials for share {}",
                        row.id
                    )));
                }
            }

            let mut share = PublicShare::try_from(row)
                .map_err(|e| e.into_internal("Failed to authenticate share"))?;
            if sign {
                self.attach_signature(&mut share, hash.as_deref())?;
            }
            Ok(share)
        }
        .instrument(span)
        .await
    }

    /// Reads one live row, treating an expired row as absent.
    ///
    /// A failed inline sweep is returned to the caller.
    async fn find_live(&self, selector: &ShareSelector) -> AppResult<Option<ShareRow>> {
        let Some(row) = self
            .store
            .find_one(selector)
            .await
            .map_err(|e| e.into_internal("Failed to get share"))?
        else {
            return Ok(None);
        };
        if row.is_expired_at(Utc::now()) {
            self.cleanup
                .sweep_observed(&[row.token.as_str()])
                .await
                .map_err(|e| e.into_internal("Failed to get share"))?;
            return Ok(None);
        }
        Ok(Some(row))
    }

    /// Best-effort sweep for `list`, which never fails on cleanup.
    async fn sweep_observed(&self, tokens: &[&str]) {
        if let Err(e) = self.cleanup.sweep_observed(tokens).await {
            warn!(error = %e, "Inline expired share sweep failed");
        }
    }

    fn check_credentials(&self, row: &ShareRow, hash: &str, auth: &ShareAuthentication) -> bool {
        match auth {
            ShareAuthentication::Password(password) if !password.is_empty() => {
                self.hasher.verify(password, hash)
            }
            ShareAuthentication::Signature(sig) => {
                self.signer
                    .verify(&row.token, hash, sig.expiration, &sig.signature)
            }
            _ => false,
        }
    }

    fn attach_signature(&self, share: &mut PublicShare, hash: Option<&str>) -> AppResult<()> {
        if let Some(hash) = hash {
            let signature = self
                .signer
                .issue(&share.token, hash, share.expiration)
                .map_err(|e| e.into_internal("Failed to sign share"))?;
            share.signature = Some(signature);
        }
        Ok(())
    }

    fn field_update(&self, update: ShareUpdate) -> AppResult<FieldUpdate> {
        Ok(match update {
            ShareUpdate::DisplayName(name) => FieldUpdate::DisplayName(name),
            ShareUpdate::Permissions(perms) => FieldUpdate::Permissions(i32::from(perms)),
            ShareUpdate::Expiration(exp) => FieldUpdate::Expiration(exp),
            ShareUpdate::Password(Some(password)) => FieldUpdate::PasswordHash(
                self.hasher
                    .hash(&password)
                    .map_err(|e| e.into_internal("Failed to update share"))?,
            ),
            ShareUpdate::Password(None) => FieldUpdate::PasswordHash(String::new()),
            ShareUpdate::Description(text) => FieldUpdate::Description(text),
        })
    }
}

fn scoped_selector(ctx: &RequestContext, reference: &ShareReference) -> AppResult<ShareSelector> {
    match reference {
        ShareReference::Id(id) => Ok(ShareSelector::by_id_for(*id, ctx.stored_uid())),
        ShareReference::Token(token) if token.is_empty() => Err(not_found(reference)),
        ShareReference::Token(token) => {
            Ok(ShareSelector::by_token_for(token.as_str(), ctx.stored_uid()))
        }
    }
}

fn not_found(reference: &ShareReference) -> AppError {
    match reference {
        ShareReference::Id(id) => AppError::not_found(format!("Share {id} not found")),
        ShareReference::Token(_) => AppError::not_found("Share not found"),
    }
}
