//! Request context carrying the authenticated caller and its tracing span.

use chrono::{DateTime, Utc};
use tracing::Span;
use uuid::Uuid;

use linkgate_entity::user::{User, UserId};

/// Context for the current authenticated request.
///
/// Built by the transport layer and passed into service methods so that
/// every operation knows *who* is acting and logs under the request's span.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated caller.
    pub user: User,
    /// Correlation id of the request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    /// Parent span for every operation run on behalf of this request.
    pub span: Span,
}

impl RequestContext {
    /// Creates a context with a fresh request id and a `request` span.
    pub fn new(user: User) -> Self {
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!("request", %request_id, user = %user.id);
        Self {
            user,
            request_id,
            request_time: Utc::now(),
            span,
        }
    }

    /// Replace the parent span, e.g. with one created by the transport.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The caller's id.
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// The caller's id as stored in `uid_owner` / `uid_initiator`.
    pub fn stored_uid(&self) -> &str {
        self.user.id.stored_form()
    }

    /// Whether the caller belongs to `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.user.in_group(group)
    }
}
