//! Error type shared by every LinkGate crate.
//!
//! Store drivers, crypto helpers and services all map their failures into
//! [`AppError`] so that callers can branch on a single [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of which layer noticed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No matching live share. Covers true absence, expiry, and zero-row
    /// updates or deletes.
    NotFound,
    /// Password or signature mismatch, or a malformed auth attempt.
    InvalidCredentials,
    /// Caller input was rejected before any side effect.
    Validation,
    /// Hashing, signing or store failure not attributable to caller input.
    Internal,
    /// The relational store reported an error.
    Database,
    /// A persisted row could not be decoded.
    Serialization,
    /// Settings are missing or out of range.
    Configuration,
}

impl ErrorKind {
    fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation => "VALIDATION",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// An error with a kind, a message for logs, and an optional cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category callers branch on.
    pub kind: ErrorKind,
    /// Human-readable description, safe to log.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Cause>,
}

impl AppError {
    /// Create an error without a cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps `source` as the cause of a new error.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Re-labels a store or crypto failure as internal, prefixing the
    /// operation that hit it. The original error becomes the cause.
    pub fn into_internal(self, context: impl Into<String>) -> Self {
        let message = format!("{}: {}", context.into(), self.message);
        Self {
            kind: ErrorKind::Internal,
            message,
            source: Some(Box::new(self)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

// The cause is not cloneable; clones keep kind and message only.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("Invalid JSON: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Cannot load settings: {err}"),
            err,
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(ErrorKind::Database, format!("Share store query failed: {err}"), err)
    }
}
