//! Convenience result type alias for LinkGate.

use crate::error::AppError;

/// A specialized `Result` type for LinkGate operations.
pub type AppResult<T> = Result<T, AppError>;
