//! Convenience result type alias for FileDock.

use crate::error::AppError;

/// A specialized `Result` type for FileDock operations.
pub type AppResult<T> = Result<T, AppError>;
