//! Convenience result type alias for GoQuizbox.

use crate::error::AppError;

/// A specialized `Result` type for GoQuizbox operations.
pub type AppResult<T> = Result<T, AppError>;
