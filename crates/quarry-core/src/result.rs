//! Convenience result type alias for Quarry.

use crate::error::AppError;

/// A specialized `Result` type for Quarry operations.
///
/// Every crate in the workspace returns `AppResult<T>` so that store,
/// evaluator, and repository errors flow through `?` unchanged.
pub type AppResult<T> = Result<T, AppError>;
