//! Domain error types for revstore.
//!
//! Validation failures are expected outcomes and are returned as values;
//! storage failures travel through `anyhow` untouched.

use thiserror::Error;

/// Field validation failures for review entities.
///
/// Assignment either fully succeeds or the prior valid value is retained.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("year must be 2000 or later, got {0}")]
    YearOutOfRange(i32),

    #[error("summary must be a non-empty string")]
    EmptySummary,

    #[error("employee has no storage id; persist the employee first")]
    UnsavedEmployee,
}

/// Domain errors related to review persistence operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review is not persisted; nothing to delete")]
    NotPersisted,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("review operation failed: {0}")]
    OperationFailed(#[from] anyhow::Error),
}
