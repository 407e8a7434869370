//! Common error types for DJQ.

use crate::RowId;
use thiserror::Error;

/// Errors raised when reading the row store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row referenced by an index or join is missing.
    #[error("Row not found: {0}")]
    RowNotFound(RowId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
