//! Query error types.

use djq_core::{RelationId, StoreError};
use thiserror::Error;

use crate::JoinPath;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur during query execution.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown relationship: {0}")]
    UnknownRelation(RelationId),

    #[error("Column references path {path} which the query does not join")]
    UnjoinedPath { path: JoinPath },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No row was found for one()")]
    NoResult,

    #[error("Multiple rows were found for one(): {count}")]
    MultipleResults { count: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub fn unjoined_path(path: &JoinPath) -> Self {
        Self::UnjoinedPath { path: path.clone() }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
