//! Compiler error types.

use djq_core::Value;
use djq_query::QueryError;
use thiserror::Error;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while compiling lookups into a query.
///
/// Every variant is recoverable by the caller. [`CompileError::status_code`]
/// gives the HTTP status the wrapping web layer should report.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The lookup path references an unknown relationship, attribute or operator.
    #[error("Malformed lookup '{key}': {reason} (at token '{token}')")]
    MalformedLookup {
        key: String,
        token: String,
        reason: String,
    },

    /// The value shape does not fit the operator.
    #[error("Invalid value for operator '{operator}': expected {expected}, got {value}")]
    InvalidFilterValue {
        operator: String,
        expected: String,
        value: String,
    },

    /// An option passed to a compiler call is not supported.
    #[error("Invalid option: {message}")]
    InvalidOption { message: String },

    /// A request filter is not in the allow-list.
    #[error("Filtering on '{field}' is not allowed")]
    InvalidFilter { field: String },

    /// A single-row lookup matched nothing.
    #[error("The requested resource was not found")]
    NotFound,

    /// Configuration could not be loaded.
    #[error("Invalid compiler configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CompileError {
    pub fn malformed_lookup(
        key: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedLookup {
            key: key.into(),
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_filter_value(
        operator: impl Into<String>,
        expected: impl Into<String>,
        value: &Value,
    ) -> Self {
        Self::InvalidFilterValue {
            operator: operator.into(),
            expected: expected.into(),
            value: value.to_string(),
        }
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }

    pub fn invalid_filter(field: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field: field.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors caused by caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedLookup { .. }
                | Self::InvalidFilterValue { .. }
                | Self::InvalidOption { .. }
                | Self::InvalidFilter { .. }
                | Self::Query(QueryError::InvalidPattern { .. })
        )
    }

    /// HTTP status for this error: 400, 404 or 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            e if e.is_client_error() => 400,
            _ => 500,
        }
    }
}
