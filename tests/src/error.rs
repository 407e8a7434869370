//! Error types for the test framework.

use djq_compiler::CompileError;
use djq_registry::RegistryError;
use thiserror::Error;

/// Result type for scenario operations.
pub type ExampleResult<T> = Result<T, ExampleError>;

/// Errors that can occur when running scenarios.
#[derive(Debug, Error)]
pub enum ExampleError {
    /// The fixture schema could not be built.
    #[error("failed to build fixture schema: {0}")]
    Schema(#[from] RegistryError),

    /// An entity name is not part of the fixture.
    #[error("unknown fixture entity '{name}'")]
    UnknownEntity { name: String },

    /// Assertion failed.
    #[error("assertion failed for step '{step}': {message}")]
    AssertionFailed { step: String, message: String },

    /// Missing root entity.
    #[error("root entity not specified for scenario '{scenario}'")]
    MissingRoot { scenario: String },

    /// Compiler error outside of a step.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
}

impl ExampleError {
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn missing_root(scenario: impl Into<String>) -> Self {
        Self::MissingRoot {
            scenario: scenario.into(),
        }
    }
}
