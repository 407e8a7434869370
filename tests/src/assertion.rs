//! Assertion types and builders for verifying step results.

use djq_compiler::CompileError;
use djq_core::Row;
use djq_query::Query;

use crate::error::{ExampleError, ExampleResult};
use crate::fixture::ids;

/// What a step produced: the query after the step and the rows it fetches.
pub type StepOutcome = Result<(Query, Vec<Row>), CompileError>;

/// A complete assertion for a step result.
#[derive(Debug, Default)]
pub struct Assertion {
    // Row assertions
    pub rows: Option<usize>,
    pub ids: Option<Vec<i64>>,
    pub ordered: bool,
    pub first: Option<i64>,

    // Query shape assertions
    pub joins: Option<usize>,
    pub predicates: Option<usize>,
    pub sort_keys: Option<usize>,
    pub eager_loads: Option<usize>,

    // Error assertions
    pub error: Option<String>,
    pub error_pattern: Option<String>,
    pub status: Option<u16>,
}

impl Assertion {
    /// Create a new empty assertion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against a step outcome.
    pub fn verify(&self, step: &str, outcome: &StepOutcome) -> ExampleResult<()> {
        if self.error.is_some() || self.error_pattern.is_some() || self.status.is_some() {
            return self.verify_error(step, outcome);
        }

        let (query, rows) = outcome
            .as_ref()
            .map_err(|e| ExampleError::assertion_failed(step, format!("step failed: {}", e)))?;

        self.verify_shape(step, query)?;
        self.verify_rows(step, rows)
    }

    fn verify_error(&self, step: &str, outcome: &StepOutcome) -> ExampleResult<()> {
        let err = match outcome {
            Err(e) => e,
            Ok(_) => {
                return Err(ExampleError::assertion_failed(
                    step,
                    "expected an error, but step succeeded",
                ))
            }
        };
        let message = err.to_string();

        if let Some(ref expected) = self.error {
            if !message.contains(expected.as_str()) {
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, message),
                ));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ExampleError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            if !re.is_match(&message) {
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, message),
                ));
            }
        }

        if let Some(expected) = self.status {
            if err.status_code() != expected {
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected status {}, got {}", expected, err.status_code()),
                ));
            }
        }

        Ok(())
    }

    fn verify_shape(&self, step: &str, query: &Query) -> ExampleResult<()> {
        let checks = [
            ("joins", self.joins, query.joins().len()),
            ("predicates", self.predicates, query.predicates().len()),
            ("sort keys", self.sort_keys, query.order().len()),
            ("eager loads", self.eager_loads, query.eager_loads().len()),
        ];
        for (what, expected, actual) in checks {
            if let Some(expected) = expected {
                if expected != actual {
                    return Err(ExampleError::assertion_failed(
                        step,
                        format!("expected {} {}, got {}", expected, what, actual),
                    ));
                }
            }
        }
        Ok(())
    }

    fn verify_rows(&self, step: &str, rows: &[Row]) -> ExampleResult<()> {
        let actual = ids(rows);

        if let Some(expected) = self.rows {
            if rows.len() != expected {
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected {} rows, got {} ({:?})", expected, rows.len(), actual),
                ));
            }
        }

        if let Some(ref expected) = self.ids {
            let matches = if self.ordered {
                &actual == expected
            } else {
                let mut a = actual.clone();
                let mut e = expected.clone();
                a.sort_unstable();
                e.sort_unstable();
                a == e
            };
            if !matches {
                let kind = if self.ordered { "ordered ids" } else { "ids" };
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected {} {:?}, got {:?}", kind, expected, actual),
                ));
            }
        }

        if let Some(expected) = self.first {
            if actual.first() != Some(&expected) {
                return Err(ExampleError::assertion_failed(
                    step,
                    format!("expected first id {}, got {:?}", expected, actual.first()),
                ));
            }
        }

        Ok(())
    }
}

/// Fluent builder for [`Assertion`].
#[derive(Debug, Default)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect exactly `n` rows.
    pub fn rows(mut self, n: usize) -> Self {
        self.assertion.rows = Some(n);
        self
    }

    /// Expect no rows.
    pub fn empty(self) -> Self {
        self.rows(0)
    }

    /// Expect these primary keys in any order.
    pub fn ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.assertion.ids = Some(ids.into_iter().collect());
        self.assertion.ordered = false;
        self
    }

    /// Expect these primary keys in this order.
    pub fn ordered_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.assertion.ids = Some(ids.into_iter().collect());
        self.assertion.ordered = true;
        self
    }

    /// Expect the first row to have this primary key.
    pub fn first(mut self, id: i64) -> Self {
        self.assertion.first = Some(id);
        self
    }

    pub fn joins(mut self, n: usize) -> Self {
        self.assertion.joins = Some(n);
        self
    }

    pub fn predicates(mut self, n: usize) -> Self {
        self.assertion.predicates = Some(n);
        self
    }

    pub fn sort_keys(mut self, n: usize) -> Self {
        self.assertion.sort_keys = Some(n);
        self
    }

    pub fn eager_loads(mut self, n: usize) -> Self {
        self.assertion.eager_loads = Some(n);
        self
    }

    /// Expect an error whose message contains `text`.
    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.assertion.error = Some(text.into());
        self
    }

    /// Expect an error whose message matches a regex.
    pub fn error_matching(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.error_pattern = Some(pattern.into());
        self
    }

    /// Expect an error mapped to this HTTP status.
    pub fn status(mut self, code: u16) -> Self {
        self.assertion.status = Some(code);
        self
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }
}
