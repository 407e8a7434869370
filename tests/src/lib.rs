//! DJQ Integration Test Framework
//!
//! Provides a fluent API for writing integration tests against the lookup
//! compiler and the in-memory backend.
//!
//! # Example
//!
//! ```ignore
//! use djq_tests::prelude::*;
//!
//! pub fn scenario() -> Scenario {
//!     Scenario::new("blog_names")
//!         .root("Post")
//!         .step(
//!             "filter_by_blog_prefix",
//!             Action::filter(lookups! { "blog__name__istartswith" => "e" }),
//!             |a| a.joins(1).predicates(1).ids([1, 2, 3, 4]),
//!         )
//! }
//!
//! #[test]
//! fn test() {
//!     scenario().run().unwrap();
//! }
//! ```

mod assertion;
mod error;
mod fixture;
mod logging;

pub use assertion::{Assertion, AssertionBuilder, StepOutcome};
pub use error::{ExampleError, ExampleResult};
pub use fixture::{blog_schema, ids, BlogFixture};
pub use logging::{init_logging, LOG_ENV};
pub use scenario::{Action, Scenario, Step};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ExampleError, ExampleResult};
    pub use crate::fixture::{ids, BlogFixture};
    pub use crate::logging::init_logging;
    pub use crate::scenario::{Action, Scenario};
    pub use djq_compiler::{lookups, CompileError, Compiler, CompilerConfig, Lookups};
    pub use djq_core::Value;
    pub use djq_query::{Predicate, Query, QueryBackend};
}
