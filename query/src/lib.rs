//! DJQ Query
//!
//! The relational query abstraction targeted by the lookup compiler.
//!
//! Responsibilities:
//! - Describe reads as immutable, chainable `Query` values
//! - Track joins by path so repeated traversal adds one join
//! - Execute queries against the in-memory store (`MemoryBackend`)

mod backend;
mod error;
mod executor;
mod expr;
mod query;

pub use backend::QueryBackend;
pub use error::{QueryError, QueryResult};
pub use executor::MemoryBackend;
pub use expr::{
    escape_like, ColumnRef, CompareOp, DatePart, Direction, JoinPath, Predicate, SortExpr,
    LIKE_ESCAPE,
};
pub use query::{EagerLoad, Join, Query};
