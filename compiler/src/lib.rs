//! DJQ Compiler
//!
//! Compile Django-style lookups (`blog__name__istartswith`) into queries.
//!
//! Responsibilities:
//! - Resolve lookup paths against the schema graph
//! - Register implicit joins, once per relationship path
//! - Dispatch operator tokens to predicate builders
//! - Compose filters, exclusions, ordering and eager loads
//! - Parse request parameters into lookups

mod compiler;
mod config;
mod error;
mod lookups;
mod operators;
mod params;
mod resolve;

pub use compiler::Compiler;
pub use config::{CompilerConfig, DEFAULT_SEPARATOR};
pub use error::{CompileError, CompileResult};
pub use lookups::Lookups;
pub use operators::{Operator, OperatorRegistry};
pub use params::{
    convert_value, RequestFilters, NULL_LITERALS, ORDER_BY_PARAM, PAGINATION_PARAMS,
};
pub use resolve::{resolve_lookup, JoinAccumulator, PathResolver, ResolvedLookup, Step};
