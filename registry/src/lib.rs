//! DJQ Registry
//!
//! Runtime schema lookup: entity types, their attributes, and the named
//! relationships between them. The registry is immutable after construction
//! via RegistryBuilder, and implements the `SchemaGraph` seam used by the
//! lookup compiler.

mod builder;
mod graph;
mod registry;
mod types;

pub use builder::{EntityBuilder, RegistryBuilder, RegistryError, RelationBuilder};
pub use graph::{AttributeRef, RelationRef, SchemaGraph};
pub use registry::Registry;
pub use types::*;
