//! DJQ Core Types
//!
//! This crate provides the foundational types used throughout DJQ:
//! - Identity types (RowId, EntityTypeId, RelationId)
//! - Value types (the Value enum and the ValueType tags declared by the schema)
//! - Row structures stored by the in-memory backend
//! - Common error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
