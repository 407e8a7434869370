//! DJQ Row Storage
//!
//! This crate provides an in-memory row store with indexed access:
//! - Row storage keyed by RowId
//! - Type index: Find rows by entity type, in insertion order
//! - Attribute index: Find rows by exact attribute value (join keys)

mod index;
mod store;

pub use store::*;
