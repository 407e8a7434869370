//! Row structures for DJQ.
//!
//! A row is one stored instance of an entity type.

use crate::{Attributes, EntityTypeId, RowId, Value};

/// A stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Unique identifier for this row.
    pub id: RowId,
    /// Entity type of this row (reference to registry).
    pub type_id: EntityTypeId,
    /// Attribute values.
    pub attributes: Attributes,
}

impl Row {
    /// Create a new row with the given properties.
    pub fn new(id: RowId, type_id: EntityTypeId, attributes: Attributes) -> Self {
        Self {
            id,
            type_id,
            attributes,
        }
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get an attribute value by name, treating a missing attribute as null.
    pub fn attr_or_null(&self, name: &str) -> &Value {
        self.attributes.get(name).unwrap_or(&Value::Null)
    }
}
