//! Schema definition types.

use djq_core::{EntityTypeId, RelationId, ValueType};
use std::collections::HashMap;

/// Attribute (column) definition within an entity type.
#[derive(Debug, Clone)]
pub struct AttrDef {
    /// Attribute name.
    pub name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether this attribute can be null.
    pub nullable: bool,
    /// Whether this attribute is the primary key.
    pub primary_key: bool,
}

impl AttrDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            nullable: false,
            primary_key: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Entity type (mapped table) definition.
#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Unique identifier.
    pub id: EntityTypeId,
    /// Entity name.
    pub name: String,
    /// Attribute definitions.
    pub attributes: HashMap<String, AttrDef>,
    /// Outgoing relationships by name.
    pub relations: HashMap<String, RelationId>,
}

impl EntityDef {
    pub fn new(id: EntityTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// Get an attribute definition by name.
    pub fn get_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.get(name)
    }

    /// Check if this entity has an attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// How many related rows a relationship reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related row (many-to-one, one-to-one).
    ToOne,
    /// Any number of related rows (one-to-many).
    ToMany,
}

impl Cardinality {
    /// The cardinality of the inverse relationship.
    pub fn inverse(&self) -> Self {
        match self {
            Cardinality::ToOne => Cardinality::ToMany,
            Cardinality::ToMany => Cardinality::ToOne,
        }
    }
}

/// Relationship definition: a named, directed edge between entity types.
///
/// A row of `source` is related to every row of `target` whose
/// `remote_key` equals the source row's `local_key`.
#[derive(Debug, Clone)]
pub struct RelationDef {
    /// Unique identifier.
    pub id: RelationId,
    /// Relationship name (the lookup token).
    pub name: String,
    /// Entity the relationship starts from.
    pub source: EntityTypeId,
    /// Entity the relationship leads to.
    pub target: EntityTypeId,
    /// To-one or to-many.
    pub cardinality: Cardinality,
    /// Join column on the source entity.
    pub local_key: String,
    /// Join column on the target entity.
    pub remote_key: String,
}
