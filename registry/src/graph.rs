//! The schema-graph seam the lookup compiler is written against.
//!
//! Nodes are entity types, edges are named relationships, and every node
//! exposes named terminal attributes. Implementations are read-only.

use djq_core::{EntityTypeId, RelationId, ValueType};

use crate::{Cardinality, Registry};

/// A resolved relationship edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
    pub id: RelationId,
    pub name: String,
    pub source: EntityTypeId,
    pub target: EntityTypeId,
    pub cardinality: Cardinality,
}

/// A resolved terminal attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRef {
    pub entity: EntityTypeId,
    pub name: String,
    pub value_type: ValueType,
    pub nullable: bool,
}

/// Read-only introspection over entities, relationships and attributes.
pub trait SchemaGraph {
    /// Human-readable entity name, used in error messages.
    fn entity_name(&self, entity: EntityTypeId) -> Option<&str>;

    /// Resolve `name` as a relationship leaving `entity`.
    fn resolve_relationship(&self, entity: EntityTypeId, name: &str) -> Option<RelationRef>;

    /// Resolve `name` as a terminal attribute of `entity`.
    fn resolve_attribute(&self, entity: EntityTypeId, name: &str) -> Option<AttributeRef>;
}

impl SchemaGraph for Registry {
    fn entity_name(&self, entity: EntityTypeId) -> Option<&str> {
        self.get_entity(entity).map(|e| e.name.as_str())
    }

    fn resolve_relationship(&self, entity: EntityTypeId, name: &str) -> Option<RelationRef> {
        self.get_relation_by_name(entity, name).map(|rel| RelationRef {
            id: rel.id,
            name: rel.name.clone(),
            source: rel.source,
            target: rel.target,
            cardinality: rel.cardinality,
        })
    }

    fn resolve_attribute(&self, entity: EntityTypeId, name: &str) -> Option<AttributeRef> {
        self.get_entity(entity)
            .and_then(|e| e.get_attr(name))
            .map(|attr| AttributeRef {
                entity,
                name: attr.name.clone(),
                value_type: attr.value_type,
                nullable: attr.nullable,
            })
    }
}

impl<S: SchemaGraph + ?Sized> SchemaGraph for &S {
    fn entity_name(&self, entity: EntityTypeId) -> Option<&str> {
        (**self).entity_name(entity)
    }

    fn resolve_relationship(&self, entity: EntityTypeId, name: &str) -> Option<RelationRef> {
        (**self).resolve_relationship(entity, name)
    }

    fn resolve_attribute(&self, entity: EntityTypeId, name: &str) -> Option<AttributeRef> {
        (**self).resolve_attribute(entity, name)
    }
}
