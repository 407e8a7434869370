//! The Registry - immutable schema lookup.

use crate::{EntityDef, RelationDef};
use djq_core::{EntityTypeId, RelationId};
use std::collections::HashMap;

/// The Registry provides runtime lookup of schema definitions.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Entity definitions by ID.
    entities: HashMap<EntityTypeId, EntityDef>,
    /// Entity ID lookup by name.
    entity_names: HashMap<String, EntityTypeId>,

    /// Relationship definitions by ID.
    relations: HashMap<RelationId, RelationDef>,
}

impl Registry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(
        entities: HashMap<EntityTypeId, EntityDef>,
        entity_names: HashMap<String, EntityTypeId>,
        relations: HashMap<RelationId, RelationDef>,
    ) -> Self {
        Self {
            entities,
            entity_names,
            relations,
        }
    }

    // ==================== Entity Lookups ====================

    /// Get an entity definition by name.
    pub fn get_entity_by_name(&self, name: &str) -> Option<&EntityDef> {
        self.entity_names
            .get(name)
            .and_then(|id| self.entities.get(id))
    }

    /// Get an entity definition by ID.
    pub fn get_entity(&self, id: EntityTypeId) -> Option<&EntityDef> {
        self.entities.get(&id)
    }

    /// Get an entity ID by name.
    pub fn get_entity_id(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_names.get(name).copied()
    }

    /// Get all entity definitions.
    pub fn all_entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    /// Get the number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ==================== Relationship Lookups ====================

    /// Get a relationship definition by ID.
    pub fn get_relation(&self, id: RelationId) -> Option<&RelationDef> {
        self.relations.get(&id)
    }

    /// Get a relationship leaving `entity` by its name.
    pub fn get_relation_by_name(&self, entity: EntityTypeId, name: &str) -> Option<&RelationDef> {
        self.entities
            .get(&entity)
            .and_then(|e| e.relations.get(name))
            .and_then(|id| self.relations.get(id))
    }

    /// Get all relationships leaving an entity.
    pub fn relations_of(&self, entity: EntityTypeId) -> impl Iterator<Item = &RelationDef> {
        self.entities
            .get(&entity)
            .into_iter()
            .flat_map(|e| e.relations.values())
            .filter_map(|id| self.relations.get(id))
    }

    /// Get the number of relationships.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}
