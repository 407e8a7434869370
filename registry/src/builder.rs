//! RegistryBuilder for constructing an immutable Registry.

use crate::{AttrDef, Cardinality, EntityDef, Registry, RelationDef};
use djq_core::{EntityTypeId, RelationId, ValueType};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate entity name: {0}")]
    DuplicateEntityName(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Duplicate relationship {name} on entity {entity}")]
    DuplicateRelationName { entity: String, name: String },

    #[error("Relationship {name} on entity {entity} shadows an attribute")]
    NameConflict { entity: String, name: String },

    #[error("Unknown join key {attr} on entity {entity}")]
    UnknownJoinKey { entity: String, attr: String },

    #[error("Relationship {0} has no join keys")]
    MissingJoinKeys(String),

    #[error("Entity {0} declares more than one primary key")]
    MultiplePrimaryKeys(String),

    #[error("Join keys of relationship {relation} differ in type: {local} vs {remote}")]
    JoinKeyTypeMismatch {
        relation: String,
        local: ValueType,
        remote: ValueType,
    },
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next entity ID to allocate.
    next_entity_id: u32,
    /// Next relationship ID to allocate.
    next_relation_id: u32,

    /// Entities being built.
    entities: HashMap<EntityTypeId, EntityDef>,
    /// Entity name to ID mapping.
    entity_names: HashMap<String, EntityTypeId>,

    /// Relationships being built.
    relations: HashMap<RelationId, RelationDef>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity definition.
    pub fn add_entity(&mut self, name: impl Into<String>) -> EntityBuilder<'_> {
        let name = name.into();
        let id = EntityTypeId::new(self.next_entity_id);
        self.next_entity_id += 1;

        EntityBuilder {
            builder: self,
            id,
            name,
            attributes: HashMap::new(),
        }
    }

    /// Add a relationship from `source` to `target`, both already added.
    pub fn add_relation(
        &mut self,
        source: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> RelationBuilder<'_> {
        RelationBuilder {
            builder: self,
            source: source.into(),
            name: name.into(),
            target: target.into(),
            cardinality: Cardinality::ToOne,
            keys: None,
            backref: None,
        }
    }

    /// Get an entity ID by name.
    pub fn get_entity_id(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_names.get(name).copied()
    }

    /// Build the immutable Registry.
    ///
    /// Checks the schema as a whole: at most one primary key per entity, and
    /// join keys of the same type on both sides of every relationship.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for def in self.entities.values() {
            if def.attributes.values().filter(|a| a.primary_key).count() > 1 {
                return Err(RegistryError::MultiplePrimaryKeys(def.name.clone()));
            }
        }
        for rel in self.relations.values() {
            let local = self.key_type(rel.source, &rel.local_key)?;
            let remote = self.key_type(rel.target, &rel.remote_key)?;
            if local != remote {
                return Err(RegistryError::JoinKeyTypeMismatch {
                    relation: rel.name.clone(),
                    local,
                    remote,
                });
            }
        }

        Ok(Registry::new(
            self.entities,
            self.entity_names,
            self.relations,
        ))
    }

    fn resolve_entity(&self, name: &str) -> Result<EntityTypeId, RegistryError> {
        self.get_entity_id(name)
            .ok_or_else(|| RegistryError::UnknownEntity(name.to_string()))
    }

    fn check_relation_name(&self, entity: EntityTypeId, name: &str) -> Result<(), RegistryError> {
        let Some(def) = self.entities.get(&entity) else {
            return Ok(());
        };
        if def.relations.contains_key(name) {
            return Err(RegistryError::DuplicateRelationName {
                entity: def.name.clone(),
                name: name.to_string(),
            });
        }
        if def.has_attr(name) {
            return Err(RegistryError::NameConflict {
                entity: def.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_key(&self, entity: EntityTypeId, attr: &str) -> Result<(), RegistryError> {
        match self.entities.get(&entity) {
            Some(def) if def.has_attr(attr) => Ok(()),
            Some(def) => Err(RegistryError::UnknownJoinKey {
                entity: def.name.clone(),
                attr: attr.to_string(),
            }),
            None => Err(RegistryError::UnknownEntity(entity.to_string())),
        }
    }

    fn key_type(&self, entity: EntityTypeId, attr: &str) -> Result<ValueType, RegistryError> {
        let def = self
            .entities
            .get(&entity)
            .ok_or_else(|| RegistryError::UnknownEntity(entity.to_string()))?;
        def.get_attr(attr)
            .map(|a| a.value_type)
            .ok_or_else(|| RegistryError::UnknownJoinKey {
                entity: def.name.clone(),
                attr: attr.to_string(),
            })
    }

    fn insert_relation(&mut self, def: RelationDef) -> RelationId {
        let id = def.id;
        if let Some(source) = self.entities.get_mut(&def.source) {
            source.relations.insert(def.name.clone(), id);
        }
        self.relations.insert(id, def);
        id
    }

    fn alloc_relation_id(&mut self) -> RelationId {
        let id = RelationId::new(self.next_relation_id);
        self.next_relation_id += 1;
        id
    }
}

/// Builder for an entity definition.
pub struct EntityBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: EntityTypeId,
    name: String,
    attributes: HashMap<String, AttrDef>,
}

impl<'a> EntityBuilder<'a> {
    /// Add an attribute.
    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attributes.insert(attr.name.clone(), attr);
        self
    }

    /// Finish building this entity.
    pub fn done(self) -> Result<EntityTypeId, RegistryError> {
        if self.builder.entity_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateEntityName(self.name));
        }

        let mut def = EntityDef::new(self.id, self.name.clone());
        def.attributes = self.attributes;

        self.builder.entity_names.insert(self.name, self.id);
        self.builder.entities.insert(self.id, def);

        Ok(self.id)
    }
}

/// Builder for a relationship definition.
pub struct RelationBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    source: String,
    name: String,
    target: String,
    cardinality: Cardinality,
    keys: Option<(String, String)>,
    backref: Option<String>,
}

impl<'a> RelationBuilder<'a> {
    /// Many-to-one: `source.local_key` references `target.remote_key`.
    pub fn to_one(mut self, local_key: impl Into<String>, remote_key: impl Into<String>) -> Self {
        self.cardinality = Cardinality::ToOne;
        self.keys = Some((local_key.into(), remote_key.into()));
        self
    }

    /// One-to-many: `target.remote_key` references `source.local_key`.
    pub fn to_many(mut self, local_key: impl Into<String>, remote_key: impl Into<String>) -> Self {
        self.cardinality = Cardinality::ToMany;
        self.keys = Some((local_key.into(), remote_key.into()));
        self
    }

    /// Also register the inverse relationship on the target under `name`.
    pub fn backref(mut self, name: impl Into<String>) -> Self {
        self.backref = Some(name.into());
        self
    }

    /// Finish building this relationship.
    pub fn done(self) -> Result<RelationId, RegistryError> {
        let source = self.builder.resolve_entity(&self.source)?;
        let target = self.builder.resolve_entity(&self.target)?;
        let (local_key, remote_key) = self
            .keys
            .ok_or_else(|| RegistryError::MissingJoinKeys(self.name.clone()))?;

        self.builder.check_relation_name(source, &self.name)?;
        self.builder.check_key(source, &local_key)?;
        self.builder.check_key(target, &remote_key)?;
        if let Some(ref backref) = self.backref {
            self.builder.check_relation_name(target, backref)?;
            if source == target && *backref == self.name {
                return Err(RegistryError::DuplicateRelationName {
                    entity: self.source,
                    name: self.name,
                });
            }
        }

        let id = self.builder.alloc_relation_id();
        self.builder.insert_relation(RelationDef {
            id,
            name: self.name,
            source,
            target,
            cardinality: self.cardinality,
            local_key: local_key.clone(),
            remote_key: remote_key.clone(),
        });

        if let Some(backref) = self.backref {
            let inverse_id = self.builder.alloc_relation_id();
            self.builder.insert_relation(RelationDef {
                id: inverse_id,
                name: backref,
                source: target,
                target: source,
                cardinality: self.cardinality.inverse(),
                local_key: remote_key,
                remote_key: local_key,
            });
        }

        Ok(id)
    }
}
