//! Indexes for efficient row lookups.

use djq_core::{EntityTypeId, RowId, Value};
use std::collections::{BTreeSet, HashMap};

/// Type index: EntityTypeId -> ordered Set<RowId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<EntityTypeId, BTreeSet<RowId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: EntityTypeId, row_id: RowId) {
        self.index.entry(type_id).or_default().insert(row_id);
    }

    pub fn get(&self, type_id: EntityTypeId) -> impl Iterator<Item = RowId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, type_id: EntityTypeId) -> usize {
        self.index.get(&type_id).map(|set| set.len()).unwrap_or(0)
    }
}

/// Key for attribute index: (EntityTypeId, attribute name, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrKey {
    pub type_id: EntityTypeId,
    pub attr_name: String,
    pub value: AttrValue,
}

/// Simplified value for attribute indexing.
/// Only exact matches on hashable scalars are indexed; join keys are
/// almost always integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl AttrValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Int(i) => Some(AttrValue::Int(*i)),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            // Null never joins; Float, Timestamp, Date and List are not indexed
            _ => None,
        }
    }
}

/// Attribute index: (EntityTypeId, attr_name, value) -> ordered Set<RowId>
#[derive(Debug, Default)]
pub struct AttributeIndex {
    exact: HashMap<AttrKey, BTreeSet<RowId>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: EntityTypeId, attr_name: &str, value: &Value, row_id: RowId) {
        if let Some(attr_value) = AttrValue::from_value(value) {
            let key = AttrKey {
                type_id,
                attr_name: attr_name.to_string(),
                value: attr_value,
            };
            self.exact.entry(key).or_default().insert(row_id);
        }
    }

    /// Returns `None` when the value is not indexable (caller must scan).
    pub fn find_exact(
        &self,
        type_id: EntityTypeId,
        attr_name: &str,
        value: &Value,
    ) -> Option<Vec<RowId>> {
        let attr_value = AttrValue::from_value(value)?;
        let key = AttrKey {
            type_id,
            attr_name: attr_name.to_string(),
            value: attr_value,
        };
        Some(
            self.exact
                .get(&key)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
        )
    }
}
