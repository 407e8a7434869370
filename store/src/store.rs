//! Core row storage implementation.
//!
//! Rows are inserted while seeding and only read afterwards.

use crate::index::{AttributeIndex, TypeIndex};
use djq_core::{Attributes, EntityTypeId, Row, RowId, Value};
use std::collections::HashMap;

/// The in-memory row storage.
#[derive(Debug)]
pub struct Store {
    /// Row storage
    rows: HashMap<RowId, Row>,
    /// Next row ID to allocate
    next_row_id: u64,
    /// Type index
    type_index: TypeIndex,
    /// Attribute index
    attr_index: AttributeIndex,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            next_row_id: 1,
            type_index: TypeIndex::new(),
            attr_index: AttributeIndex::new(),
        }
    }

    // ==================== Row Operations ====================

    /// Insert a new row with the given entity type and attributes.
    pub fn insert(&mut self, type_id: EntityTypeId, attributes: Attributes) -> RowId {
        let id = RowId::new(self.next_row_id);
        self.next_row_id += 1;
        let row = Row::new(id, type_id, attributes);

        // Update indexes
        self.type_index.insert(type_id, id);
        for (attr_name, value) in &row.attributes {
            self.attr_index.insert(type_id, attr_name, value, id);
        }

        self.rows.insert(id, row);
        id
    }

    /// Get a row by ID.
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    // ==================== Query Operations ====================

    /// Row IDs of an entity type, in insertion order.
    pub fn rows_by_type(&self, type_id: EntityTypeId) -> impl Iterator<Item = RowId> + '_ {
        self.type_index.get(type_id)
    }

    /// Rows of an entity type, in insertion order.
    pub fn rows_of(&self, type_id: EntityTypeId) -> impl Iterator<Item = &Row> + '_ {
        self.type_index
            .get(type_id)
            .filter_map(move |id| self.rows.get(&id))
    }

    /// Find rows of a type whose attribute equals `value`.
    ///
    /// Uses the attribute index where possible and falls back to a scan.
    /// Null never matches.
    pub fn rows_by_attr(&self, type_id: EntityTypeId, attr_name: &str, value: &Value) -> Vec<RowId> {
        if value.is_null() {
            return Vec::new();
        }
        if let Some(ids) = self.attr_index.find_exact(type_id, attr_name, value) {
            return ids;
        }
        self.rows_of(type_id)
            .filter(|row| {
                row.get_attr(attr_name)
                    .and_then(|v| v.sql_cmp(value))
                    .map(|o| o.is_eq())
                    .unwrap_or(false)
            })
            .map(|row| row.id)
            .collect()
    }

    // ==================== Statistics ====================

    /// Get the number of rows in the store.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of rows of one entity type.
    pub fn type_count(&self, type_id: EntityTypeId) -> usize {
        self.type_index.count(type_id)
    }
}
