//! The query value the compiler targets.
//!
//! A `Query` is an immutable description of a read: the root entity, the
//! joins it needs, the AND-composed predicates, the ordering, eager-load
//! options and an optional slice. Every builder method consumes the value
//! and returns the extended one, so composition chains.

use djq_core::{EntityTypeId, RelationId};

use crate::expr::{JoinPath, Predicate, SortExpr};

/// An inner join along one relationship edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Full path from the root, ending with `relation`.
    pub path: JoinPath,
    /// The relationship edge being joined.
    pub relation: RelationId,
    /// Relationship name, for diagnostics.
    pub name: String,
    /// Entity reached by the join.
    pub target: EntityTypeId,
}

/// Eager-load option for a relationship path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EagerLoad {
    /// Relationship edges from the root.
    pub path: JoinPath,
    /// Load every hop of the path, not only the last one.
    pub chained: bool,
}

/// A composable relational query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    root: EntityTypeId,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    order: Vec<SortExpr>,
    eager: Vec<EagerLoad>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    /// Create a query selecting every row of `root`.
    pub fn new(root: EntityTypeId) -> Self {
        Self {
            root,
            joins: Vec::new(),
            predicates: Vec::new(),
            order: Vec::new(),
            eager: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ==================== Accessors ====================

    pub fn root(&self) -> EntityTypeId {
        self.root
    }

    /// Joins in application order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Check if a join along `path` is already present.
    pub fn has_join(&self, path: &JoinPath) -> bool {
        self.joins.iter().any(|j| &j.path == path)
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// All predicates AND-composed into one condition.
    pub fn condition(&self) -> Option<Predicate> {
        Predicate::all(self.predicates.clone())
    }

    pub fn order(&self) -> &[SortExpr] {
        &self.order
    }

    pub fn eager_loads(&self) -> &[EagerLoad] {
        &self.eager
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    // ==================== Composition ====================

    /// Add a predicate, AND-composed with the existing ones.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add a join. Joining a path that is already present is a no-op.
    pub fn join(mut self, join: Join) -> Self {
        if !self.has_join(&join.path) {
            self.joins.push(join);
        }
        self
    }

    /// Append a sort term after the existing ones.
    pub fn order_by(mut self, sort: SortExpr) -> Self {
        self.order.push(sort);
        self
    }

    /// Add an eager-load option. Repeating an option is a no-op.
    pub fn eager_load(mut self, option: EagerLoad) -> Self {
        if !self.eager.contains(&option) {
            self.eager.push(option);
        }
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}
