//! Path resolution and join accumulation.
//!
//! [`PathResolver`] walks the tokens of one lookup key against the schema
//! graph and yields a [`Step`] per token. [`JoinAccumulator`] collects the
//! joins one compiler call needs and applies them to the query at the end.

use std::str::Split;

use djq_core::EntityTypeId;
use djq_query::{ColumnRef, Join, JoinPath, Query};
use djq_registry::{AttributeRef, RelationRef, SchemaGraph};
use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::operators::{Operator, OperatorRegistry};

/// One resolved token.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A relationship was traversed; the cursor moved to its target.
    Join { join: Join, relation: RelationRef },
    /// A terminal attribute was reached.
    Column {
        column: ColumnRef,
        attribute: AttributeRef,
    },
    /// The operator token following the terminal attribute.
    Operator(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Walking,
    AtColumn,
    AfterOperator,
    Done,
}

/// Lazy token-by-token resolution of a lookup key.
///
/// The resolver is fused: after an error or the last step it yields `None`.
pub struct PathResolver<'a, G: ?Sized> {
    graph: &'a G,
    operators: &'a OperatorRegistry,
    key: &'a str,
    tokens: Split<'a, &'a str>,
    last: &'a str,
    cursor: EntityTypeId,
    path: JoinPath,
    state: State,
}

impl<'a, G: SchemaGraph + ?Sized> PathResolver<'a, G> {
    pub fn new(
        graph: &'a G,
        operators: &'a OperatorRegistry,
        root: EntityTypeId,
        key: &'a str,
        separator: &'a str,
    ) -> Self {
        Self {
            graph,
            operators,
            key,
            tokens: key.split(separator),
            last: key,
            cursor: root,
            path: JoinPath::root(),
            state: State::Walking,
        }
    }

    fn entity_name(&self) -> String {
        self.graph
            .entity_name(self.cursor)
            .map(str::to_string)
            .unwrap_or_else(|| self.cursor.to_string())
    }

    fn fail(&mut self, token: &str, reason: String) -> CompileError {
        self.state = State::Done;
        CompileError::malformed_lookup(self.key, token, reason)
    }

    fn walk(&mut self, token: &str) -> CompileResult<Step> {
        if token.is_empty() {
            return Err(self.fail(token, "empty path segment".to_string()));
        }

        if let Some(relation) = self.graph.resolve_relationship(self.cursor, token) {
            let path = self.path.child(relation.id);
            let join = Join {
                path: path.clone(),
                relation: relation.id,
                name: relation.name.clone(),
                target: relation.target,
            };
            trace!(key = self.key, token, path = %path, "traversed relationship");
            self.path = path;
            self.cursor = relation.target;
            return Ok(Step::Join { join, relation });
        }

        if let Some(attribute) = self.graph.resolve_attribute(self.cursor, token) {
            trace!(key = self.key, token, "resolved column");
            self.state = State::AtColumn;
            let column = ColumnRef::new(self.path.clone(), self.cursor, attribute.name.clone());
            return Ok(Step::Column { column, attribute });
        }

        let reason = if self.operators.contains(token) {
            format!("operator must follow a column of {}", self.entity_name())
        } else {
            format!("no field named '{}' on {}", token, self.entity_name())
        };
        Err(self.fail(token, reason))
    }
}

impl<G: SchemaGraph + ?Sized> Iterator for PathResolver<'_, G> {
    type Item = CompileResult<Step>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Walking => match self.tokens.next() {
                Some(token) => {
                    self.last = token;
                    Some(self.walk(token))
                }
                None => {
                    let reason = format!("{} is a table, column expected", self.entity_name());
                    Some(Err(self.fail(self.last, reason)))
                }
            },
            State::AtColumn => match self.tokens.next() {
                None => {
                    self.state = State::Done;
                    None
                }
                Some(token) => match self.operators.lookup(token) {
                    Some(op) => {
                        self.state = State::AfterOperator;
                        Some(Ok(Step::Operator(op)))
                    }
                    None => {
                        let reason = format!("unknown operator '{}'", token);
                        Some(Err(self.fail(token, reason)))
                    }
                },
            },
            State::AfterOperator => match self.tokens.next() {
                None => {
                    self.state = State::Done;
                    None
                }
                Some(token) => {
                    let reason = "unexpected token after operator".to_string();
                    Some(Err(self.fail(token, reason)))
                }
            },
        }
    }
}

/// A fully resolved lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLookup {
    /// Joins traversed to reach the column, in path order.
    pub joins: Vec<Join>,
    pub column: ColumnRef,
    pub attribute: AttributeRef,
    /// Trailing operator, if any.
    pub operator: Option<Operator>,
}

/// Drain a resolver into a [`ResolvedLookup`].
pub fn resolve_lookup<G: SchemaGraph + ?Sized>(
    resolver: PathResolver<'_, G>,
) -> CompileResult<ResolvedLookup> {
    let key = resolver.key;
    let mut joins = Vec::new();
    let mut terminal = None;
    let mut operator = None;

    for step in resolver {
        match step? {
            Step::Join { join, .. } => joins.push(join),
            Step::Column { column, attribute } => terminal = Some((column, attribute)),
            Step::Operator(op) => operator = Some(op),
        }
    }

    let (column, attribute) = terminal
        .ok_or_else(|| CompileError::malformed_lookup(key, key, "column expected"))?;
    Ok(ResolvedLookup {
        joins,
        column,
        attribute,
        operator,
    })
}

/// The joins needed by one compiler call, de-duplicated by path.
///
/// Created empty at the start of every call and consumed when applied, so
/// join state never leaks between calls.
#[derive(Debug, Default)]
pub struct JoinAccumulator {
    joins: Vec<Join>,
}

impl JoinAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a join. Returns false if its path was already registered.
    pub fn register(&mut self, join: Join) -> bool {
        if self.joins.iter().any(|j| j.path == join.path) {
            return false;
        }
        self.joins.push(join);
        true
    }

    pub fn extend(&mut self, joins: impl IntoIterator<Item = Join>) {
        for join in joins {
            self.register(join);
        }
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Join> {
        self.joins.iter()
    }

    /// Add every registered join to the query, after the joins it already has.
    pub fn apply(self, query: Query) -> Query {
        self.joins.into_iter().fold(query, Query::join)
    }
}
