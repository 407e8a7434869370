//! Predicate and ordering expressions.
//!
//! Every expression refers to columns through a [`ColumnRef`], which names
//! the join path that reaches the column's entity from the query root.

use djq_core::{EntityTypeId, RelationId, Value};
use std::fmt;

/// Escape character used in LIKE patterns built by [`escape_like`].
pub const LIKE_ESCAPE: char = '\\';

/// Path of relationship edges from the query root. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinPath(Vec<RelationId>);

impl JoinPath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path extended by one more edge.
    pub fn child(&self, relation: RelationId) -> Self {
        let mut edges = self.0.clone();
        edges.push(relation);
        Self(edges)
    }

    /// The path without its last edge. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut edges = self.0.clone();
        edges.pop();
        Self(edges)
    }

    pub fn edges(&self) -> &[RelationId] {
        &self.0
    }
}

impl From<Vec<RelationId>> for JoinPath {
    fn from(edges: Vec<RelationId>) -> Self {
        Self(edges)
    }
}

impl fmt::Display for JoinPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }
        for (i, edge) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", edge)?;
        }
        Ok(())
    }
}

/// A terminal column reached through a join path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Join path from the root to the column's entity.
    pub path: JoinPath,
    /// Entity owning the column.
    pub entity: EntityTypeId,
    /// Attribute name.
    pub attr: String,
}

impl ColumnRef {
    pub fn new(path: JoinPath, entity: EntityTypeId, attr: impl Into<String>) -> Self {
        Self {
            path,
            entity,
            attr: attr.into(),
        }
    }

    /// A column on the root entity.
    pub fn root(entity: EntityTypeId, attr: impl Into<String>) -> Self {
        Self::new(JoinPath::root(), entity, attr)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.path, self.entity, self.attr)
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }
}

/// Calendar component extracted from a date or timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    pub fn name(&self) -> &'static str {
        match self {
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
        }
    }
}

/// A boolean condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// `column [I]LIKE pattern ESCAPE '\'`
    Like {
        column: ColumnRef,
        pattern: String,
        case_insensitive: bool,
    },
    /// Regular-expression match.
    Regex {
        column: ColumnRef,
        pattern: String,
        case_insensitive: bool,
    },
    /// `column IN (values)`; an empty list matches nothing.
    In { column: ColumnRef, values: Vec<Value> },
    /// `column IS NULL` or `column IS NOT NULL`.
    IsNull { column: ColumnRef, is_null: bool },
    /// `column BETWEEN low AND high`, inclusive.
    Between {
        column: ColumnRef,
        low: Value,
        high: Value,
    },
    /// `EXTRACT(part FROM column) = value`
    DatePart {
        column: ColumnRef,
        part: DatePart,
        value: Value,
    },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
}

impl Predicate {
    /// Wrap this predicate in a logical NOT.
    pub fn negate(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// AND-compose predicates; a single predicate is returned unchanged.
    pub fn all(mut predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::And(predicates)),
        }
    }

    /// The column a leaf predicate tests.
    pub fn column(&self) -> Option<&ColumnRef> {
        match self {
            Predicate::Compare { column, .. }
            | Predicate::Like { column, .. }
            | Predicate::Regex { column, .. }
            | Predicate::In { column, .. }
            | Predicate::IsNull { column, .. }
            | Predicate::Between { column, .. }
            | Predicate::DatePart { column, .. } => Some(column),
            Predicate::Not(_) | Predicate::And(_) => None,
        }
    }

    /// Visit every leaf predicate.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a Predicate)) {
        match self {
            Predicate::Not(inner) => inner.for_each_leaf(f),
            Predicate::And(items) => {
                for item in items {
                    item.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                write!(f, "{} {} {}", column, op.symbol(), value)
            }
            Predicate::Like {
                column,
                pattern,
                case_insensitive,
            } => {
                let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
                write!(f, "{} {} '{}'", column, op, pattern)
            }
            Predicate::Regex {
                column,
                pattern,
                case_insensitive,
            } => {
                let op = if *case_insensitive { "~*" } else { "~" };
                write!(f, "{} {} '{}'", column, op, pattern)
            }
            Predicate::In { column, values } => {
                write!(f, "{} IN {}", column, Value::List(values.clone()))
            }
            Predicate::IsNull { column, is_null } => {
                let op = if *is_null { "IS NULL" } else { "IS NOT NULL" };
                write!(f, "{} {}", column, op)
            }
            Predicate::Between { column, low, high } => {
                write!(f, "{} BETWEEN {} AND {}", column, low, high)
            }
            Predicate::DatePart {
                column,
                part,
                value,
            } => write!(f, "EXTRACT({} FROM {}) = {}", part.name(), column, value),
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::And(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "({})", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortExpr {
    pub column: ColumnRef,
    pub direction: Direction,
}

impl SortExpr {
    pub fn asc(column: ColumnRef) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    /// The same term sorted descending.
    pub fn desc(self) -> Self {
        Self {
            direction: Direction::Desc,
            ..self
        }
    }
}

/// Escape LIKE wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
