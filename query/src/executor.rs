//! In-memory query execution.
//!
//! Evaluates a [`Query`] against a [`Store`]: root scan, inner joins along
//! each join path, three-valued predicate evaluation, stable multi-key sort,
//! root-row de-duplication and slicing.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use djq_core::{Row, RowId, StoreError, Value};
use djq_registry::Registry;
use djq_store::Store;
use regex_lite::Regex;
use tracing::debug;

use crate::expr::{ColumnRef, CompareOp, DatePart, Direction, JoinPath, Predicate, SortExpr, LIKE_ESCAPE};
use crate::{Join, Query, QueryBackend, QueryError, QueryResult};

/// One combination of joined rows, keyed by join path.
type Binding = HashMap<JoinPath, RowId>;

/// Executes queries against the in-memory store.
pub struct MemoryBackend<'r, 's> {
    registry: &'r Registry,
    store: &'s Store,
}

impl<'r, 's> MemoryBackend<'r, 's> {
    /// Create a new backend.
    pub fn new(registry: &'r Registry, store: &'s Store) -> Self {
        Self { registry, store }
    }

    fn scan_root(&self, query: &Query) -> Vec<Binding> {
        self.store
            .rows_by_type(query.root())
            .map(|id| {
                let mut binding = Binding::new();
                binding.insert(JoinPath::root(), id);
                binding
            })
            .collect()
    }

    fn apply_join(&self, bindings: Vec<Binding>, join: &Join) -> QueryResult<Vec<Binding>> {
        let relation = self
            .registry
            .get_relation(join.relation)
            .ok_or(QueryError::UnknownRelation(join.relation))?;
        let parent = join.path.parent();

        let mut joined = Vec::new();
        for binding in bindings {
            let parent_id = *binding
                .get(&parent)
                .ok_or_else(|| QueryError::unjoined_path(&parent))?;
            let parent_row = self
                .store
                .get(parent_id)
                .ok_or(StoreError::RowNotFound(parent_id))?;
            let key = parent_row.attr_or_null(&relation.local_key);

            for target in self
                .store
                .rows_by_attr(relation.target, &relation.remote_key, key)
            {
                let mut extended = binding.clone();
                extended.insert(join.path.clone(), target);
                joined.push(extended);
            }
        }
        Ok(joined)
    }

    fn value_of(&self, binding: &Binding, column: &ColumnRef) -> QueryResult<&'s Value> {
        let store: &'s Store = self.store;
        let id = binding
            .get(&column.path)
            .ok_or_else(|| QueryError::unjoined_path(&column.path))?;
        let row = store.get(*id).ok_or(StoreError::RowNotFound(*id))?;
        Ok(row.attr_or_null(&column.attr))
    }

    fn eval(
        &self,
        predicate: &Predicate,
        binding: &Binding,
        matchers: &Matchers,
    ) -> QueryResult<Option<bool>> {
        let result = match predicate {
            Predicate::Compare { column, op, value } => {
                let actual = self.value_of(binding, column)?;
                actual.sql_cmp(value).map(|ord| compare(*op, ord))
            }
            Predicate::Like {
                column,
                pattern,
                case_insensitive,
            } => {
                let actual = self.value_of(binding, column)?;
                let source = like_regex_source(pattern, *case_insensitive);
                actual
                    .as_str()
                    .and_then(|s| matchers.get(&source).map(|re| re.is_match(s)))
            }
            Predicate::Regex {
                column,
                pattern,
                case_insensitive,
            } => {
                let actual = self.value_of(binding, column)?;
                let source = regex_source(pattern, *case_insensitive);
                actual
                    .as_str()
                    .and_then(|s| matchers.get(&source).map(|re| re.is_match(s)))
            }
            Predicate::In { column, values } => {
                let actual = self.value_of(binding, column)?;
                eval_in(actual, values)
            }
            Predicate::IsNull { column, is_null } => {
                let actual = self.value_of(binding, column)?;
                Some(actual.is_null() == *is_null)
            }
            Predicate::Between { column, low, high } => {
                let actual = self.value_of(binding, column)?;
                match (actual.sql_cmp(low), actual.sql_cmp(high)) {
                    (Some(lo), Some(hi)) => Some(lo.is_ge() && hi.is_le()),
                    _ => None,
                }
            }
            Predicate::DatePart {
                column,
                part,
                value,
            } => {
                let actual = self.value_of(binding, column)?;
                actual.date_parts().and_then(|(year, month, day)| {
                    let extracted = match part {
                        DatePart::Year => year as i64,
                        DatePart::Month => month as i64,
                        DatePart::Day => day as i64,
                    };
                    Value::Int(extracted).sql_cmp(value).map(|o| o.is_eq())
                })
            }
            Predicate::Not(inner) => self.eval(inner, binding, matchers)?.map(|b| !b),
            Predicate::And(items) => {
                let mut unknown = false;
                for item in items {
                    match self.eval(item, binding, matchers)? {
                        Some(false) => return Ok(Some(false)),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
        };
        Ok(result)
    }

    fn sort(&self, bindings: Vec<Binding>, order: &[SortExpr]) -> QueryResult<Vec<Binding>> {
        let mut keyed = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let keys = order
                .iter()
                .map(|term| self.value_of(&binding, &term.column))
                .collect::<QueryResult<Vec<&Value>>>()?;
            keyed.push((keys, binding));
        }

        keyed.sort_by(|(a, _), (b, _)| {
            for ((x, y), term) in a.iter().zip(b.iter()).zip(order) {
                let ord = match term.direction {
                    Direction::Asc => x.cmp_sortable(y),
                    Direction::Desc => y.cmp_sortable(x),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        Ok(keyed.into_iter().map(|(_, binding)| binding).collect())
    }
}

impl QueryBackend for MemoryBackend<'_, '_> {
    fn fetch(&self, query: &Query) -> QueryResult<Vec<Row>> {
        let mut bindings = self.scan_root(query);
        for join in query.joins() {
            bindings = self.apply_join(bindings, join)?;
        }

        if let Some(condition) = query.condition() {
            let matchers = Matchers::compile(&condition)?;
            let mut kept = Vec::with_capacity(bindings.len());
            for binding in bindings {
                if self.eval(&condition, &binding, &matchers)? == Some(true) {
                    kept.push(binding);
                }
            }
            bindings = kept;
        }

        if !query.order().is_empty() {
            bindings = self.sort(bindings, query.order())?;
        }

        let root = JoinPath::root();
        let mut seen = HashSet::new();
        let rows: Vec<Row> = bindings
            .iter()
            .filter_map(|binding| binding.get(&root).copied())
            .filter(|id| seen.insert(*id))
            .skip(query.offset().unwrap_or(0))
            .take(query.limit().unwrap_or(usize::MAX))
            .filter_map(|id| self.store.get(id).cloned())
            .collect();

        debug!(
            root = %query.root(),
            joins = query.joins().len(),
            rows = rows.len(),
            "executed query"
        );
        Ok(rows)
    }
}

fn compare(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord.is_eq(),
        CompareOp::Ne => ord.is_ne(),
        CompareOp::Gt => ord.is_gt(),
        CompareOp::Lt => ord.is_lt(),
        CompareOp::Ge => ord.is_ge(),
        CompareOp::Le => ord.is_le(),
    }
}

fn eval_in(actual: &Value, values: &[Value]) -> Option<bool> {
    if values.is_empty() {
        return Some(false);
    }
    if actual.is_null() {
        return None;
    }
    let mut unknown = false;
    for candidate in values {
        match actual.sql_cmp(candidate) {
            Some(Ordering::Equal) => return Some(true),
            None if candidate.is_null() => unknown = true,
            _ => {}
        }
    }
    if unknown {
        None
    } else {
        Some(false)
    }
}

/// Translate a LIKE pattern (with `\` escapes) into an anchored regex.
fn like_regex_source(pattern: &str, case_insensitive: bool) -> String {
    let mut out = String::from(if case_insensitive { "(?is)^" } else { "(?s)^" });
    let mut chars = pattern.chars();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        match c {
            LIKE_ESCAPE => {
                let literal = chars.next().unwrap_or(LIKE_ESCAPE);
                out.push_str(&regex_lite::escape(literal.encode_utf8(&mut buf)));
            }
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            other => out.push_str(&regex_lite::escape(other.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

fn regex_source(pattern: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        format!("(?i){}", pattern)
    } else {
        pattern.to_string()
    }
}

/// Compiled regexes for every LIKE/regex leaf of a condition.
struct Matchers {
    compiled: HashMap<String, Regex>,
}

impl Matchers {
    fn compile(condition: &Predicate) -> QueryResult<Self> {
        let mut sources = Vec::new();
        condition.for_each_leaf(&mut |leaf| match leaf {
            Predicate::Like {
                pattern,
                case_insensitive,
                ..
            } => sources.push((pattern.clone(), like_regex_source(pattern, *case_insensitive))),
            Predicate::Regex {
                pattern,
                case_insensitive,
                ..
            } => sources.push((pattern.clone(), regex_source(pattern, *case_insensitive))),
            _ => {}
        });

        let mut compiled = HashMap::new();
        for (pattern, source) in sources {
            if compiled.contains_key(&source) {
                continue;
            }
            let regex = Regex::new(&source)
                .map_err(|e| QueryError::invalid_pattern(pattern, e.to_string()))?;
            compiled.insert(source, regex);
        }
        Ok(Self { compiled })
    }

    fn get(&self, source: &str) -> Option<&Regex> {
        self.compiled.get(source)
    }
}
