//! The join-aware query composer.
//!
//! Every public call takes a query by reference and returns the extended
//! query. A call either succeeds as a whole or leaves nothing behind: joins
//! and predicates are collected first and only applied once every lookup
//! has resolved.

use djq_core::{EntityTypeId, Row};
use djq_query::{EagerLoad, JoinPath, Query, QueryBackend, QueryError, SortExpr};
use djq_registry::SchemaGraph;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};
use crate::lookups::Lookups;
use crate::operators::{Operator, OperatorRegistry};
use crate::params::{convert_value, RequestFilters};
use crate::resolve::{resolve_lookup, JoinAccumulator, PathResolver, ResolvedLookup};

/// How lookup values reach the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueSource {
    /// Values supplied by code.
    Typed,
    /// Raw request-parameter strings.
    Request,
}

/// Compiles lookups into queries against a schema graph.
#[derive(Debug, Clone)]
pub struct Compiler<G> {
    graph: G,
    operators: OperatorRegistry,
    config: CompilerConfig,
}

impl<G: SchemaGraph> Compiler<G> {
    /// Create a compiler with the default configuration.
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            operators: OperatorRegistry::standard(),
            config: CompilerConfig::default(),
        }
    }

    /// Create a compiler from a configuration.
    pub fn with_config(graph: G, config: CompilerConfig) -> CompileResult<Self> {
        config.validate()?;
        let operators = OperatorRegistry::from_config(&config)?;
        Ok(Self {
            graph,
            operators,
            config,
        })
    }

    /// Replace the operator registry.
    pub fn with_operators(mut self, operators: OperatorRegistry) -> Self {
        self.operators = operators;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Step-by-step resolver for one key, starting at `root`.
    pub fn resolver<'a>(&'a self, root: EntityTypeId, key: &'a str) -> PathResolver<'a, G> {
        PathResolver::new(
            &self.graph,
            &self.operators,
            root,
            key,
            &self.config.separator,
        )
    }

    /// Resolve a lookup key to its joins, column and operator.
    pub fn resolve(&self, root: EntityTypeId, key: &str) -> CompileResult<ResolvedLookup> {
        resolve_lookup(self.resolver(root, key))
    }

    // ==================== Filtering ====================

    /// AND the lookups into the query, joining every relationship they traverse.
    pub fn filter_by(&self, query: &Query, lookups: &Lookups) -> CompileResult<Query> {
        self.filter_or_exclude(query, lookups, false, ValueSource::Typed)
    }

    /// Like [`filter_by`](Self::filter_by), but each lookup's predicate is
    /// negated on its own: `exclude_by(a=1, b=2)` means `NOT a=1 AND NOT b=2`.
    pub fn exclude_by(&self, query: &Query, lookups: &Lookups) -> CompileResult<Query> {
        self.filter_or_exclude(query, lookups, true, ValueSource::Typed)
    }

    fn filter_or_exclude(
        &self,
        query: &Query,
        lookups: &Lookups,
        negate: bool,
        source: ValueSource,
    ) -> CompileResult<Query> {
        let mut joins = JoinAccumulator::new();
        let mut predicates = Vec::with_capacity(lookups.len());

        for (key, value) in lookups.iter() {
            let resolved = self.resolve(query.root(), key)?;
            let operator = resolved.operator.unwrap_or(Operator::Eq);
            let value = match source {
                ValueSource::Typed => value.clone(),
                ValueSource::Request => {
                    convert_value(operator, resolved.attribute.value_type, value)
                }
            };
            let predicate = operator.build(
                resolved.column,
                &resolved.attribute,
                value,
                self.config.coerce_strings,
            )?;
            joins.extend(resolved.joins);
            predicates.push(if negate { predicate.negate() } else { predicate });
        }

        debug!(
            lookups = lookups.len(),
            joins = joins.len(),
            negate,
            "compiled filter"
        );

        let query = joins.apply(query.clone());
        Ok(predicates.into_iter().fold(query, Query::filter))
    }

    // ==================== Ordering ====================

    /// Append sort keys. A leading `-` sorts descending, `+` or nothing ascending.
    ///
    /// Joins needed by the keys are added after the query's existing joins.
    pub fn order_by<S: AsRef<str>>(&self, query: &Query, keys: &[S]) -> CompileResult<Query> {
        let mut joins = JoinAccumulator::new();
        let mut sorts = Vec::with_capacity(keys.len());

        for key in keys {
            let key = key.as_ref();
            let (path, descending) = match key.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (key.strip_prefix('+').unwrap_or(key), false),
            };

            let resolved = self.resolve(query.root(), path)?;
            if let Some(op) = resolved.operator {
                return Err(CompileError::malformed_lookup(
                    key,
                    op.token(),
                    "operators are not allowed in ordering, column expected",
                ));
            }

            let sort = SortExpr::asc(resolved.column);
            sorts.push(if descending { sort.desc() } else { sort });
            joins.extend(resolved.joins);
        }

        debug!(keys = keys.len(), joins = joins.len(), "compiled ordering");

        let query = sorts.into_iter().fold(query.clone(), Query::order_by);
        Ok(joins.apply(query))
    }

    // ==================== Eager loading ====================

    /// Request eager loading of relationship paths.
    ///
    /// `depth` may be absent or 1. Loading is chained through every hop when
    /// `depth` is absent or any path has more than one hop.
    pub fn select_related<S: AsRef<str>>(
        &self,
        query: &Query,
        paths: &[S],
        depth: Option<usize>,
    ) -> CompileResult<Query> {
        if !matches!(depth, None | Some(1)) {
            return Err(CompileError::invalid_option(format!(
                "depth can only be 1 or absent, got {}",
                depth.unwrap_or_default()
            )));
        }

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            resolved.push(self.resolve_relationship_path(query.root(), path.as_ref())?);
        }

        let chained = depth.is_none() || resolved.iter().any(|p| p.len() > 1);
        let query = resolved.into_iter().fold(query.clone(), |q, path| {
            q.eager_load(EagerLoad { path, chained })
        });
        Ok(query)
    }

    fn resolve_relationship_path(&self, root: EntityTypeId, key: &str) -> CompileResult<JoinPath> {
        let mut cursor = root;
        let mut path = JoinPath::root();
        for token in key.split(self.config.separator.as_str()) {
            match self.graph.resolve_relationship(cursor, token) {
                Some(relation) => {
                    path = path.child(relation.id);
                    cursor = relation.target;
                }
                None => {
                    let entity = self
                        .graph
                        .entity_name(cursor)
                        .map(str::to_string)
                        .unwrap_or_else(|| cursor.to_string());
                    return Err(CompileError::malformed_lookup(
                        key,
                        token,
                        format!("no relationship named '{}' on {}, relationship expected", token, entity),
                    ));
                }
            }
        }
        Ok(path)
    }

    // ==================== Request parameters ====================

    /// Apply parsed request filters: lookups first, then ordering.
    ///
    /// Raw parameter values are converted once each lookup has resolved to
    /// its operator and column.
    pub fn apply(&self, query: &Query, filters: &RequestFilters) -> CompileResult<Query> {
        let query =
            self.filter_or_exclude(query, &filters.lookups, false, ValueSource::Request)?;
        self.order_by(&query, filters.order.as_slice())
    }

    // ==================== Fetching ====================

    /// Fetch the single row matching the lookups.
    ///
    /// Zero rows is [`CompileError::NotFound`]; several rows surface the
    /// backend's own error.
    pub fn get_or_404<B: QueryBackend + ?Sized>(
        &self,
        backend: &B,
        query: &Query,
        lookups: &Lookups,
    ) -> CompileResult<Row> {
        let query = self.filter_by(query, lookups)?;
        match backend.one(&query) {
            Ok(row) => Ok(row),
            Err(QueryError::NoResult) => Err(CompileError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
