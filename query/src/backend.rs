//! The execution seam: anything that can run a [`Query`].

use djq_core::Row;

use crate::{Query, QueryError, QueryResult};

/// Executes queries and returns root-entity rows.
///
/// Only `fetch` is required; the single-row helpers follow the usual ORM
/// contract (`one` fails on zero or several rows, `first` does not).
pub trait QueryBackend {
    /// All root rows matching the query, ordered and sliced.
    fn fetch(&self, query: &Query) -> QueryResult<Vec<Row>>;

    /// Number of matching root rows, ignoring the slice.
    fn count(&self, query: &Query) -> QueryResult<usize> {
        let mut unsliced = Query::new(query.root());
        for join in query.joins() {
            unsliced = unsliced.join(join.clone());
        }
        for predicate in query.predicates() {
            unsliced = unsliced.filter(predicate.clone());
        }
        Ok(self.fetch(&unsliced)?.len())
    }

    /// The first matching row, if any.
    fn first(&self, query: &Query) -> QueryResult<Option<Row>> {
        let limit = query.limit().map_or(1, |l| l.min(1));
        let limited = query.clone().with_limit(limit);
        Ok(self.fetch(&limited)?.into_iter().next())
    }

    /// Exactly one matching row.
    fn one(&self, query: &Query) -> QueryResult<Row> {
        let mut rows = self.fetch(query)?;
        match rows.len() {
            0 => Err(QueryError::NoResult),
            1 => Ok(rows.remove(0)),
            count => Err(QueryError::MultipleResults { count }),
        }
    }
}
