//! Request query-string parameters turned into lookups and ordering.
//!
//! Parameter values stay raw strings until their lookup has resolved;
//! [`convert_value`] then reads them against the operator and column type.

use djq_core::{Value, ValueType};

use crate::config::DEFAULT_SEPARATOR;
use crate::error::{CompileError, CompileResult};
use crate::lookups::Lookups;
use crate::operators::Operator;

/// Parameter holding comma-separated sort keys.
pub const ORDER_BY_PARAM: &str = "order_by";

/// Parameters owned by the paginator.
pub const PAGINATION_PARAMS: [&str; 2] = ["limit", "offset"];

/// Parameter spellings of null.
pub const NULL_LITERALS: [&str; 3] = ["nil", "none", "None"];

/// Lookups and sort keys extracted from request parameters.
///
/// Lookup values are the raw parameter strings (lists of them for `in`
/// and `range`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilters {
    pub lookups: Lookups,
    pub order: Vec<String>,
}

impl RequestFilters {
    /// Parse parameters with the default separator.
    ///
    /// `allowed` restricts filtering to the listed field paths (a field path
    /// also admits any operator suffix). `None` allows every field.
    pub fn parse<I, K, V>(params: I, allowed: Option<&[&str]>) -> CompileResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::parse_with_separator(params, allowed, DEFAULT_SEPARATOR)
    }

    pub fn parse_with_separator<I, K, V>(
        params: I,
        allowed: Option<&[&str]>,
        separator: &str,
    ) -> CompileResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = RequestFilters::default();

        for (key, raw) in params {
            let (key, raw) = (key.as_ref(), raw.as_ref());

            if key == ORDER_BY_PARAM {
                filters.order.extend(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(str::to_string),
                );
                continue;
            }
            if PAGINATION_PARAMS.contains(&key) {
                continue;
            }

            if let Some(allowed) = allowed {
                let permitted = allowed.iter().any(|field| {
                    key == *field
                        || key
                            .strip_prefix(field)
                            .is_some_and(|rest| rest.starts_with(separator))
                });
                if !permitted {
                    return Err(CompileError::invalid_filter(key));
                }
            }

            let operator = key.rsplit(separator).next().unwrap_or(key);
            let value = match operator {
                "in" => Value::List(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(Value::from)
                        .collect(),
                ),
                "range" => {
                    let bounds: Vec<Value> = raw.split(',').map(str::trim).map(Value::from).collect();
                    if bounds.len() != 2 {
                        return Err(CompileError::invalid_filter_value(
                            "range",
                            "two comma-separated bounds",
                            &Value::from(raw),
                        ));
                    }
                    Value::List(bounds)
                }
                _ => Value::from(raw),
            };
            filters.lookups.insert(key, value);
        }

        Ok(filters)
    }
}

/// Convert a raw parameter value for the lookup it feeds.
///
/// Pattern operators take the text as written. Elsewhere a null literal
/// means null, and `true`/`True`/`false`/`False` become booleans on Bool
/// columns only. Other strings are left for the operator's typed coercion.
pub fn convert_value(operator: Operator, value_type: ValueType, raw: &Value) -> Value {
    match raw {
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| convert_value(operator, value_type, item))
                .collect(),
        ),
        Value::String(_) if operator.is_textual() => raw.clone(),
        Value::String(s) if operator == Operator::IsNull => {
            raw.coerce_to(ValueType::Bool).unwrap_or_else(|| Value::String(s.clone()))
        }
        Value::String(s) if NULL_LITERALS.contains(&s.as_str()) => Value::Null,
        Value::String(s) => match (s.as_str(), value_type) {
            ("true" | "True", ValueType::Bool) => Value::Bool(true),
            ("false" | "False", ValueType::Bool) => Value::Bool(false),
            _ => raw.clone(),
        },
        other => other.clone(),
    }
}
