//! Lookup operators and the registry that maps tokens onto them.
//!
//! Each [`Operator`] turns a column reference and a supplied value into a
//! [`Predicate`]. Construction is pure: it never touches the schema graph or
//! the query being composed.

use std::collections::BTreeMap;

use djq_core::{Value, ValueType};
use djq_query::{escape_like, ColumnRef, CompareOp, DatePart, Predicate};
use djq_registry::AttributeRef;
use regex_lite::Regex;

use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};

/// Built-in operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Regex,
    IRegex,
    In,
    IsNull,
    Range,
    Year,
    Month,
    Day,
}

impl Operator {
    /// Every built-in operator.
    pub const ALL: [Operator; 22] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Exact,
        Operator::IExact,
        Operator::Contains,
        Operator::IContains,
        Operator::StartsWith,
        Operator::IStartsWith,
        Operator::EndsWith,
        Operator::IEndsWith,
        Operator::Regex,
        Operator::IRegex,
        Operator::In,
        Operator::IsNull,
        Operator::Range,
        Operator::Year,
        Operator::Month,
        Operator::Day,
    ];

    /// The token that selects this operator in a lookup key.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Exact => "exact",
            Operator::IExact => "iexact",
            Operator::Contains => "contains",
            Operator::IContains => "icontains",
            Operator::StartsWith => "startswith",
            Operator::IStartsWith => "istartswith",
            Operator::EndsWith => "endswith",
            Operator::IEndsWith => "iendswith",
            Operator::Regex => "regex",
            Operator::IRegex => "iregex",
            Operator::In => "in",
            Operator::IsNull => "isnull",
            Operator::Range => "range",
            Operator::Year => "year",
            Operator::Month => "month",
            Operator::Day => "day",
        }
    }

    /// Look up a built-in operator by its canonical token.
    pub fn from_token(token: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Build the predicate for `column <op> value`.
    ///
    /// With `coerce` set, values are converted to the attribute's declared
    /// type first; a value that cannot be converted is rejected. Pattern
    /// operators need a String column and date parts a Date or Timestamp one.
    pub fn build(
        &self,
        column: ColumnRef,
        attr: &AttributeRef,
        value: Value,
        coerce: bool,
    ) -> CompileResult<Predicate> {
        self.check_column(attr, &value)?;
        let predicate = match self {
            Operator::Eq | Operator::Exact if value.is_null() => Predicate::IsNull {
                column,
                is_null: true,
            },
            Operator::Ne if value.is_null() => Predicate::IsNull {
                column,
                is_null: false,
            },
            Operator::Eq | Operator::Exact => self.compare(column, CompareOp::Eq, attr, value, coerce)?,
            Operator::Ne => self.compare(column, CompareOp::Ne, attr, value, coerce)?,
            Operator::Gt => self.compare(column, CompareOp::Gt, attr, value, coerce)?,
            Operator::Lt => self.compare(column, CompareOp::Lt, attr, value, coerce)?,
            Operator::Gte => self.compare(column, CompareOp::Ge, attr, value, coerce)?,
            Operator::Lte => self.compare(column, CompareOp::Le, attr, value, coerce)?,
            Operator::IExact => self.like(column, escape_like(&self.text(&value, coerce)?), true),
            Operator::Contains | Operator::IContains => {
                let text = escape_like(&self.text(&value, coerce)?);
                self.like(column, format!("%{}%", text), *self == Operator::IContains)
            }
            Operator::StartsWith | Operator::IStartsWith => {
                let text = escape_like(&self.text(&value, coerce)?);
                self.like(column, format!("{}%", text), *self == Operator::IStartsWith)
            }
            Operator::EndsWith | Operator::IEndsWith => {
                let text = escape_like(&self.text(&value, coerce)?);
                self.like(column, format!("%{}", text), *self == Operator::IEndsWith)
            }
            Operator::Regex | Operator::IRegex => {
                let case_insensitive = *self == Operator::IRegex;
                let pattern = self.text(&value, coerce)?;
                let source = if case_insensitive {
                    format!("(?i){}", pattern)
                } else {
                    pattern.clone()
                };
                if let Err(e) = Regex::new(&source) {
                    return Err(CompileError::invalid_filter_value(
                        self.token(),
                        format!("a valid regular expression ({})", e),
                        &value,
                    ));
                }
                Predicate::Regex {
                    column,
                    pattern,
                    case_insensitive,
                }
            }
            Operator::In => {
                let items = match value {
                    Value::List(items) => items,
                    other => {
                        return Err(CompileError::invalid_filter_value(
                            self.token(),
                            "a list of values",
                            &other,
                        ))
                    }
                };
                let values = items
                    .into_iter()
                    .map(|item| self.scalar(attr, item, coerce))
                    .collect::<CompileResult<Vec<_>>>()?;
                Predicate::In { column, values }
            }
            Operator::IsNull => {
                let flag = match value.coerce_to(ValueType::Bool) {
                    Some(Value::Bool(b)) if coerce || value.as_bool().is_some() => b,
                    _ => {
                        return Err(CompileError::invalid_filter_value(
                            self.token(),
                            "a boolean",
                            &value,
                        ))
                    }
                };
                Predicate::IsNull {
                    column,
                    is_null: flag,
                }
            }
            Operator::Range => {
                let (low, high) = match value {
                    Value::List(items) if items.len() == 2 => {
                        let mut items = items.into_iter();
                        let low = items.next().unwrap_or(Value::Null);
                        let high = items.next().unwrap_or(Value::Null);
                        (low, high)
                    }
                    other => {
                        return Err(CompileError::invalid_filter_value(
                            self.token(),
                            "a pair of (low, high) bounds",
                            &other,
                        ))
                    }
                };
                Predicate::Between {
                    column,
                    low: self.bound(attr, low, coerce)?,
                    high: self.bound(attr, high, coerce)?,
                }
            }
            Operator::Year | Operator::Month | Operator::Day => {
                let part = match self {
                    Operator::Year => DatePart::Year,
                    Operator::Month => DatePart::Month,
                    _ => DatePart::Day,
                };
                let converted = if coerce {
                    value.coerce_to(ValueType::Int)
                } else {
                    value.as_int().map(Value::Int)
                };
                match converted {
                    Some(v @ Value::Int(_)) => Predicate::DatePart {
                        column,
                        part,
                        value: v,
                    },
                    _ => {
                        return Err(CompileError::invalid_filter_value(
                            self.token(),
                            "an integer",
                            &value,
                        ))
                    }
                }
            }
        };
        Ok(predicate)
    }

    /// Whether this operator applies to the attribute's type at all.
    fn check_column(&self, attr: &AttributeRef, value: &Value) -> CompileResult<()> {
        let expected = match self {
            Operator::Year | Operator::Month | Operator::Day
                if !matches!(attr.value_type, ValueType::Date | ValueType::Timestamp) =>
            {
                "a Date or Timestamp column"
            }
            op if op.is_textual() && attr.value_type != ValueType::String => "a String column",
            _ => return Ok(()),
        };
        Err(CompileError::invalid_filter_value(
            self.token(),
            format!("{} ('{}' is {})", expected, attr.name, attr.value_type),
            value,
        ))
    }

    /// Operators matching the column's text against a pattern.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Operator::IExact
                | Operator::Contains
                | Operator::IContains
                | Operator::StartsWith
                | Operator::IStartsWith
                | Operator::EndsWith
                | Operator::IEndsWith
                | Operator::Regex
                | Operator::IRegex
        )
    }

    fn compare(
        &self,
        column: ColumnRef,
        op: CompareOp,
        attr: &AttributeRef,
        value: Value,
        coerce: bool,
    ) -> CompileResult<Predicate> {
        let value = self.bound(attr, value, coerce)?;
        Ok(Predicate::Compare { column, op, value })
    }

    fn like(&self, column: ColumnRef, pattern: String, case_insensitive: bool) -> Predicate {
        Predicate::Like {
            column,
            pattern,
            case_insensitive,
        }
    }

    /// A non-null scalar.
    fn bound(&self, attr: &AttributeRef, value: Value, coerce: bool) -> CompileResult<Value> {
        if value.is_null() {
            return Err(CompileError::invalid_filter_value(
                self.token(),
                "a non-null value",
                &value,
            ));
        }
        self.scalar(attr, value, coerce)
    }

    /// A scalar, converted to the attribute type when `coerce` is set.
    ///
    /// Int columns also take floats; they compare numerically.
    fn scalar(&self, attr: &AttributeRef, value: Value, coerce: bool) -> CompileResult<Value> {
        if value.is_list() {
            return Err(CompileError::invalid_filter_value(
                self.token(),
                "a single value",
                &value,
            ));
        }
        if !coerce {
            return Ok(value);
        }
        let converted = value.coerce_to(attr.value_type).or_else(|| match attr.value_type {
            ValueType::Int => value.coerce_to(ValueType::Float),
            _ => None,
        });
        converted.ok_or_else(|| {
            CompileError::invalid_filter_value(
                self.token(),
                format!("a value of type {}", attr.value_type),
                &value,
            )
        })
    }

    /// The textual form of a value for pattern operators.
    ///
    /// Numbers are written out when `coerce` is set; booleans have no
    /// single spelling and are rejected.
    fn text(&self, value: &Value, coerce: bool) -> CompileResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Int(_) | Value::Float(_) if coerce => Ok(value.to_string()),
            other => Err(CompileError::invalid_filter_value(
                self.token(),
                "a string",
                other,
            )),
        }
    }
}

/// Maps operator tokens to operator kinds.
///
/// The standard registry holds every built-in token. Registries are
/// composed by adding aliases or removing tokens, never mutated in place
/// once handed to a compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRegistry {
    tokens: BTreeMap<String, Operator>,
}

impl OperatorRegistry {
    /// A registry with no operators.
    pub fn empty() -> Self {
        Self {
            tokens: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in operator under its canonical token.
    pub fn standard() -> Self {
        let tokens = Operator::ALL
            .into_iter()
            .map(|op| (op.token().to_string(), op))
            .collect();
        Self { tokens }
    }

    /// Build the registry described by a configuration.
    pub fn from_config(config: &CompilerConfig) -> CompileResult<Self> {
        let mut registry = Self::standard();
        for (alias, target) in &config.operator_aliases {
            let op = Operator::from_token(target).ok_or_else(|| {
                CompileError::config(format!(
                    "alias '{}' targets unknown operator '{}'",
                    alias, target
                ))
            })?;
            registry = registry.with_alias(alias.as_str(), op);
        }
        for token in &config.disabled_operators {
            registry = registry.without(token);
        }
        Ok(registry)
    }

    /// The registry with `token` selecting `op`.
    pub fn with_alias(mut self, token: impl Into<String>, op: Operator) -> Self {
        self.tokens.insert(token.into(), op);
        self
    }

    /// The registry without `token`.
    pub fn without(mut self, token: &str) -> Self {
        self.tokens.remove(token);
        self
    }

    pub fn lookup(&self, token: &str) -> Option<Operator> {
        self.tokens.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Registered tokens in sorted order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
