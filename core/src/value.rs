//! Value types for DJQ attributes and filter arguments.
//!
//! Values are the atomic data stored in row attributes and supplied to
//! lookups. DJQ supports scalar types (Bool, Int, Float, String, Timestamp,
//! Date) and lists (used by `in` and `range` lookups).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;

/// A value that can be stored in an attribute or passed to a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Timestamp as milliseconds since Unix epoch (UTC).
    Timestamp(i64),
    /// Calendar date.
    Date(NaiveDate),
    /// List of values.
    List(Vec<Value>),
}

/// The declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    Timestamp,
    Date,
}

impl ValueType {
    /// Returns the canonical name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "Bool",
            ValueType::Int => "Int",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Timestamp => "Timestamp",
            ValueType::Date => "Date",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a list value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float or Int value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the calendar date of a Date or Timestamp value.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Timestamp(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
            _ => None,
        }
    }

    /// Extract (year, month, day) from a Date or Timestamp value.
    pub fn date_parts(&self) -> Option<(i32, u32, u32)> {
        self.calendar_date()
            .map(|d| (d.year(), d.month(), d.day()))
    }

    /// Compare two values the way a relational engine would.
    ///
    /// Returns `None` when either side is null or the types are not
    /// comparable. Int and Float compare numerically.
    pub fn sql_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Compare values for sorting. Null is treated as less than any other value.
    /// Values of different types return Equal (stable sort behavior).
    pub fn cmp_sortable(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            _ => self.sql_cmp(other).unwrap_or(Ordering::Equal),
        }
    }

    /// Convert this value to the given attribute type.
    ///
    /// Strings are parsed; Int widens to Float and Timestamp. Null and values
    /// already of the target type pass through. Returns `None` when the
    /// conversion is not possible.
    pub fn coerce_to(&self, target: ValueType) -> Option<Value> {
        match (self, target) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Bool(_), ValueType::Bool)
            | (Value::Int(_), ValueType::Int)
            | (Value::Float(_), ValueType::Float)
            | (Value::String(_), ValueType::String)
            | (Value::Timestamp(_), ValueType::Timestamp)
            | (Value::Date(_), ValueType::Date) => Some(self.clone()),
            (Value::Int(i), ValueType::Float) => Some(Value::Float(*i as f64)),
            (Value::Int(i), ValueType::Timestamp) => Some(Value::Timestamp(*i)),
            (Value::String(s), ty) => parse_typed(s.trim(), ty),
            _ => None,
        }
    }
}

fn parse_typed(s: &str, ty: ValueType) -> Option<Value> {
    match ty {
        ValueType::Bool => match s {
            "true" | "True" | "1" => Some(Value::Bool(true)),
            "false" | "False" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        ValueType::Int => s.parse().ok().map(Value::Int),
        ValueType::Float => s.parse().ok().map(Value::Float),
        ValueType::String => Some(Value::String(s.to_string())),
        ValueType::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date),
        ValueType::Timestamp => {
            if let Ok(ms) = s.parse::<i64>() {
                return Some(Value::Timestamp(ms));
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(Value::Timestamp(dt.timestamp_millis()));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| Value::Timestamp(dt.and_utc().timestamp_millis()))
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Timestamp(t) => write!(f, "ts:{}", t),
            Value::Date(d) => write!(f, "{}", d),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::List(vec![a.into(), b.into()])
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Type alias for attribute storage.
pub type Attributes = std::collections::HashMap<String, Value>;

/// Helper macro to create attribute maps.
#[macro_export]
macro_rules! attrs {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = std::collections::HashMap::new();
            $(
                map.insert($key.to_string(), $crate::Value::from($value));
            )+
            map
        }
    };
}
