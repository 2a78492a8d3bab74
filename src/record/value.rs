//! Scalar values held by records

use std::cmp::Ordering;
use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Coarse kind of a scalar, used for type checks and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    String,
    Number,
    Bool,
    List,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Bool => "bool",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed cell value
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Field known, value absent in source
    Null,
    /// UTF-8 text
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float (produced by aggregations such as average)
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// List of strings (e.g. topic tags)
    List(Vec<String>),
}

impl Scalar {
    /// Convenience constructor for string values
    pub fn str(value: impl Into<String>) -> Self {
        Scalar::Str(value.into())
    }

    /// Convenience constructor for list values
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scalar::List(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Null => ValueKind::Null,
            Scalar::Str(_) => ValueKind::String,
            Scalar::Int(_) | Scalar::Float(_) => ValueKind::Number,
            Scalar::Bool(_) => ValueKind::Bool,
            Scalar::List(_) => ValueKind::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value (integers widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Scalar::List(items) => Some(items),
            _ => None,
        }
    }

    /// Natural ordering of two values of the same kind.
    ///
    /// Returns `None` when either side is null or the kinds differ.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
            (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
            (Scalar::List(a), Scalar::List(b)) => Some(a.cmp(b)),
            (a, b) if a.kind() == ValueKind::Number && b.kind() == ValueKind::Number => {
                let a_f = a.as_f64()?;
                let b_f = b.as_f64()?;
                Some(a_f.total_cmp(&b_f))
            }
            _ => None,
        }
    }

    /// Renders the value as a delimited-text cell.
    ///
    /// Null renders as an empty cell, lists are comma-joined.
    pub fn render(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Str(s) => s.clone(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::List(items) => items.join(","),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::List(a), Scalar::List(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (a, b) if a.kind() == ValueKind::Number && b.kind() == ValueKind::Number => {
                a.as_f64() == b.as_f64()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Str(s) => write!(f, "{:?}", s),
            Scalar::List(items) => write!(f, "{:?}", items),
            other => f.write_str(&other.render()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Str(s) => serializer.serialize_str(s),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Null)
    }
}

impl From<&serde_json::Value> for Scalar {
    /// Maps a JSON literal onto a scalar. Arrays keep only their string
    /// elements; objects have no scalar form and map to null.
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null | Value::Object(_) => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map(Scalar::Float).unwrap_or(Scalar::Null),
            },
            Value::String(s) => Scalar::Str(s.clone()),
            Value::Array(items) => Scalar::List(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
        }
    }
}
