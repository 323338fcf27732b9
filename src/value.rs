//! Normalized filter values.
//!
//! [`extract`] turns a [`Reflected`] field into one of the fixed set of
//! [`Value`] variants that operators know how to bind.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{FilterError, FilterResult};
use crate::reflect::Reflected;

/// Semantic kind of a field, used by operator type assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No value (an unset optional, or a field that is never read).
    Invalid,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Timestamp,
    Slice,
    Array,
    Struct,
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Timestamp => "timestamp",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Struct => "struct",
            Kind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A bound argument, or the normalized value of a clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Unset. A clause holding `Null` is skipped when rendering.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
    TextList(Vec<String>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::TextList(items) => {
                let quoted: Vec<String> = items.iter().map(|s| format!("'{}'", s)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

/// Normalize a reflected field value.
///
/// Integers, floats, strings, booleans and timestamps map onto their
/// variant. Sequences become a [`Value::TextList`] of each element's string
/// form. Records and opaque shapes are rejected.
pub fn extract(value: &Reflected) -> FilterResult<Value> {
    match value {
        Reflected::Absent => Ok(Value::Null),
        Reflected::Bool(b) => Ok(Value::Bool(*b)),
        Reflected::Int(n) => Ok(Value::Int(*n)),
        Reflected::Uint(n) => Ok(Value::Uint(*n)),
        Reflected::Float(n) => Ok(Value::Float(*n)),
        Reflected::String(s) => Ok(Value::Text(s.clone())),
        Reflected::Timestamp(t) => Ok(Value::Timestamp(*t)),
        Reflected::Slice(items) | Reflected::Array(items) => {
            Ok(Value::TextList(items.iter().map(Reflected::to_text).collect()))
        }
        other => Err(FilterError::UnsupportedType(other.kind())),
    }
}

// Conversions for building expected argument lists and custom operators.
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Field, Reflect};

    #[test]
    fn test_extract_scalars() {
        assert_eq!(extract(&42i32.reflect()).unwrap(), Value::Int(42));
        assert_eq!(extract(&42u8.reflect()).unwrap(), Value::Uint(42));
        assert_eq!(extract(&"bobby".reflect()).unwrap(), Value::Text("bobby".into()));
        assert_eq!(extract(&true.reflect()).unwrap(), Value::Bool(true));
        assert_eq!(extract(&0.5f64.reflect()).unwrap(), Value::Float(0.5));
    }

    #[test]
    fn test_extract_absent() {
        let none: Option<String> = None;
        assert!(extract(&none.reflect()).unwrap().is_null());
    }

    #[test]
    fn test_extract_timestamp() {
        let now = Utc::now();
        assert_eq!(extract(&Some(now).reflect()).unwrap(), Value::Timestamp(now));
    }

    #[test]
    fn test_extract_sequence_as_text() {
        let v = extract(&vec![1i32, 2, 3].reflect()).unwrap();
        assert_eq!(
            v,
            Value::TextList(vec!["1".into(), "2".into(), "3".into()])
        );

        let empty: Vec<String> = Vec::new();
        assert_eq!(extract(&empty.reflect()).unwrap(), Value::TextList(vec![]));
    }

    #[test]
    fn test_extract_rejects_records() {
        let nested = Reflected::Record(vec![Field::new("x", Reflected::Int(1))]);
        let err = extract(&nested).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type: struct");
    }

    #[test]
    fn test_extract_rejects_maps() {
        let m = std::collections::HashMap::<String, String>::new();
        let err = extract(&m.reflect()).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedType(Kind::Map)));
    }

    #[test]
    fn test_value_serializes_plainly() {
        let args = vec![Value::from("yellow"), Value::from(3i32), Value::Null];
        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"["yellow",3,null]"#
        );
    }
}
