//! Values resolved from subject records

use chrono::{DateTime, Utc};
use std::fmt;

/// A typed attribute value read from an item, address, customer or cart
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Instant(DateTime<Utc>),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// True when the value is absent or equal to its type's zero value
    pub fn is_zero(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Bool(b) => !b,
            AttributeValue::Integer(i) => *i == 0,
            AttributeValue::Float(f) => *f == 0.0,
            AttributeValue::String(s) => s.is_empty(),
            AttributeValue::Instant(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            AttributeValue::List(list) => list.is_empty(),
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Float(_) => "float",
            AttributeValue::String(_) => "string",
            AttributeValue::Instant(_) => "instant",
            AttributeValue::List(_) => "list",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Instant(t) => write!(f, "{}", t.to_rfc3339()),
            AttributeValue::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<Option<DateTime<Utc>>> for AttributeValue {
    fn from(t: Option<DateTime<Utc>>) -> Self {
        t.map_or(AttributeValue::Null, AttributeValue::Instant)
    }
}

impl From<&[String]> for AttributeValue {
    fn from(list: &[String]) -> Self {
        AttributeValue::List(list.iter().map(|s| s.as_str().into()).collect())
    }
}

/// Free-form attribute maps hold raw JSON values
impl From<&serde_json::Value> for AttributeValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => AttributeValue::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(AttributeValue::Integer)
                .or_else(|| n.as_f64().map(AttributeValue::Float))
                .unwrap_or(AttributeValue::Null),
            Value::String(s) => AttributeValue::String(s.clone()),
            Value::Array(arr) => AttributeValue::List(arr.iter().map(Self::from).collect()),
            Value::Object(_) => AttributeValue::String(value.to_string()),
        }
    }
}
