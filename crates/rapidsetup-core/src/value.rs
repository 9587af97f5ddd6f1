//! Attribute values carried by identity snapshots.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to another identity (e.g. a manager).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityRef {
    pub id: String,
    pub name: String,
}

impl IdentityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A value stored under an identity attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// No value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Timestamp without zone, as identity dates are stored.
    Date(NaiveDateTime),
    Identity(IdentityRef),
    /// Multi-valued attribute.
    List(Vec<AttributeValue>),
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttributeValue::Null, AttributeValue::Null) => true,
            (AttributeValue::Bool(a), AttributeValue::Bool(b)) => a == b,
            (AttributeValue::Int(a), AttributeValue::Int(b)) => a == b,
            (AttributeValue::Float(a), AttributeValue::Float(b)) => {
                (a - b).abs() < f64::EPSILON || (a.is_nan() && b.is_nan())
            }
            (AttributeValue::Int(a), AttributeValue::Float(b))
            | (AttributeValue::Float(b), AttributeValue::Int(a)) => {
                (*a as f64 - b).abs() < f64::EPSILON
            }
            (AttributeValue::String(a), AttributeValue::String(b)) => a == b,
            (AttributeValue::Date(a), AttributeValue::Date(b)) => a == b,
            (AttributeValue::Identity(a), AttributeValue::Identity(b)) => a.id == b.id,
            (AttributeValue::List(a), AttributeValue::List(b)) => {
                // Multi-valued attributes compare as sets
                if a.len() != b.len() {
                    return false;
                }
                a.iter().all(|item| b.contains(item)) && b.iter().all(|item| a.contains(item))
            }
            _ => false,
        }
    }
}

impl AttributeValue {
    /// Returns true if this value is Null.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Maps empty strings and empty lists to Null so that "unset" compares equal
    /// regardless of how the source system represents it.
    pub fn normalized(&self) -> AttributeValue {
        match self {
            AttributeValue::String(s) if s.is_empty() => AttributeValue::Null,
            AttributeValue::List(items) if items.is_empty() => AttributeValue::Null,
            AttributeValue::List(items) => {
                AttributeValue::List(items.iter().map(AttributeValue::normalized).collect())
            }
            other => other.clone(),
        }
    }

    /// Attempts to extract a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean truthiness.
    ///
    /// Strings `true`, `yes`, `y`, `1` and `on` (any case) and non-zero numbers
    /// are true; everything else, Null included, is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Bool(b) => *b,
            AttributeValue::Int(n) => *n != 0,
            AttributeValue::Float(n) => *n != 0.0,
            AttributeValue::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1" | "on"
            ),
            _ => false,
        }
    }

    /// Renders scalar values as text for string comparisons.
    pub fn to_text(&self) -> Option<String> {
        match self {
            AttributeValue::Null | AttributeValue::List(_) => None,
            AttributeValue::Bool(b) => Some(b.to_string()),
            AttributeValue::Int(n) => Some(n.to_string()),
            AttributeValue::Float(n) => Some(n.to_string()),
            AttributeValue::String(s) => Some(s.clone()),
            AttributeValue::Date(d) => Some(d.to_string()),
            AttributeValue::Identity(r) => Some(r.name.clone()),
        }
    }
}

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => AttributeValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => n
                    .as_f64()
                    .map(AttributeValue::Float)
                    .unwrap_or(AttributeValue::Null),
            },
            Value::String(s) => AttributeValue::String(s.clone()),
            Value::Array(items) => {
                AttributeValue::List(items.iter().map(AttributeValue::from).collect())
            }
            Value::Object(map) => {
                let id = map.get("id").and_then(Value::as_str);
                let name = map.get("name").and_then(Value::as_str);
                match (id, name) {
                    (Some(id), name) => {
                        AttributeValue::Identity(IdentityRef::new(id, name.unwrap_or(id)))
                    }
                    (None, Some(name)) => AttributeValue::Identity(IdentityRef::new(name, name)),
                    (None, None) => AttributeValue::Null,
                }
            }
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        AttributeValue::from(&value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<NaiveDateTime> for AttributeValue {
    fn from(value: NaiveDateTime) -> Self {
        AttributeValue::Date(value)
    }
}

impl From<IdentityRef> for AttributeValue {
    fn from(value: IdentityRef) -> Self {
        AttributeValue::Identity(value)
    }
}
