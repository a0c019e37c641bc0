//! Typed values bound to statement parameters and decoded from result columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Core value types for SQLite operations.
///
/// `Null`, `Boolean`, `Integer`, `Real` and `Text` are the kinds the data
/// access layer binds and decodes. `Blob` can be carried by callers but is
/// rejected at bind time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// Discriminant of a [`Value`], used to pick the bind and decode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Real,
    Text,
    Blob,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
            Value::Blob(_) => ValueKind::Blob,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Failed conversion out of a [`Value`]: the kind that was found instead.
#[derive(Debug, Clone, PartialEq)]
pub struct KindMismatch {
    pub expected: &'static str,
    pub found: ValueKind,
}

impl fmt::Display for KindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl TryFrom<Value> for bool {
    type Error = KindMismatch;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Boolean(b) => Ok(b),
            Value::Integer(i) => Ok(i != 0),
            other => Err(KindMismatch {
                expected: "boolean",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = KindMismatch;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Integer(i) => Ok(i),
            Value::Boolean(b) => Ok(i64::from(b)),
            other => Err(KindMismatch {
                expected: "integer",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = KindMismatch;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        let found = v.kind();
        let wide = i64::try_from(v)?;
        i32::try_from(wide).map_err(|_| KindMismatch {
            expected: "32-bit integer",
            found,
        })
    }
}

impl TryFrom<Value> for f64 {
    type Error = KindMismatch;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Real(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            other => Err(KindMismatch {
                expected: "real",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = KindMismatch;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Text(s) => Ok(s),
            other => Err(KindMismatch {
                expected: "text",
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_into_booleans_and_reals() {
        assert!(bool::try_from(Value::Integer(1)).unwrap());
        assert!(!bool::try_from(Value::Integer(0)).unwrap());
        assert_eq!(f64::try_from(Value::Integer(3)).unwrap(), 3.0);
    }

    #[test]
    fn text_does_not_coerce_to_integer() {
        let err = i64::try_from(Value::from("12")).unwrap_err();
        assert_eq!(err.found, ValueKind::Text);
    }

    #[test]
    fn options_map_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn i32_rejects_out_of_range() {
        assert!(i32::try_from(Value::Integer(i64::MAX)).is_err());
    }
}
