//! Value equality & size estimator (spec §4.1, component C1).
//!
//! A format-neutral algebraic value, mirroring the JSON-equivalent shapes
//! the plan document and its shadow trees are built from. Numeric subtype
//! (integer vs. floating point) is preserved across the tree so equality
//! never widens `1` into `1.0`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `untagged` so this serializes/deserializes as plain JSON (`5`, `"x"`,
/// `[...]`, `{...}`) rather than the derive's default `{"Int": 5}` shape —
/// this is what lets `ResourceChange`/`PropertyChange`/`PlanSummary` (which
/// embed `Value`) round-trip as ordinary JSON documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_empty_string(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    // Lossy only for values outside i64 range; rare in practice.
                    Value::Int(u as i64)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => Value::List(arr.iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Map(obj.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(l) => serde_json::Value::Array(l.iter().map(serde_json::Value::from).collect()),
            Value::Map(m) => serde_json::Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Structural equality per spec §4.1. Map key order is irrelevant; list
/// order matters; numeric subtype is never coerced for comparison.
pub fn eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| eq(a, b))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| eq(v, w)))
        }
        _ => false,
    }
}

/// Advisory byte-size estimate (spec §4.1), used only to drive the budget.
pub fn sizeof(v: &Value) -> usize {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 8,
        Value::String(s) => s.len(),
        Value::List(l) => l.iter().map(sizeof).sum(),
        Value::Map(m) => m.iter().map(|(k, v)| k.len() + sizeof(v)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_and_float_are_not_equal() {
        let a = Value::from(&json!(1));
        let b = Value::from(&json!(1.0));
        assert!(!eq(&a, &b));
    }

    #[test]
    fn map_equality_ignores_key_order() {
        let a = Value::from(&json!({"a": 1, "b": 2}));
        let b = Value::from(&json!({"b": 2, "a": 1}));
        assert!(eq(&a, &b));
    }

    #[test]
    fn list_equality_is_order_sensitive() {
        let a = Value::from(&json!([1, 2]));
        let b = Value::from(&json!([2, 1]));
        assert!(!eq(&a, &b));
    }

    #[test]
    fn null_vs_non_null() {
        assert!(!eq(&Value::Null, &Value::Bool(false)));
    }

    #[test]
    fn sizeof_string_is_byte_length() {
        let v = Value::from(&json!("hello"));
        assert_eq!(sizeof(&v), 5);
    }

    #[test]
    fn sizeof_map_includes_key_lengths() {
        let v = Value::from(&json!({"ab": "cd"}));
        assert_eq!(sizeof(&v), 2 + 2);
    }

    #[test]
    fn serializes_as_plain_untagged_json() {
        let v = Value::from(&json!({"a": 1, "b": [true, "x", null]}));
        let serialized = serde_json::to_value(&v).unwrap();
        assert_eq!(serialized, json!({"a": 1, "b": [true, "x", null]}));
    }

    #[test]
    fn round_trips_through_serde_json() {
        let v = Value::from(&json!({"id": 1, "tags": ["a", "b"], "size": 1.5}));
        let bytes = serde_json::to_vec(&v).unwrap();
        let back: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(eq(&v, &back));
    }
}
