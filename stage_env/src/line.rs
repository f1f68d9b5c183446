//! The `Line` type: one step of scenario data.

use crate::ActorError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named values describing one scenario step.
///
/// Keys are kept in sorted order so a `Line` always serializes the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(Map<String, Value>);

impl Line {
    /// Creates an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn require(&self, key: &str) -> Result<&Value, ActorError> {
        self.0
            .get(key)
            .ok_or_else(|| ActorError::MissingField(key.to_string()))
    }

    /// Reads a numeric field as `f64`.
    pub fn get_f64(&self, key: &str) -> Result<f64, ActorError> {
        self.require(key)?
            .as_f64()
            .ok_or_else(|| ActorError::field_type(key, "number"))
    }

    /// Reads a non-negative integer field.
    pub fn get_u64(&self, key: &str) -> Result<u64, ActorError> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| ActorError::field_type(key, "unsigned integer"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Line {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_typed_getters() {
        let line = Line::new()
            .with("mu", 0.8)
            .with("counter", 10u64)
            .with("offset", -3i64)
            .with("label", "abrupt");

        assert_eq!(line.get_f64("mu").unwrap(), 0.8);
        assert_eq!(line.get_u64("counter").unwrap(), 10);
        assert_eq!(line.get("offset").and_then(Value::as_i64), Some(-3));
        assert_eq!(line.get("label").and_then(Value::as_str), Some("abrupt"));
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn test_line_integers_read_as_f64() {
        let line = Line::new().with("n", 7u64);
        assert_eq!(line.get_f64("n").unwrap(), 7.0);
    }

    #[test]
    fn test_line_missing_field() {
        let line = Line::new();
        let err = line.get_f64("x").unwrap_err();
        assert!(matches!(err, ActorError::MissingField(ref k) if k == "x"));
        assert!(line.is_empty());
    }

    #[test]
    fn test_line_wrong_type() {
        let line = Line::new().with("x", "not a number");
        let err = line.get_f64("x").unwrap_err();
        assert!(matches!(err, ActorError::FieldType { expected: "number", .. }));
        assert_eq!(err.to_string(), "field `x` is not a number");
    }

    #[test]
    fn test_line_keys_sorted() {
        let line: Line = vec![("x", 1u64), ("mu", 2u64), ("a", 3u64)]
            .into_iter()
            .collect();
        let keys: Vec<&str> = line.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "mu", "x"]);

        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"a":3,"mu":2,"x":1}"#);
    }
}
