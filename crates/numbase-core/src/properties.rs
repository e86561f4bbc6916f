//! Rows: the records a host pipeline hands to a processor.
//!
//! A row is a flat, ordered map from column name to value. Values are
//! JSON-like so rows read from CSV (all strings) and NDJSON (typed) share
//! one shape. Numbers keep their literal text, so a value read from JSON
//! is written back and converted exactly as it was spelled.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Arrays and objects, carried through untouched.
    Nested(serde_json::Value),
}

impl Value {
    /// The textual form a processor sees for this field.
    ///
    /// Numbers are rendered as written in the source document (`10.0` stays
    /// `10.0`); booleans with their display form. `Null` and nested values
    /// have no text.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null | Value::Nested(_) => None,
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            nested => Value::Nested(nested),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One record of a row-oriented pipeline.
pub type Row = IndexMap<String, Value>;

/// Extension trait for building and reading rows ergonomically.
pub trait RowExt {
    fn with(self, column: impl Into<String>, value: impl Into<Value>) -> Self;

    /// Textual form of a column, `None` when the column is missing or null.
    fn text(&self, column: &str) -> Option<Cow<'_, str>>;
}

impl RowExt for Row {
    fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column.into(), value.into());
        self
    }

    fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.get(column).and_then(Value::as_text)
    }
}
