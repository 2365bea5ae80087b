//! Submitted field values
//!
//! A form field arrives either as a single string or, for multi-select
//! inputs, as an ordered list of strings. The distinction is resolved once
//! here, when the JSON body is converted, so nothing downstream inspects
//! JSON types.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw submission: field identifier to submitted value, arbitrary keys allowed
pub type RawSubmission = BTreeMap<String, FieldValue>;

/// A single submitted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Multi(Vec<String>),
}

impl FieldValue {
    /// Convert an arbitrary JSON value. Never fails: `null` becomes an
    /// empty scalar, numbers and booleans are stringified, objects are kept
    /// as compact JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::Multi(items.into_iter().map(json_to_text).collect()),
            other => FieldValue::Scalar(json_to_text(other)),
        }
    }

    /// Flatten to one string; multi values are joined with `"; "` in order
    pub fn flatten(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::Multi(items) => items.join("; "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Multi(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::Multi(items.into_iter().map(str::to_string).collect())
    }
}

fn json_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Build a raw submission from a parsed JSON object
pub fn submission_from_json(object: Map<String, Value>) -> RawSubmission {
    object
        .into_iter()
        .map(|(key, value)| (key, FieldValue::from_json(value)))
        .collect()
}
