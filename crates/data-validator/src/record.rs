//! Raw and Canonical Input Records

use artifact_store::{Column, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Input record as received from the outside: field name to JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Typed value of one feature column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null or empty input
    Null,
    /// Text as supplied
    Text(String),
    /// Numeric value
    Number(f64),
    /// Label-encoded category
    Code(usize),
}

impl FieldValue {
    /// Convert a raw JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::String(s) if s.is_empty() => FieldValue::Null,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Bool(b) => FieldValue::Number(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(n.to_string())),
            other => FieldValue::Text(other.to_string()),
        }
    }

    /// String form used for category lookup; `None` for null
    pub fn as_category(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Code(c) => Some(Cow::Owned(c.to_string())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Exactly one value per schema column, indexed by [`Column`]
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    values: [FieldValue; FEATURE_COUNT],
}

impl CanonicalRecord {
    /// Record with every column null
    pub fn empty() -> Self {
        Self {
            values: std::array::from_fn(|_| FieldValue::Null),
        }
    }

    pub fn get(&self, column: Column) -> &FieldValue {
        &self.values[column.index()]
    }

    pub fn set(&mut self, column: Column, value: impl Into<FieldValue>) {
        self.values[column.index()] = value.into();
    }

    /// Builder-style set
    pub fn with(mut self, column: Column, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Columns and values in model order
    pub fn iter(&self) -> impl Iterator<Item = (Column, &FieldValue)> {
        Column::ALL.into_iter().zip(self.values.iter())
    }
}
