//! Dynamically typed records.
//!
//! A [`Record`] maps field names to [`Value`]s. Nothing guarantees that a field
//! is present or has a particular type, so every filter checks the variant of
//! the value it reads before comparing.
//!
//! Records keep their fields in load order and numbers keep their original
//! YAML representation, so a record writes back out the way it was read.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Number, Value as YamlValue};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    /// Compared as `f64`; serialized as the original integer or float.
    Number(Number),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Null,
    /// Sequences, nested mappings and tagged YAML nodes. Never matched by a
    /// leaf filter, but kept so the record can be written back out intact.
    Other(YamlValue),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<YamlValue> for Value {
    fn from(v: YamlValue) -> Self {
        match v {
            YamlValue::String(s) => Value::String(s),
            YamlValue::Number(n) => Value::Number(n),
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Null => Value::Null,
            other => Value::Other(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the field is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Fields in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a record from a YAML mapping. Returns `None` for any other node.
    /// Non-string keys are rendered with their scalar text; keys that have no
    /// scalar form are dropped.
    pub fn from_yaml(v: YamlValue) -> Option<Self> {
        let YamlValue::Mapping(mapping) = v else {
            return None;
        };

        let mut record = Record::new();
        for (key, value) in mapping {
            let key = match key {
                YamlValue::String(s) => s,
                YamlValue::Number(n) => n.to_string(),
                YamlValue::Bool(b) => b.to_string(),
                _ => continue,
            };
            record.fields.insert(key, Value::from(value));
        }
        Some(record)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
