// Canonical telemetry record - normalized snapshot of one fetch
use serde::Serialize;
use std::collections::HashMap;

/// A resolved scalar value. Canonical records never hold nested structures;
/// anything that did not resolve to a scalar is recorded as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Schema-shaped result of normalizing one raw payload: exactly one entry
/// per metric key, each either a resolved scalar or absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanonicalRecord {
    entries: HashMap<String, Option<MetricValue>>,
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Option<MetricValue>) {
        self.entries.insert(key.to_string(), value);
    }

    /// The resolved value for a metric, or `None` if it is absent or the
    /// key is not part of the schema.
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries.get(key).and_then(|v| v.as_ref())
    }

    /// Whether the key exists in the record at all (present or absent).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetricValue::as_f64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&MetricValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
