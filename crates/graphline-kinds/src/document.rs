//! Projected documents and projection outcomes

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Field holding the domain identifier
pub const DCO_ID_FIELD: &str = "dcoId";

/// Ordered JSON object built up field by field.
///
/// Field order is insertion order, so serialized documents diff cleanly
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Start a document with its required head: `uri`, the label, and `dcoId`
    /// (null when the entity has none).
    pub fn new(uri: &str, label_field: &str, label: String, dco_id: Option<String>) -> Self {
        let mut doc = Self::default();
        doc.insert("uri", uri);
        doc.insert(label_field, label);
        doc.insert(DCO_ID_FIELD, dco_id.map_or(Value::Null, Value::String));
        doc
    }

    /// Set `key`, replacing any previous value
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Set `key` only when a value resolved
    pub fn insert_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    /// Set `key` to an array only when `values` is non-empty
    pub fn insert_list<V: Into<Value>>(&mut self, key: &str, values: Vec<V>) {
        if !values.is_empty() {
            self.insert(key, Value::Array(values.into_iter().map(Into::into).collect()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn uri(&self) -> Option<&str> {
        self.get("uri").and_then(Value::as_str)
    }

    /// Domain identifier, if the entity has one
    pub fn dco_id(&self) -> Option<&str> {
        self.get(DCO_ID_FIELD).and_then(Value::as_str)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Compact single-line JSON, suitable for one bulk line
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

/// Why an entity produced no document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No display label (`title`/`name`) in the described graph
    MissingLabel,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLabel => write!(f, "missing label"),
        }
    }
}

/// Result of projecting one entity
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Document(Document),
    Skipped(SkipReason),
}

impl Projection {
    pub fn document(self) -> Option<Document> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}
