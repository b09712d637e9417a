//! User record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record.
///
/// Only `id` is interpreted. Every other member of the JSON object is kept
/// as-is and echoed back on reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, used as the store key.
    #[serde(default)]
    pub id: String,
    /// Remaining fields (name, email, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    /// Create a user with the given id and no extra fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style helper to attach a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether the record carries a usable identifier.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}
