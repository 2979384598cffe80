//! Records and queries exchanged with a record store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named field values of one record.
pub type Fields = serde_json::Map<String, Value>;

/// A record of a named collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier, unique within its collection.
    pub id: String,
    /// Field values keyed by field name.
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Creates a record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    /// Sets a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Field name to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// Options for reading a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Sort keys, most significant first. Empty = store order.
    pub sorts: Vec<Sort>,
}

impl Query {
    /// Reads every record in store order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an ascending sort key.
    pub fn sorted_by(mut self, field: impl Into<String>) -> Self {
        self.sorts.push(Sort {
            field: field.into(),
            direction: Direction::Asc,
        });
        self
    }

    /// Adds a descending sort key.
    pub fn sorted_by_desc(mut self, field: impl Into<String>) -> Self {
        self.sorts.push(Sort {
            field: field.into(),
            direction: Direction::Desc,
        });
        self
    }
}
