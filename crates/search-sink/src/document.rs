//! Search-index write request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use river_core::{RowValue, DATETIME_FORMAT};
use serde_json::{Map, Number, Value};

/// Bulk action for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocAction {
    /// Create or replace the whole document.
    Index,
    /// Merge a partial document into an existing one.
    Update,
    Delete,
}

impl DocAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One document operation keyed by index and id.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRequest {
    pub action: DocAction,
    pub index: String,
    pub id: String,
    /// Document body; `None` for deletes.
    pub doc: Option<Map<String, Value>>,
}

impl DocumentRequest {
    pub fn index(index: impl Into<String>, id: String, doc: Map<String, Value>) -> Self {
        Self {
            action: DocAction::Index,
            index: index.into(),
            id,
            doc: Some(doc),
        }
    }

    pub fn update(index: impl Into<String>, id: String, doc: Map<String, Value>) -> Self {
        Self {
            action: DocAction::Update,
            index: index.into(),
            id,
            doc: Some(doc),
        }
    }

    pub fn delete(index: impl Into<String>, id: String) -> Self {
        Self {
            action: DocAction::Delete,
            index: index.into(),
            id,
            doc: None,
        }
    }
}

/// Render a row value as a JSON document field.
pub fn to_json(value: &RowValue) -> Value {
    match value {
        RowValue::Null => Value::Null,
        RowValue::Int(i) => Value::from(*i),
        RowValue::UInt(u) => Value::from(*u),
        RowValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        RowValue::Text(s) => Value::String(s.clone()),
        RowValue::Bytes(b) => Value::String(BASE64.encode(b)),
        RowValue::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
    }
}
