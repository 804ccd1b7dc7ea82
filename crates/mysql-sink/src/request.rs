//! Relational write request.

use river_core::{Action, RowValue};
use std::sync::Arc;

/// One prepared-statement execution against the target database.
///
/// `query` is shared by every request built from the same event, so
/// requests of the same shape can be grouped by cheap comparison and
/// applied through a single prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRequest {
    pub action: Action,
    /// Target table name.
    pub table: String,
    /// Statement text with `?` placeholders.
    pub query: Arc<str>,
    /// Positional bind values, one per placeholder.
    pub values: Vec<RowValue>,
}

impl SqlRequest {
    pub fn new(action: Action, table: impl Into<String>, query: Arc<str>, values: Vec<RowValue>) -> Self {
        Self {
            action,
            table: table.into(),
            query,
            values,
        }
    }
}
