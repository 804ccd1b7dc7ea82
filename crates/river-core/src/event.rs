//! Decoded row-change events and the builder seam that translates them.

use crate::error::BuildError;
use crate::rule::Rule;
use crate::values::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of row mutation carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(BuildError::InvalidAction(s.to_string())),
        }
    }
}

/// One decoded binlog rows event.
///
/// For [`Action::Update`] the rows are consecutive (old, new) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChangeEvent {
    pub schema: String,
    pub table: String,
    pub action: Action,
    pub rows: Vec<Row>,
}

impl RowChangeEvent {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        action: Action,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            action,
            rows,
        }
    }
}

/// Translates one event's rows into sink-specific write requests.
///
/// Implementations are pure: the same rule and rows always produce the same
/// requests, and a failure never yields a partial batch.
pub trait RequestBuilder: Send + Sync {
    type Request: Send + 'static;

    fn build(
        &self,
        rule: &Rule,
        action: Action,
        rows: &[Row],
    ) -> Result<Vec<Self::Request>, BuildError>;
}

/// Check that every row lines up with the rule's column list.
pub fn check_row_lengths(rule: &Rule, rows: &[Row]) -> Result<(), BuildError> {
    let expected = rule.table_info.columns.len();
    match rows.iter().find(|r| r.len() != expected) {
        Some(row) => Err(BuildError::RowLength {
            table: rule.table.clone(),
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}

/// Check that update rows come in (old, new) pairs.
pub fn check_update_pairs(rows: &[Row]) -> Result<(), BuildError> {
    if rows.len() % 2 == 1 {
        return Err(BuildError::MalformedEvent { rows: rows.len() });
    }
    Ok(())
}
