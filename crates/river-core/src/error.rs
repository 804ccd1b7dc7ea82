//! Error types for rule loading and request building.

use thiserror::Error;

/// Errors raised while translating one row-change event into requests.
///
/// Every variant is fatal to the event. The event handler escalates them to
/// pipeline cancellation because skipping the change would leave the target
/// permanently out of step with the source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The column allow-list excluded every column of the table.
    #[error("no columns found for table '{table}'")]
    NoColumns { table: String },

    /// Update/delete translation needs a primary key to locate the row.
    #[error("no primary key found for table '{table}'")]
    NoPrimaryKey { table: String },

    /// Update events carry (old, new) pairs, so the row count must be even.
    #[error("invalid update rows event, must have 2x rows, but {rows}")]
    MalformedEvent { rows: usize },

    /// A row does not line up with the rule's column list.
    #[error("row has {actual} values but table '{table}' has {expected} columns")]
    RowLength {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// The action tag is not one of insert/update/delete.
    #[error("invalid rows action {0}")]
    InvalidAction(String),
}

/// Errors raised while constructing a [`crate::Rule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule for {schema}.{table} has no columns")]
    EmptyColumns { schema: String, table: String },

    #[error("rule for {schema}.{table} lists column '{column}' twice")]
    DuplicateColumn {
        schema: String,
        table: String,
        column: String,
    },

    #[error("rule for {schema}.{table}: primary key position {position} is out of range")]
    PrimaryKeyOutOfRange {
        schema: String,
        table: String,
        position: usize,
    },

    #[error("rule for {schema}.{table}: primary key column '{column}' is not a table column")]
    UnknownPrimaryKey {
        schema: String,
        table: String,
        column: String,
    },

    #[error("rule for {schema}.{table}: filter column '{column}' is not a table column")]
    UnknownFilterColumn {
        schema: String,
        table: String,
        column: String,
    },

    #[error("duplicate rule for {0}")]
    DuplicateRule(String),
}
