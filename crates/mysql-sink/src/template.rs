//! Statement templates and row value extraction.
//!
//! A [`Template`] is the "shape" of a request: the statement text plus the
//! column positions whose values fill its placeholders. It is computed once
//! per event. Extracting the bound values of one row is a separate step, see
//! [`extract`].

use river_core::{BuildError, Row, RowValue, Rule};
use std::sync::Arc;

/// Statement text and the positions that feed its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub query: Arc<str>,
    /// Positions bound first: inserted values, or SET values for updates.
    pub columns: Vec<usize>,
    /// Positions bound last in the WHERE clause (primary key).
    pub keys: Vec<usize>,
}

impl Template {
    /// `INSERT INTO t (c1,c2) VALUES (?,?)` over the filtered columns.
    pub fn insert(rule: &Rule) -> Result<Self, BuildError> {
        let columns = rule.filtered_positions();
        if columns.is_empty() {
            return Err(no_columns(rule));
        }

        let names = join_names(rule, &columns, ",");
        let placeholders = vec!["?"; columns.len()].join(",");
        let query = format!(
            "INSERT INTO {} ({names}) VALUES ({placeholders})",
            target_name(rule)
        );

        Ok(Self {
            query: query.into(),
            columns,
            keys: Vec::new(),
        })
    }

    /// `UPDATE t SET a = ?, b = ? WHERE pk = ?` with non-key filtered columns
    /// in the SET clause and every key column in the WHERE clause.
    pub fn update(rule: &Rule) -> Result<Self, BuildError> {
        let filtered = rule.filtered_positions();
        if filtered.is_empty() {
            return Err(no_columns(rule));
        }
        let keys = primary_key(rule)?;

        let columns: Vec<usize> = filtered
            .into_iter()
            .filter(|&i| !rule.table_info.is_pk(i))
            .collect();
        if columns.is_empty() {
            return Err(no_columns(rule));
        }

        let query = format!(
            "UPDATE {} SET {} WHERE {}",
            target_name(rule),
            assignments(rule, &columns, ", "),
            assignments(rule, &keys, " AND ")
        );

        Ok(Self {
            query: query.into(),
            columns,
            keys,
        })
    }

    /// `DELETE FROM t WHERE pk = ?`.
    pub fn delete(rule: &Rule) -> Result<Self, BuildError> {
        let keys = primary_key(rule)?;
        let query = format!(
            "DELETE FROM {} WHERE {}",
            target_name(rule),
            assignments(rule, &keys, " AND ")
        );

        Ok(Self {
            query: query.into(),
            columns: Vec::new(),
            keys,
        })
    }
}

/// Values of `row` at `positions`, in the order given.
pub fn extract(row: &Row, positions: &[usize]) -> Vec<RowValue> {
    positions.iter().map(|&i| row[i].clone()).collect()
}

/// Quote a MySQL identifier with backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn target_name(rule: &Rule) -> String {
    if rule.target_schema.is_empty() {
        quote_ident(&rule.target_table)
    } else {
        format!(
            "{}.{}",
            quote_ident(&rule.target_schema),
            quote_ident(&rule.target_table)
        )
    }
}

fn join_names(rule: &Rule, positions: &[usize], sep: &str) -> String {
    positions
        .iter()
        .map(|&i| quote_ident(&rule.table_info.columns[i]))
        .collect::<Vec<_>>()
        .join(sep)
}

fn assignments(rule: &Rule, positions: &[usize], sep: &str) -> String {
    positions
        .iter()
        .map(|&i| format!("{} = ?", quote_ident(&rule.table_info.columns[i])))
        .collect::<Vec<_>>()
        .join(sep)
}

fn primary_key(rule: &Rule) -> Result<Vec<usize>, BuildError> {
    if rule.table_info.pk_columns.is_empty() {
        return Err(BuildError::NoPrimaryKey {
            table: rule.table.clone(),
        });
    }
    Ok(rule.table_info.pk_columns.clone())
}

fn no_columns(rule: &Rule) -> BuildError {
    BuildError::NoColumns {
        table: rule.table.clone(),
    }
}
