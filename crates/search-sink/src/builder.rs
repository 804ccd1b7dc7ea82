//! Row-change event → document request translation.
//!
//! Documents are keyed by the primary key values joined with `:`, so every
//! action needs a primary key, including inserts.

use crate::document::{to_json, DocumentRequest};
use river_core::{
    check_row_lengths, check_update_pairs, Action, BuildError, RequestBuilder, Row, Rule,
};
use serde_json::{Map, Value};

/// Builder family for the search-index sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRequestBuilder;

impl RequestBuilder for DocumentRequestBuilder {
    type Request = DocumentRequest;

    fn build(
        &self,
        rule: &Rule,
        action: Action,
        rows: &[Row],
    ) -> Result<Vec<DocumentRequest>, BuildError> {
        match action {
            Action::Insert => build_index(rule, rows),
            Action::Update => build_update(rule, rows),
            Action::Delete => build_delete(rule, rows),
        }
    }
}

/// One index request per row carrying every filtered column.
pub fn build_index(rule: &Rule, rows: &[Row]) -> Result<Vec<DocumentRequest>, BuildError> {
    require_pk(rule)?;
    let columns = require_columns(rule)?;
    check_row_lengths(rule, rows)?;

    Ok(rows
        .iter()
        .map(|row| {
            DocumentRequest::index(
                &rule.target_table,
                doc_id(rule, row),
                document(rule, &columns, row),
            )
        })
        .collect())
}

/// Partial update when the id is stable; delete + index when the key changed.
pub fn build_update(rule: &Rule, rows: &[Row]) -> Result<Vec<DocumentRequest>, BuildError> {
    check_update_pairs(rows)?;
    require_pk(rule)?;
    let columns = require_columns(rule)?;
    check_row_lengths(rule, rows)?;

    let mut reqs = Vec::with_capacity(rows.len() / 2);
    for pair in rows.chunks_exact(2) {
        let (old, new) = (&pair[0], &pair[1]);
        let old_id = doc_id(rule, old);
        let new_id = doc_id(rule, new);

        if old_id != new_id {
            reqs.push(DocumentRequest::delete(&rule.target_table, old_id));
            reqs.push(DocumentRequest::index(
                &rule.target_table,
                new_id,
                document(rule, &columns, new),
            ));
        } else {
            let changed: Vec<usize> = columns
                .iter()
                .copied()
                .filter(|&i| old[i] != new[i])
                .collect();
            reqs.push(DocumentRequest::update(
                &rule.target_table,
                new_id,
                document(rule, &changed, new),
            ));
        }
    }

    Ok(reqs)
}

pub fn build_delete(rule: &Rule, rows: &[Row]) -> Result<Vec<DocumentRequest>, BuildError> {
    require_pk(rule)?;
    check_row_lengths(rule, rows)?;

    Ok(rows
        .iter()
        .map(|row| DocumentRequest::delete(&rule.target_table, doc_id(rule, row)))
        .collect())
}

/// Primary key values rendered as text and joined with `:`.
///
/// Values are not escaped, so composite keys whose text contains `:` can
/// collide: `("x:y", "z")` and `("x", "y:z")` both map to `x:y:z`.
pub fn doc_id(rule: &Rule, row: &Row) -> String {
    rule.table_info
        .pk_columns
        .iter()
        .map(|&i| row[i].to_string())
        .collect::<Vec<_>>()
        .join(":")
}

fn document(rule: &Rule, positions: &[usize], row: &Row) -> Map<String, Value> {
    positions
        .iter()
        .map(|&i| (rule.table_info.columns[i].clone(), to_json(&row[i])))
        .collect()
}

fn require_pk(rule: &Rule) -> Result<(), BuildError> {
    if rule.table_info.pk_columns.is_empty() {
        return Err(BuildError::NoPrimaryKey {
            table: rule.table.clone(),
        });
    }
    Ok(())
}

fn require_columns(rule: &Rule) -> Result<Vec<usize>, BuildError> {
    let columns = rule.filtered_positions();
    if columns.is_empty() {
        return Err(BuildError::NoColumns {
            table: rule.table.clone(),
        });
    }
    Ok(columns)
}
