//! Row-change event → SQL request translation.

use crate::request::SqlRequest;
use crate::template::{extract, Template};
use river_core::{
    check_row_lengths, check_update_pairs, Action, BuildError, RequestBuilder, Row, Rule,
};

/// Builder family for the relational sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlRequestBuilder;

impl RequestBuilder for SqlRequestBuilder {
    type Request = SqlRequest;

    fn build(&self, rule: &Rule, action: Action, rows: &[Row]) -> Result<Vec<SqlRequest>, BuildError> {
        match action {
            Action::Insert => build_insert(rule, rows),
            Action::Update => build_update(rule, rows),
            Action::Delete => build_delete(rule, rows),
        }
    }
}

/// One INSERT per row, all sharing one statement.
pub fn build_insert(rule: &Rule, rows: &[Row]) -> Result<Vec<SqlRequest>, BuildError> {
    let template = Template::insert(rule)?;
    check_row_lengths(rule, rows)?;

    Ok(rows
        .iter()
        .map(|row| {
            SqlRequest::new(
                Action::Insert,
                &rule.target_table,
                template.query.clone(),
                extract(row, &template.columns),
            )
        })
        .collect())
}

/// One UPDATE per (old, new) pair.
///
/// SET values come from the new row; WHERE values come from the old row's
/// primary key, so an update that changes the key still locates the row as
/// it exists in the target.
pub fn build_update(rule: &Rule, rows: &[Row]) -> Result<Vec<SqlRequest>, BuildError> {
    check_update_pairs(rows)?;
    let template = Template::update(rule)?;
    check_row_lengths(rule, rows)?;

    Ok(rows
        .chunks_exact(2)
        .map(|pair| {
            let (old, new) = (&pair[0], &pair[1]);
            let mut values = extract(new, &template.columns);
            values.extend(extract(old, &template.keys));
            SqlRequest::new(
                Action::Update,
                &rule.target_table,
                template.query.clone(),
                values,
            )
        })
        .collect())
}

/// One DELETE per row, bound to the row's primary key values.
pub fn build_delete(rule: &Rule, rows: &[Row]) -> Result<Vec<SqlRequest>, BuildError> {
    let template = Template::delete(rule)?;
    check_row_lengths(rule, rows)?;

    Ok(rows
        .iter()
        .map(|row| {
            SqlRequest::new(
                Action::Delete,
                &rule.target_table,
                template.query.clone(),
                extract(row, &template.keys),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use river_core::{RowValue, TableInfo};
    use std::sync::Arc;

    fn users_rule(pk: Vec<usize>) -> Rule {
        Rule::new(
            "shop",
            "users",
            "mirror",
            "users",
            TableInfo::new(vec!["id".into(), "name".into(), "age".into()], pk),
            vec![],
        )
        .unwrap()
    }

    fn row(id: i64, name: &str, age: i64) -> Row {
        vec![id.into(), name.into(), age.into()]
    }

    #[test]
    fn test_insert_shares_one_statement() {
        let rows: Vec<Row> = (0..5).map(|i| row(i, "x", i * 10)).collect();
        let reqs = build_insert(&users_rule(vec![0]), &rows).unwrap();

        assert_eq!(reqs.len(), 5);
        for (req, source) in reqs.iter().zip(&rows) {
            assert!(Arc::ptr_eq(&req.query, &reqs[0].query));
            assert_eq!(&req.values, source);
            assert_eq!(req.action, Action::Insert);
            assert_eq!(req.table, "users");
        }
    }

    #[test]
    fn test_insert_filtered_values_follow_column_order() {
        let rule = Rule::new(
            "shop",
            "users",
            "mirror",
            "users",
            TableInfo::new(vec!["id".into(), "name".into(), "age".into()], vec![0]),
            vec!["age".into(), "id".into()],
        )
        .unwrap();

        let reqs = build_insert(&rule, &[row(1, "a", 10)]).unwrap();
        assert_eq!(reqs[0].values, vec![RowValue::Int(1), RowValue::Int(10)]);
    }

    #[test]
    fn test_update_binds_new_values_then_old_key() {
        let rows = vec![row(1, "a", 10), row(2, "b", 11), row(3, "c", 30), row(3, "c", 31)];
        let reqs = build_update(&users_rule(vec![0]), &rows).unwrap();

        assert_eq!(reqs.len(), 2);
        assert_eq!(
            reqs[0].values,
            vec![RowValue::from("b"), RowValue::Int(11), RowValue::Int(1)]
        );
        assert_eq!(
            reqs[1].values,
            vec![RowValue::from("c"), RowValue::Int(31), RowValue::Int(3)]
        );
        assert!(Arc::ptr_eq(&reqs[0].query, &reqs[1].query));
    }

    #[test]
    fn test_update_odd_rows_is_malformed() {
        let rows = vec![row(1, "a", 10), row(1, "a", 11), row(2, "b", 20)];
        assert_eq!(
            build_update(&users_rule(vec![0]), &rows),
            Err(BuildError::MalformedEvent { rows: 3 })
        );
    }

    #[test]
    fn test_update_and_delete_need_primary_key() {
        let rule = users_rule(vec![]);
        let pair = vec![row(1, "a", 10), row(1, "a", 11)];
        assert!(matches!(
            build_update(&rule, &pair),
            Err(BuildError::NoPrimaryKey { .. })
        ));
        assert!(matches!(
            build_delete(&rule, &pair),
            Err(BuildError::NoPrimaryKey { .. })
        ));
        assert!(build_insert(&rule, &pair).is_ok());
    }

    #[test]
    fn test_delete_binds_key_in_key_order() {
        let reqs = build_delete(&users_rule(vec![2, 0]), &[row(7, "a", 40)]).unwrap();
        assert_eq!(reqs[0].values, vec![RowValue::Int(40), RowValue::Int(7)]);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = build_insert(&users_rule(vec![0]), &[vec![1.into()]]).unwrap_err();
        assert!(matches!(err, BuildError::RowLength { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_builder_dispatch() {
        let reqs = SqlRequestBuilder
            .build(&users_rule(vec![0]), Action::Delete, &[row(1, "a", 10)])
            .unwrap();
        assert_eq!(reqs[0].action, Action::Delete);
        assert_eq!(reqs[0].values, vec![RowValue::Int(1)]);
    }
}
