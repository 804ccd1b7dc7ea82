//! Source-to-target table mapping.
//!
//! A [`Rule`] is built once at startup and never mutated. Every position
//! stored in [`TableInfo::pk_columns`] is checked against the column list at
//! construction, so builders can index rows by position without re-validating
//! the rule for each event.

use crate::error::RuleError;
use std::collections::HashMap;
use std::sync::Arc;

/// Column layout of a source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Column names in binlog row order.
    pub columns: Vec<String>,
    /// Positions into `columns` that form the primary key, in key order.
    pub pk_columns: Vec<usize>,
}

impl TableInfo {
    pub fn new(columns: Vec<String>, pk_columns: Vec<usize>) -> Self {
        Self {
            columns,
            pk_columns,
        }
    }

    /// Whether the column at `position` is part of the primary key.
    pub fn is_pk(&self, position: usize) -> bool {
        self.pk_columns.contains(&position)
    }

    /// Primary key column names in key order.
    pub fn pk_names(&self) -> impl Iterator<Item = &str> {
        self.pk_columns.iter().map(|&i| self.columns[i].as_str())
    }
}

/// Mapping from one source table to a target table or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub schema: String,
    pub table: String,
    pub target_schema: String,
    /// Target table name, or index name for the search sink.
    pub target_table: String,
    pub table_info: TableInfo,
    filter: Vec<String>,
}

impl Rule {
    /// Create a validated rule.
    ///
    /// An empty `filter` admits every column. An empty primary key is
    /// accepted here and reported by the update/delete builders on first use.
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        target_schema: impl Into<String>,
        target_table: impl Into<String>,
        table_info: TableInfo,
        filter: Vec<String>,
    ) -> Result<Self, RuleError> {
        let schema = schema.into();
        let table = table.into();

        if table_info.columns.is_empty() {
            return Err(RuleError::EmptyColumns { schema, table });
        }

        for (i, column) in table_info.columns.iter().enumerate() {
            if table_info.columns[..i].contains(column) {
                return Err(RuleError::DuplicateColumn {
                    schema,
                    table,
                    column: column.clone(),
                });
            }
        }

        if let Some(&position) = table_info
            .pk_columns
            .iter()
            .find(|&&p| p >= table_info.columns.len())
        {
            return Err(RuleError::PrimaryKeyOutOfRange {
                schema,
                table,
                position,
            });
        }

        if let Some(column) = filter.iter().find(|f| !table_info.columns.contains(f)) {
            return Err(RuleError::UnknownFilterColumn {
                schema,
                table,
                column: column.clone(),
            });
        }

        Ok(Self {
            schema,
            table,
            target_schema: target_schema.into(),
            target_table: target_table.into(),
            table_info,
            filter,
        })
    }

    /// Resolve primary key column names to positions and create the rule.
    pub fn with_pk_names(
        schema: impl Into<String>,
        table: impl Into<String>,
        target_schema: impl Into<String>,
        target_table: impl Into<String>,
        columns: Vec<String>,
        pk_names: &[String],
        filter: Vec<String>,
    ) -> Result<Self, RuleError> {
        let schema = schema.into();
        let table = table.into();

        let mut pk_columns = Vec::with_capacity(pk_names.len());
        for name in pk_names {
            match columns.iter().position(|c| c == name) {
                Some(p) => pk_columns.push(p),
                None => {
                    return Err(RuleError::UnknownPrimaryKey {
                        schema,
                        table,
                        column: name.clone(),
                    })
                }
            }
        }

        Self::new(
            schema,
            table,
            target_schema,
            target_table,
            TableInfo::new(columns, pk_columns),
            filter,
        )
    }

    /// Column allow-list predicate.
    pub fn check_filter(&self, column: &str) -> bool {
        self.filter.is_empty() || self.filter.iter().any(|f| f == column)
    }

    /// Positions of the columns admitted by the filter, in column order.
    pub fn filtered_positions(&self) -> Vec<usize> {
        self.table_info
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.check_filter(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// Key used to look the rule up from a decoded event.
    pub fn key(&self) -> String {
        rule_key(&self.schema, &self.table)
    }
}

/// Case-insensitive `schema:table` lookup key.
pub fn rule_key(schema: &str, table: &str) -> String {
    format!("{schema}:{table}").to_lowercase()
}

/// Read-only set of rules keyed by source table.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, Arc<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, rejecting a second rule for the same source table.
    pub fn insert(&mut self, rule: Rule) -> Result<(), RuleError> {
        let key = rule.key();
        if self.rules.contains_key(&key) {
            return Err(RuleError::DuplicateRule(key));
        }
        self.rules.insert(key, Arc::new(rule));
        Ok(())
    }

    pub fn get(&self, schema: &str, table: &str) -> Option<&Arc<Rule>> {
        self.rules.get(&rule_key(schema, table))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_with_pk_names_resolves_positions() {
        let rule = Rule::with_pk_names(
            "shop",
            "orders",
            "mirror",
            "orders",
            columns(&["tenant", "id", "total"]),
            &columns(&["tenant", "id"]),
            vec![],
        )
        .unwrap();

        assert_eq!(rule.table_info.pk_columns, vec![0, 1]);
        assert_eq!(rule.table_info.pk_names().collect::<Vec<_>>(), ["tenant", "id"]);
    }

    #[test]
    fn test_unknown_pk_column_rejected() {
        let err = Rule::with_pk_names(
            "shop",
            "users",
            "mirror",
            "users",
            columns(&["id", "name"]),
            &columns(&["uid"]),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnknownPrimaryKey { column, .. } if column == "uid"));
    }

    #[test]
    fn test_pk_position_out_of_range() {
        let err = Rule::new(
            "shop",
            "users",
            "mirror",
            "users",
            TableInfo::new(columns(&["id"]), vec![3]),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::PrimaryKeyOutOfRange { position: 3, .. }));
    }

    #[test]
    fn test_duplicate_and_empty_columns() {
        let dup = Rule::new(
            "s",
            "t",
            "s",
            "t",
            TableInfo::new(columns(&["id", "id"]), vec![0]),
            vec![],
        );
        assert!(matches!(dup, Err(RuleError::DuplicateColumn { .. })));

        let empty = Rule::new("s", "t", "s", "t", TableInfo::new(vec![], vec![]), vec![]);
        assert!(matches!(empty, Err(RuleError::EmptyColumns { .. })));
    }

    #[test]
    fn test_filter() {
        let rule = Rule::new(
            "shop",
            "users",
            "mirror",
            "users",
            TableInfo::new(columns(&["id", "name", "secret"]), vec![0]),
            columns(&["id", "name"]),
        )
        .unwrap();

        assert!(rule.check_filter("name"));
        assert!(!rule.check_filter("secret"));
        assert_eq!(rule.filtered_positions(), vec![0, 1]);

        let bad = Rule::new(
            "shop",
            "users",
            "mirror",
            "users",
            TableInfo::new(columns(&["id"]), vec![0]),
            columns(&["nope"]),
        );
        assert!(matches!(bad, Err(RuleError::UnknownFilterColumn { .. })));
    }

    #[test]
    fn test_rule_set_lookup_is_case_insensitive() {
        let mut rules = RuleSet::new();
        let rule = Rule::new(
            "Shop",
            "Users",
            "mirror",
            "users",
            TableInfo::new(columns(&["id"]), vec![0]),
            vec![],
        )
        .unwrap();
        rules.insert(rule.clone()).unwrap();

        assert!(rules.get("shop", "users").is_some());
        assert!(rules.get("shop", "orders").is_none());
        assert_eq!(rules.insert(rule), Err(RuleError::DuplicateRule("shop:users".into())));
    }
}
