//! Grouping of requests that share one statement.

use crate::request::SqlRequest;
use river_core::Action;
use std::collections::HashMap;
use std::sync::Arc;

/// Requests sharing an identical (table, action, query) key.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestGroup {
    pub query: Arc<str>,
    pub requests: Vec<SqlRequest>,
}

/// Partition requests by exact (table, action, query) equality.
///
/// Groups are returned in order of first appearance and requests keep their
/// relative order inside a group.
pub fn group_requests(requests: Vec<SqlRequest>) -> Vec<RequestGroup> {
    let mut index: HashMap<(String, Action, Arc<str>), usize> = HashMap::new();
    let mut groups: Vec<RequestGroup> = Vec::new();

    for req in requests {
        let key = (req.table.clone(), req.action, req.query.clone());
        match index.get(&key) {
            Some(&i) => groups[i].requests.push(req),
            None => {
                index.insert(key, groups.len());
                groups.push(RequestGroup {
                    query: req.query.clone(),
                    requests: vec![req],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use river_core::RowValue;

    fn req(table: &str, action: Action, query: &str, id: i64) -> SqlRequest {
        SqlRequest::new(action, table, Arc::from(query), vec![RowValue::Int(id)])
    }

    #[test]
    fn test_groups_by_exact_key() {
        let reqs = vec![
            req("users", Action::Insert, "INSERT a", 1),
            req("users", Action::Delete, "DELETE a", 2),
            req("users", Action::Insert, "INSERT a", 3),
            req("orders", Action::Insert, "INSERT a", 4),
            req("users", Action::Insert, "INSERT  a", 5),
        ];

        let groups = group_requests(reqs.clone());
        assert_eq!(groups.len(), 4);

        let ids = |g: &RequestGroup| -> Vec<RowValue> {
            g.requests.iter().map(|r| r.values[0].clone()).collect()
        };
        assert_eq!(ids(&groups[0]), vec![RowValue::Int(1), RowValue::Int(3)]);
        assert_eq!(ids(&groups[1]), vec![RowValue::Int(2)]);
        assert_eq!(ids(&groups[2]), vec![RowValue::Int(4)]);
        assert_eq!(ids(&groups[3]), vec![RowValue::Int(5)]);

        for group in &groups {
            let first = &group.requests[0];
            assert!(group.requests.iter().all(|r| r.table == first.table
                && r.action == first.action
                && r.query == group.query));
        }

        let mut regrouped: Vec<SqlRequest> = groups.into_iter().flat_map(|g| g.requests).collect();
        regrouped.sort_by_key(|r| r.values[0].as_i64());
        assert_eq!(regrouped, reqs);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_requests(Vec::new()).is_empty());
    }
}
