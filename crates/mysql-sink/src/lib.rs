//! Relational sink for mysql-river.
//!
//! Translates row-change events into prepared-statement requests and applies
//! each batch in a single transaction:
//!
//! ```text
//! RowChangeEvent ──► SqlRequestBuilder ──► Vec<SqlRequest>
//!                                              │
//!                        Applier::apply ◄──────┘
//!                          ├─ begin
//!                          ├─ group_requests (one statement per group)
//!                          ├─ prepare / execute × n / close
//!                          └─ commit (or rollback on first failure)
//! ```

mod apply;
mod builder;
mod group;
mod request;
mod store;
mod template;
pub mod testing;

pub use apply::Applier;
pub use builder::{build_delete, build_insert, build_update, SqlRequestBuilder};
pub use group::{group_requests, RequestGroup};
pub use request::SqlRequest;
pub use store::{new_mysql_pool, MySqlStore, MySqlTransaction, StoreTransaction, TargetStore};
pub use template::{extract, quote_ident, Template};
