//! Core types for mysql-river.
//!
//! This crate provides the foundational types shared by the event handler
//! and the sinks:
//!
//! - [`Rule`] / [`RuleSet`] - Source-to-target table mappings
//! - [`RowValue`] - Closed value type for decoded row columns
//! - [`RowChangeEvent`] - One decoded binlog rows event
//! - [`RequestBuilder`] - Seam implemented by each sink's builder family
//! - [`BuildError`] - Why an event could not be translated
//!
//! # Architecture
//!
//! ```text
//! river-core (this crate)
//!    │
//!    ├─── mysql-types   (RowValue → mysql_async::Value)
//!    ├─── mysql-sink    (SQL builders, grouping, transactional apply)
//!    └─── search-sink   (document builders, bulk bodies)
//! ```

pub mod error;
pub mod event;
pub mod rule;
pub mod values;

pub use error::{BuildError, RuleError};
pub use event::{check_row_lengths, check_update_pairs, Action, RequestBuilder, RowChangeEvent};
pub use rule::{rule_key, Rule, RuleSet, TableInfo};
pub use values::{Row, RowValue, DATETIME_FORMAT};
