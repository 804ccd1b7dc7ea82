//! MySQL type conversions for river-core row values.
//!
//! This crate converts decoded [`river_core::RowValue`]s into
//! `mysql_async::Value`s so they can be bound as positional parameters of a
//! prepared statement.
//!
//! # Example
//!
//! ```rust
//! use mysql_types::MySQLValue;
//! use river_core::RowValue;
//!
//! let value: MySQLValue = RowValue::Int(42).into();
//! assert_eq!(value.into_inner(), mysql_async::Value::Int(42));
//! ```

pub mod forward;

pub use forward::{to_params, MySQLValue};
