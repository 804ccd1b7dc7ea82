//! Forward conversion: RowValue → MySQLValue
//!
//! This module implements `From<RowValue>` for `MySQLValue`, converting
//! decoded row values into MySQL-compatible bind parameters.

use chrono::{Datelike, Timelike};
use mysql_async::{Params, Value};
use river_core::RowValue;

/// MySQL value wrapper for type-safe conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct MySQLValue(pub Value);

impl MySQLValue {
    /// Get the inner mysql_async::Value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<RowValue> for MySQLValue {
    fn from(value: RowValue) -> Self {
        match value {
            RowValue::Null => MySQLValue(Value::NULL),
            RowValue::Int(i) => MySQLValue(Value::Int(i)),
            RowValue::UInt(u) => MySQLValue(Value::UInt(u)),
            RowValue::Float(f) => MySQLValue(Value::Double(f)),
            RowValue::Text(s) => MySQLValue(Value::Bytes(s.into_bytes())),
            RowValue::Bytes(b) => MySQLValue(Value::Bytes(b)),

            // DATETIME(6); MySQL keeps microseconds only. Years outside
            // 0..=9999 are clamped, a leap second maps to 999_999 micros.
            RowValue::DateTime(dt) => MySQLValue(Value::Date(
                dt.year().clamp(0, 9999) as u16,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
                (dt.nanosecond() / 1000).min(999_999),
            )),
        }
    }
}

impl From<&RowValue> for MySQLValue {
    fn from(value: &RowValue) -> Self {
        value.clone().into()
    }
}

/// Build positional parameters for one statement execution.
pub fn to_params(values: &[RowValue]) -> Params {
    if values.is_empty() {
        return Params::Empty;
    }
    Params::Positional(
        values
            .iter()
            .map(|v| MySQLValue::from(v).into_inner())
            .collect(),
    )
}
