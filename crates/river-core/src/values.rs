//! Row value representation.
//!
//! The decoder hands rows over as position-indexed sequences of [`RowValue`].
//! The set of variants is closed so sinks can convert every value without a
//! fallback path.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used when a datetime is rendered as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single column value from a decoded row.
///
/// JSON has no datetime type: a datetime string in a JSON row decodes as
/// [`RowValue::Text`]. Only decoders that build values directly produce
/// [`RowValue::DateTime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowValue {
    /// SQL NULL
    Null,

    /// Signed integer of any width
    Int(i64),

    /// Unsigned integer that does not fit in `i64`
    UInt(u64),

    /// Floating point (FLOAT/DOUBLE)
    Float(f64),

    /// Character data, including DECIMAL rendered as text
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// DATETIME/TIMESTAMP without time zone
    DateTime(NaiveDateTime),
}

/// One decoded row, aligned with the rule's column order.
pub type Row = Vec<RowValue>;

impl RowValue {
    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<i32> for RowValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for RowValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for RowValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::UInt(v),
        }
    }
}

impl From<f64> for RowValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for RowValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RowValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for RowValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<NaiveDateTime> for RowValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_from_conversions() {
        assert_eq!(RowValue::from(42), RowValue::Int(42));
        assert_eq!(RowValue::from(7u64), RowValue::Int(7));
        assert_eq!(RowValue::from(u64::MAX), RowValue::UInt(u64::MAX));
        assert_eq!(RowValue::from("a"), RowValue::Text("a".to_string()));
        assert_eq!(RowValue::from(None::<i64>), RowValue::Null);
        assert_eq!(RowValue::from(Some(3i64)), RowValue::Int(3));
    }

    #[test]
    fn test_display() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(RowValue::Int(-1).to_string(), "-1");
        assert_eq!(RowValue::Null.to_string(), "null");
        assert_eq!(RowValue::Bytes(b"ab".to_vec()).to_string(), "ab");
        assert_eq!(RowValue::DateTime(dt).to_string(), "2024-01-02T03:04:05");
    }

    #[test]
    fn test_deserialize_json_row() {
        let row: Row = serde_json::from_str(r#"[1, "a", null, 2.5]"#).unwrap();
        assert_eq!(
            row,
            vec![
                RowValue::Int(1),
                RowValue::Text("a".to_string()),
                RowValue::Null,
                RowValue::Float(2.5),
            ]
        );
    }

    #[test]
    fn test_json_datetime_string_stays_text() {
        let row: Row = serde_json::from_str(r#"["2024-01-02T03:04:05"]"#).unwrap();
        assert_eq!(row, vec![RowValue::Text("2024-01-02T03:04:05".to_string())]);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(RowValue::UInt(5).as_i64(), Some(5));
        assert_eq!(RowValue::UInt(u64::MAX).as_i64(), None);
        assert_eq!(RowValue::Text("5".into()).as_i64(), None);
    }
}
