//! Typed wire values.

use serde::{Deserialize, Serialize};

use crate::wire::WireType;

/// One typed cell, exactly one variant per [`WireType`].
///
/// Absent cells are represented as `None` by the containers holding values,
/// never by a variant of this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Value {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    #[serde(rename = "UINT8")]
    UInt8(u8),
    #[serde(rename = "UINT16")]
    UInt16(u16),
    #[serde(rename = "UINT32")]
    UInt32(u32),
    #[serde(rename = "UINT64")]
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Binary(Vec<u8>),
    String(String),
    /// Days since the Unix epoch.
    Date(i32),
    /// Milliseconds since the Unix epoch.
    Datetime(i64),
    TimestampSecond(i64),
    TimestampMillisecond(i64),
    TimestampMicrosecond(i64),
    TimestampNanosecond(i64),
    Json(String),
}

impl Value {
    /// The wire type this value is encoded as.
    #[must_use]
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Boolean(_) => WireType::Boolean,
            Self::Int8(_) => WireType::Int8,
            Self::Int16(_) => WireType::Int16,
            Self::Int32(_) => WireType::Int32,
            Self::Int64(_) => WireType::Int64,
            Self::UInt8(_) => WireType::UInt8,
            Self::UInt16(_) => WireType::UInt16,
            Self::UInt32(_) => WireType::UInt32,
            Self::UInt64(_) => WireType::UInt64,
            Self::Float32(_) => WireType::Float32,
            Self::Float64(_) => WireType::Float64,
            Self::Binary(_) => WireType::Binary,
            Self::String(_) => WireType::String,
            Self::Date(_) => WireType::Date,
            Self::Datetime(_) => WireType::Datetime,
            Self::TimestampSecond(_) => WireType::TimestampSecond,
            Self::TimestampMillisecond(_) => WireType::TimestampMillisecond,
            Self::TimestampMicrosecond(_) => WireType::TimestampMicrosecond,
            Self::TimestampNanosecond(_) => WireType::TimestampNanosecond,
            Self::Json(_) => WireType::Json,
        }
    }

    /// Integer payload widened to `i64`, for integer and temporal values.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(i64::from(v)),
            Self::Int16(v) => Some(i64::from(v)),
            Self::Int32(v) | Self::Date(v) => Some(i64::from(v)),
            Self::Int64(v)
            | Self::Datetime(v)
            | Self::TimestampSecond(v)
            | Self::TimestampMillisecond(v)
            | Self::TimestampMicrosecond(v)
            | Self::TimestampNanosecond(v) => Some(v),
            Self::UInt8(v) => Some(i64::from(v)),
            Self::UInt16(v) => Some(i64::from(v)),
            Self::UInt32(v) => Some(i64::from(v)),
            Self::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// String payload for `String` and `Json` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Json(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_matches_variant() {
        assert_eq!(Value::UInt16(3).wire_type(), WireType::UInt16);
        assert_eq!(Value::Date(19_000).wire_type(), WireType::Date);
        assert_eq!(Value::Json("{}".into()).wire_type(), WireType::Json);
    }

    #[test]
    fn tagged_json_format() {
        let json = serde_json::to_value(Value::TimestampMillisecond(1_700_000_000_000)).unwrap();
        assert_eq!(json["type"], "TIMESTAMP_MILLISECOND");
        assert_eq!(json["value"], 1_700_000_000_000_i64);

        let json = serde_json::to_value(Value::UInt8(7)).unwrap();
        assert_eq!(json["type"], "UINT8");
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Int8(-3).as_i64(), Some(-3));
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Float64(1.0).as_i64(), None);
        assert_eq!(Value::Json("[1]".into()).as_str(), Some("[1]"));
        assert_eq!(Value::Boolean(true).as_str(), None);
    }
}
