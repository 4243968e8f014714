//! Wire type catalog.
//!
//! [`WireType`] is the closed set of column data types the ingestion protocol
//! carries. The discriminants follow the protocol's column data type
//! numbering, so they must not be reordered. [`SemanticType`] is the role a
//! column plays in a table and [`Precision`] the width of a timestamp.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Column data type on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireType {
    Boolean = 0,
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    #[serde(rename = "UINT8")]
    UInt8 = 5,
    #[serde(rename = "UINT16")]
    UInt16 = 6,
    #[serde(rename = "UINT32")]
    UInt32 = 7,
    #[serde(rename = "UINT64")]
    UInt64 = 8,
    Float32 = 9,
    Float64 = 10,
    Binary = 11,
    String = 12,
    /// Days since the Unix epoch.
    Date = 13,
    /// Milliseconds since the Unix epoch.
    Datetime = 14,
    TimestampSecond = 15,
    TimestampMillisecond = 16,
    TimestampMicrosecond = 17,
    TimestampNanosecond = 18,
    /// JSON document carried as a string.
    Json = 31,
}

impl WireType {
    /// Every catalog member, in protocol order.
    pub const ALL: [WireType; 20] = [
        Self::Boolean,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Binary,
        Self::String,
        Self::Date,
        Self::Datetime,
        Self::TimestampSecond,
        Self::TimestampMillisecond,
        Self::TimestampMicrosecond,
        Self::TimestampNanosecond,
        Self::Json,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UInt8 => "UINT8",
            Self::UInt16 => "UINT16",
            Self::UInt32 => "UINT32",
            Self::UInt64 => "UINT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Binary => "BINARY",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Datetime => "DATETIME",
            Self::TimestampSecond => "TIMESTAMP_SECOND",
            Self::TimestampMillisecond => "TIMESTAMP_MILLISECOND",
            Self::TimestampMicrosecond => "TIMESTAMP_MICROSECOND",
            Self::TimestampNanosecond => "TIMESTAMP_NANOSECOND",
            Self::Json => "JSON",
        }
    }

    /// Protocol column data type number.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn is_signed_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    #[must_use]
    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    /// Date, datetime and the four timestamp widths.
    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::Datetime
                | Self::TimestampSecond
                | Self::TimestampMillisecond
                | Self::TimestampMicrosecond
                | Self::TimestampNanosecond
        )
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireType {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        parse_type(s, "")
    }
}

/// Parse a type name, resolving a bare `timestamp` with `precision_hint`.
///
/// An empty or unrecognized hint falls back to milliseconds.
///
/// # Errors
///
/// [`IngestError::UnsupportedType`] for unknown names.
pub fn parse_type(name: &str, precision_hint: &str) -> Result<WireType> {
    parse_type_with(name, precision_hint, Precision::default())
}

/// Like [`parse_type`] with a caller-chosen fallback precision.
///
/// # Errors
///
/// [`IngestError::UnsupportedType`] for unknown names.
pub fn parse_type_with(name: &str, precision_hint: &str, fallback: Precision) -> Result<WireType> {
    let ty = match name.trim().to_ascii_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => WireType::Boolean,
        "INT8" => WireType::Int8,
        "INT16" => WireType::Int16,
        "INT32" => WireType::Int32,
        "INT" | "INT64" => WireType::Int64,
        "UINT8" => WireType::UInt8,
        "UINT16" => WireType::UInt16,
        "UINT32" => WireType::UInt32,
        "UINT" | "UINT64" => WireType::UInt64,
        "FLOAT32" => WireType::Float32,
        "FLOAT" | "FLOAT64" => WireType::Float64,
        "BYTES" | "BINARY" => WireType::Binary,
        "STRING" => WireType::String,
        "DATE" => WireType::Date,
        "DATETIME" => WireType::Datetime,
        "JSON" => WireType::Json,
        "TIMESTAMP" => Precision::parse_or(precision_hint, fallback).timestamp_type(),
        "TIMESTAMP_SECOND" => WireType::TimestampSecond,
        "TIMESTAMP_MILLISECOND" => WireType::TimestampMillisecond,
        "TIMESTAMP_MICROSECOND" => WireType::TimestampMicrosecond,
        "TIMESTAMP_NANOSECOND" => WireType::TimestampNanosecond,
        _ => return Err(IngestError::UnsupportedType(name.to_string())),
    };
    Ok(ty)
}

/// Role of a column within a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    /// Identifies a series.
    Tag,
    /// A measured value.
    #[default]
    Field,
    /// The time index. At most one per table.
    Timestamp,
}

impl SemanticType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "TAG",
            Self::Field => "FIELD",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Second,
    #[default]
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl Precision {
    /// Case-insensitive parse of `second`, `millisecond`, `microsecond`,
    /// `nanosecond`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "second" => Some(Self::Second),
            "millisecond" => Some(Self::Millisecond),
            "microsecond" => Some(Self::Microsecond),
            "nanosecond" => Some(Self::Nanosecond),
            _ => None,
        }
    }

    /// Parse `s`, falling back to `default` when it is empty or unknown.
    #[must_use]
    pub fn parse_or(s: &str, default: Self) -> Self {
        Self::parse(s).unwrap_or(default)
    }

    /// Parse `s`, falling back to milliseconds.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse_or(s, Self::default())
    }

    /// Accepts exactly 1s, 1ms, 1µs or 1ns.
    ///
    /// # Errors
    ///
    /// [`IngestError::InvalidPrecision`] for any other duration.
    pub fn from_duration(d: Duration) -> Result<Self> {
        match d {
            d if d == Duration::from_secs(1) => Ok(Self::Second),
            d if d == Duration::from_millis(1) => Ok(Self::Millisecond),
            d if d == Duration::from_micros(1) => Ok(Self::Microsecond),
            d if d == Duration::from_nanos(1) => Ok(Self::Nanosecond),
            other => Err(IngestError::InvalidPrecision(format!("{other:?}"))),
        }
    }

    /// The timestamp wire type of this width.
    #[must_use]
    pub fn timestamp_type(self) -> WireType {
        match self {
            Self::Second => WireType::TimestampSecond,
            Self::Millisecond => WireType::TimestampMillisecond,
            Self::Microsecond => WireType::TimestampMicrosecond,
            Self::Nanosecond => WireType::TimestampNanosecond,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
