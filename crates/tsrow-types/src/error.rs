//! Ingestion error taxonomy.

use crate::wire::{SemanticType, WireType};

/// Errors produced while building, inferring or assembling ingest payloads.
///
/// Every variant is terminal for the call that raised it. Accumulators
/// (tables, metrics) are left exactly as they were before the failing call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IngestError {
    /// A table or column name was empty after trimming.
    #[error("name should not be empty")]
    EmptyName,

    /// A table or column name reached the length limit.
    #[error("name {name:?} is {len} bytes, the limit is {limit}")]
    NameTooLong {
        name: String,
        len: usize,
        limit: usize,
    },

    /// Unknown type or precision token, or a field with no natural wire type.
    #[error("unsupported column type {0:?}")]
    UnsupportedType(String),

    /// Input is not a structured record where one was required.
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// A value cannot be coerced into the requested wire type.
    #[error("value {value} is not compatible with {target}")]
    TypeMismatch { value: String, target: WireType },

    /// Row width differs from the number of declared columns.
    #[error("number of inputs {got} does not match number of columns in schema {expected}")]
    ArityMismatch { expected: usize, got: usize },

    /// A row was added before any column was declared.
    #[error("column not set, add at least one column before adding rows")]
    EmptyColumn,

    /// A table without columns or rows was handed to the assembler.
    #[error("table {0:?} has no columns or no rows")]
    EmptyTable(String),

    /// A metric without series was handed to the assembler.
    #[error("metric has no series, add at least one series before encoding")]
    NoSeriesInMetric,

    /// An insert batch was finished without any table.
    #[error("insert batch is empty, add at least one table before sending")]
    EmptyTables,

    /// A column was reused with a different role or type than first seen.
    #[error(
        "column {column:?} was first seen as {expected_role}/{expected_type}, \
         got {found_role}/{found_type}"
    )]
    SchemaConflict {
        column: String,
        expected_role: SemanticType,
        expected_type: WireType,
        found_role: SemanticType,
        found_type: WireType,
    },

    /// A record declared more than one timestamp column.
    #[error("more than one timestamp column: {first:?} and {second:?}")]
    MultipleTimestamps { first: String, second: String },

    /// Top-level absent record where a value was required.
    #[error("unable to extract values from nil input")]
    NilInput,

    /// Timestamp precision is not one of second/milli/micro/nanosecond.
    #[error("invalid timestamp precision: {0}")]
    InvalidPrecision(String),

    /// Precision change attempted after series were added.
    #[error("timestamp precision is locked once series have been added")]
    PrecisionLocked,

    /// JSON marshaling of a value failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid encoder configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A finished payload could not be serialized into a wire format.
    #[error("payload encoding failed: {0}")]
    Encode(String),
}

impl IngestError {
    /// Build a [`IngestError::TypeMismatch`] from any debuggable value.
    pub fn mismatch(value: &impl std::fmt::Debug, target: WireType) -> Self {
        Self::TypeMismatch {
            value: format!("{value:?}"),
            target,
        }
    }
}

/// Convenience alias used throughout tsrow.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_value_and_target() {
        let err = IngestError::mismatch(&"abc", WireType::Int64);
        let msg = err.to_string();
        assert!(msg.contains("\"abc\""), "got: {msg}");
        assert!(msg.contains("INT64"), "got: {msg}");
    }

    #[test]
    fn schema_conflict_names_column() {
        let err = IngestError::SchemaConflict {
            column: "cpu".into(),
            expected_role: SemanticType::Field,
            expected_type: WireType::Float64,
            found_role: SemanticType::Field,
            found_type: WireType::String,
        };
        let msg = err.to_string();
        assert!(msg.contains("\"cpu\""));
        assert!(msg.contains("FIELD/FLOAT64"));
        assert!(msg.contains("FIELD/STRING"));
    }

    #[test]
    fn json_error_wraps() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = IngestError::from(inner);
        assert!(err.to_string().starts_with("json error"));
    }
}
