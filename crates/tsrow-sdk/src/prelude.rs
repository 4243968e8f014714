//! Convenience re-exports.
//!
//! ```ignore
//! use tsrow_sdk::prelude::*;
//! ```

// Inputs
pub use crate::datum::Datum;
pub use crate::metric::{Metric, Series};
pub use crate::record::{FieldValue, Record, RecordSchema};
pub use crate::row;
pub use crate::table::Table;
pub use tsrow_sdk_macros::Record;

// Wire model
pub use crate::types::{
    ColumnSchema, IngestError, Precision, Result, Row, SemanticType, Value, WireType,
};

// Assembly and delivery
pub use crate::batch::{InsertBatch, TablePayload, Transport};
pub use crate::config::EncoderConfig;
pub use crate::encoder::Encoder;
pub use crate::payload::{Column, ColumnarPayload, RowPayload};
