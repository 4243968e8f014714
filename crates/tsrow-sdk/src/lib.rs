//! Schema inference and columnar row encoding for time-series ingestion.
//!
//! Three ways in, one way out:
//!
//! - a manually built [`Table`] of declared columns and raw rows,
//! - any type implementing [`Record`] (usually `#[derive(Record)]`), singly
//!   or as a collection,
//! - a [`Metric`] of sparse [`Series`] merged under one column set.
//!
//! Each is assembled into a [`RowPayload`] or [`ColumnarPayload`], bundled
//! into an [`InsertBatch`] and handed to a [`Transport`].
//!
//! ```
//! use tsrow_sdk::prelude::*;
//!
//! #[derive(Record)]
//! struct Cpu {
//!     #[tsrow("tag")]
//!     pub host: String,
//!     pub usage: f64,
//! }
//!
//! let payload = RowPayload::from_record(&Cpu { host: "web-1".into(), usage: 0.5 }).unwrap();
//! assert_eq!(payload.table_name, "cpu");
//! assert_eq!(payload.columns[0].semantic_type, SemanticType::Tag);
//! ```

#![warn(clippy::pedantic)]

extern crate self as tsrow_sdk;

pub mod annotation;
pub mod arrow;
pub mod batch;
pub mod cache;
pub mod cell;
pub mod config;
pub mod datum;
pub mod encoder;
#[cfg(feature = "logging")]
pub mod logging;
pub mod metric;
pub mod payload;
pub mod prelude;
pub mod record;
pub mod table;

pub use tsrow_types as types;

pub use batch::{InsertBatch, TablePayload, Transport};
pub use cache::SchemaCache;
pub use cell::coerce;
pub use config::EncoderConfig;
pub use datum::Datum;
pub use encoder::Encoder;
pub use metric::{Metric, Series};
pub use payload::{Column, ColumnarPayload, RowPayload};
pub use record::{FieldDescriptor, FieldValue, Record, RecordSchema};
pub use table::Table;
pub use tsrow_sdk_macros::Record;
pub use tsrow_types::{IngestError, Result};
