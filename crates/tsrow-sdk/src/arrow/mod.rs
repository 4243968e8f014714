//! Arrow export of assembled payloads.
//!
//! Transports that speak Arrow (Flight `DoPut`, IPC over HTTP) take payloads
//! through this module:
//! - Type mapping from wire types to Arrow types (`types`)
//! - Schema construction from column definitions (`schema`)
//! - `RecordBatch` construction from row and columnar payloads (`batch`)
//! - IPC stream framing of batches and payloads (`ipc`)

pub mod batch;
pub mod ipc;
pub mod schema;
pub mod types;

pub use ipc::{decode_ipc, encode_ipc, write_stream};
pub use schema::{build_arrow_schema, SEMANTIC_TYPE_KEY};
pub use types::arrow_data_type;
