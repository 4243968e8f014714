//! Arrow IPC stream framing for payloads.

use arrow::datatypes::{Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::ipc::reader::StreamReader;
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;

use crate::payload::{ColumnarPayload, RowPayload};
use crate::types::{IngestError, Result};

fn ipc_error(stage: &'static str) -> impl FnOnce(ArrowError) -> IngestError {
    move |e| IngestError::Encode(format!("ipc {stage}: {e}"))
}

/// Frame `batches` as one IPC stream under `schema`.
///
/// # Errors
///
/// [`IngestError::Encode`] when a batch carries another schema or the
/// writer fails.
pub fn write_stream(schema: &Schema, batches: &[RecordBatch]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut writer = StreamWriter::try_new(&mut buf, schema).map_err(ipc_error("open"))?;
    for batch in batches {
        if batch.schema().as_ref() != schema {
            return Err(IngestError::Encode(
                "ipc write: batch schema differs from stream schema".into(),
            ));
        }
        writer.write(batch).map_err(ipc_error("write"))?;
    }
    writer.finish().map_err(ipc_error("finish"))?;
    drop(writer);
    Ok(buf)
}

/// One batch as a complete IPC stream.
///
/// # Errors
///
/// See [`write_stream`].
pub fn encode_ipc(batch: &RecordBatch) -> Result<Vec<u8>> {
    write_stream(batch.schema().as_ref(), std::slice::from_ref(batch))
}

/// Schema and batches of an IPC stream.
///
/// # Errors
///
/// [`IngestError::Encode`] when `bytes` is not a complete IPC stream.
pub fn decode_ipc(bytes: &[u8]) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let reader = StreamReader::try_new(bytes, None).map_err(ipc_error("open"))?;
    let schema = reader.schema();
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(ipc_error("read"))?;
    Ok((schema, batches))
}

impl RowPayload {
    /// The payload as a single-batch IPC stream.
    ///
    /// # Errors
    ///
    /// Conversion errors from [`RowPayload::to_record_batch`] and
    /// [`IngestError::Encode`] from the writer.
    pub fn to_ipc(&self) -> Result<Vec<u8>> {
        encode_ipc(&self.to_record_batch()?)
    }
}

impl ColumnarPayload {
    /// The payload as a single-batch IPC stream.
    ///
    /// # Errors
    ///
    /// Conversion errors from [`ColumnarPayload::to_record_batch`] and
    /// [`IngestError::Encode`] from the writer.
    pub fn to_ipc(&self) -> Result<Vec<u8>> {
        encode_ipc(&self.to_record_batch()?)
    }
}
