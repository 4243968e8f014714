//! `RecordBatch` construction from assembled payloads.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryBuilder, BooleanBuilder, Date32Builder, Date64Builder, Float32Builder,
    Float64Builder, Int16Builder, Int32Builder, Int64Builder, Int8Builder, StringBuilder,
    TimestampMicrosecondBuilder, TimestampMillisecondBuilder, TimestampNanosecondBuilder,
    TimestampSecondBuilder, UInt16Builder, UInt32Builder, UInt64Builder, UInt8Builder,
};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use super::schema::{arrow_field, build_arrow_schema};
use crate::payload::{Column, ColumnarPayload, RowPayload};
use crate::types::mask::bit_is_set;
use crate::types::{IngestError, Result, Value, WireType};

impl RowPayload {
    /// Convert into one Arrow record batch, one array per column.
    ///
    /// # Errors
    ///
    /// [`IngestError::TypeMismatch`] when a cell does not match its column
    /// type, [`IngestError::Encode`] when Arrow rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = build_arrow_schema(&self.columns);
        let arrays = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| build_array(col.data_type, self.rows.iter().map(|r| r.get(idx))))
            .collect::<Result<Vec<_>>>()?;
        RecordBatch::try_new(schema, arrays)
            .map_err(|e| IngestError::Encode(format!("record batch for {}: {e}", self.table_name)))
    }
}

impl ColumnarPayload {
    /// Convert into one Arrow record batch, expanding null masks into Arrow
    /// validity.
    ///
    /// # Errors
    ///
    /// [`IngestError::TypeMismatch`] when a value does not match its column
    /// type, [`IngestError::Encode`] when Arrow rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<_> = self
            .columns
            .iter()
            .map(|c| arrow_field(&c.name, c.semantic_type, c.data_type))
            .collect();
        let arrays = self
            .columns
            .iter()
            .map(|c| build_array(c.data_type, cells(c, self.row_count)))
            .collect::<Result<Vec<_>>>()?;
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .map_err(|e| IngestError::Encode(format!("record batch for {}: {e}", self.table_name)))
    }
}

/// Row-ordered cells of a columnar column.
fn cells(column: &Column, rows: usize) -> impl Iterator<Item = Option<&Value>> {
    let mut present = column.values.iter();
    (0..rows).map(move |idx| {
        if bit_is_set(&column.null_mask, idx) {
            None
        } else {
            present.next()
        }
    })
}

macro_rules! build {
    ($builder:expr, $cells:expr, $target:expr, $variant:ident, $v:ident => $append:expr) => {{
        let mut builder = $builder;
        for cell in $cells {
            match cell {
                None => builder.append_null(),
                Some(Value::$variant($v)) => builder.append_value($append),
                Some(other) => return Err(IngestError::mismatch(other, $target)),
            }
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

fn build_array<'a>(
    target: WireType,
    cells: impl Iterator<Item = Option<&'a Value>>,
) -> Result<ArrayRef> {
    let array = match target {
        WireType::Boolean => build!(BooleanBuilder::new(), cells, target, Boolean, v => *v),
        WireType::Int8 => build!(Int8Builder::new(), cells, target, Int8, v => *v),
        WireType::Int16 => build!(Int16Builder::new(), cells, target, Int16, v => *v),
        WireType::Int32 => build!(Int32Builder::new(), cells, target, Int32, v => *v),
        WireType::Int64 => build!(Int64Builder::new(), cells, target, Int64, v => *v),
        WireType::UInt8 => build!(UInt8Builder::new(), cells, target, UInt8, v => *v),
        WireType::UInt16 => build!(UInt16Builder::new(), cells, target, UInt16, v => *v),
        WireType::UInt32 => build!(UInt32Builder::new(), cells, target, UInt32, v => *v),
        WireType::UInt64 => build!(UInt64Builder::new(), cells, target, UInt64, v => *v),
        WireType::Float32 => build!(Float32Builder::new(), cells, target, Float32, v => *v),
        WireType::Float64 => build!(Float64Builder::new(), cells, target, Float64, v => *v),
        WireType::Binary => build!(BinaryBuilder::new(), cells, target, Binary, v => v),
        WireType::String => build!(StringBuilder::new(), cells, target, String, v => v),
        WireType::Json => build!(StringBuilder::new(), cells, target, Json, v => v),
        WireType::Date => build!(Date32Builder::new(), cells, target, Date, v => *v),
        WireType::Datetime => build!(Date64Builder::new(), cells, target, Datetime, v => *v),
        WireType::TimestampSecond => {
            build!(TimestampSecondBuilder::new(), cells, target, TimestampSecond, v => *v)
        }
        WireType::TimestampMillisecond => {
            build!(TimestampMillisecondBuilder::new(), cells, target, TimestampMillisecond, v => *v)
        }
        WireType::TimestampMicrosecond => {
            build!(TimestampMicrosecondBuilder::new(), cells, target, TimestampMicrosecond, v => *v)
        }
        WireType::TimestampNanosecond => {
            build!(TimestampNanosecondBuilder::new(), cells, target, TimestampNanosecond, v => *v)
        }
    };
    Ok(array)
}
