//! Wire payload assembly.
//!
//! Two payload shapes leave this crate: [`RowPayload`] (column schema plus
//! rows, from tables and records) and [`ColumnarPayload`] (one value vector
//! and null mask per column, from metrics).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::coerce;
use crate::config::EncoderConfig;
use crate::datum::Datum;
use crate::metric::{Metric, Series};
use crate::record::{Record, RecordSchema};
use crate::table::Table;
use crate::types::mask::bit_is_set;
use crate::types::{
    sanitize_name, ColumnSchema, IngestError, NullMask, Result, Row, SemanticType, Value,
    WireType,
};

/// Row-oriented payload for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPayload {
    pub table_name: String,
    pub columns: Vec<ColumnSchema>,
    pub rows: Vec<Row>,
}

impl RowPayload {
    /// Assemble a manually built table.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyTable`] when the table has no columns or no rows,
    /// and name errors when the table name is rejected by the sanitizer.
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.is_column_empty() || table.is_row_empty() {
            return Err(IngestError::EmptyTable(table.name().to_string()));
        }
        let table_name = if table.sanitize() {
            sanitize_name(table.name())?
        } else {
            table.name().to_string()
        };

        debug!(
            table = %table_name,
            columns = table.columns().len(),
            rows = table.rows().len(),
            "assembled row payload"
        );
        Ok(Self {
            table_name,
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
        })
    }

    /// Infer, extract and assemble a single record.
    ///
    /// # Errors
    ///
    /// Inference and extraction errors, see [`RecordSchema`].
    pub fn from_record<R: Record>(record: &R) -> Result<Self> {
        Self::from_records(std::slice::from_ref(record))
    }

    /// Infer, extract and assemble a homogeneous collection, one row per
    /// element.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyTable`] for an empty collection, plus inference
    /// and extraction errors.
    pub fn from_records<R: Record>(records: &[R]) -> Result<Self> {
        let schema = RecordSchema::infer::<R>()?;
        Self::from_schema(&schema, records)
    }

    /// Like [`RowPayload::from_record`], failing on an absent record.
    ///
    /// # Errors
    ///
    /// [`IngestError::NilInput`] for `None`.
    pub fn from_optional_record<R: Record>(record: Option<&R>) -> Result<Self> {
        Self::from_record(record.ok_or(IngestError::NilInput)?)
    }

    /// Extract `records` with an already inferred schema.
    ///
    /// # Errors
    ///
    /// Extraction errors and [`IngestError::EmptyTable`] when `records` is
    /// empty.
    pub fn from_schema<R: Record>(schema: &RecordSchema, records: &[R]) -> Result<Self> {
        Self::from_table(&schema.to_table(records)?)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One column of a [`ColumnarPayload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub semantic_type: SemanticType,
    pub data_type: WireType,
    /// Present values only, in row order.
    pub values: Vec<Value>,
    /// Bit `i` set when row `i` has no value. Exactly `ceil(rows / 8)` bytes.
    pub null_mask: Vec<u8>,
}

impl Column {
    /// Value of row `idx`, `None` when the row lacks one.
    #[must_use]
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        if bit_is_set(&self.null_mask, idx) {
            return None;
        }
        let position = (0..idx).filter(|i| !bit_is_set(&self.null_mask, *i)).count();
        self.values.get(position)
    }

    /// Row indices marked absent, up to `rows`.
    #[must_use]
    pub fn null_rows(&self, rows: usize) -> Vec<usize> {
        (0..rows).filter(|i| bit_is_set(&self.null_mask, *i)).collect()
    }
}

/// Column-oriented payload for one table, built from a [`Metric`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnarPayload {
    pub table_name: String,
    /// Tag and field columns in order of first appearance, then the
    /// timestamp column.
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl ColumnarPayload {
    /// Assemble a metric into columns. The table name is sanitized.
    ///
    /// # Errors
    ///
    /// [`IngestError::NoSeriesInMetric`] when no series were added, name
    /// errors for the table name, and [`IngestError::TypeMismatch`] when a
    /// series timestamp does not fit the metric precision.
    pub fn from_metric(metric: &Metric, table_name: &str) -> Result<Self> {
        Self::from_metric_with(metric, table_name, &EncoderConfig::default())
    }

    /// Like [`ColumnarPayload::from_metric`], resolving the table name under
    /// `config`.
    ///
    /// # Errors
    ///
    /// See [`ColumnarPayload::from_metric`].
    pub fn from_metric_with(
        metric: &Metric,
        table_name: &str,
        config: &EncoderConfig,
    ) -> Result<Self> {
        if metric.is_empty() {
            return Err(IngestError::NoSeriesInMetric);
        }
        let table_name = config.name(table_name)?;
        let rows = metric.len();

        let mut columns = Vec::with_capacity(metric.column_names().len() + 1);
        for name in metric.column_names() {
            let Some(schema) = metric.column(name) else {
                continue;
            };
            let (values, null_mask) =
                gather(metric, |series| Ok(series.get(name).map(|v| v.value.clone())))?;
            columns.push(Column {
                name: name.clone(),
                semantic_type: schema.semantic_type,
                data_type: schema.data_type,
                values,
                null_mask,
            });
        }

        let ts_type = metric.precision().timestamp_type();
        let (values, null_mask) =
            gather(metric, |series| coerce(Datum::Time(series.timestamp()), ts_type))?;
        columns.push(Column {
            name: metric.timestamp_alias().to_string(),
            semantic_type: SemanticType::Timestamp,
            data_type: ts_type,
            values,
            null_mask,
        });

        debug!(
            table = %table_name,
            columns = columns.len(),
            rows,
            "assembled columnar payload"
        );
        Ok(Self {
            table_name,
            columns,
            row_count: rows,
        })
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Present values of one column in row order, plus its null mask.
fn gather(
    metric: &Metric,
    cell: impl Fn(&Series) -> Result<Option<Value>>,
) -> Result<(Vec<Value>, Vec<u8>)> {
    let mut values = Vec::with_capacity(metric.len());
    let mut mask = NullMask::new();
    for (idx, series) in metric.series().iter().enumerate() {
        match cell(series)? {
            Some(value) => values.push(value),
            None => mask.set(idx),
        }
    }
    Ok((values, mask.shrink(metric.len())))
}
