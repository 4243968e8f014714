//! Configured encoder with a schema cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::SchemaCache;
use crate::config::EncoderConfig;
use crate::metric::{Metric, Series};
use crate::payload::{ColumnarPayload, RowPayload};
use crate::record::{Record, RecordSchema};
use crate::table::Table;
use crate::types::{IngestError, Result};

/// Entry point that applies one [`EncoderConfig`] to every payload it builds
/// and infers each record type's schema only once.
///
/// Shareable between threads.
#[derive(Debug, Default)]
pub struct Encoder {
    config: EncoderConfig,
    cache: SchemaCache,
}

impl Encoder {
    /// # Errors
    ///
    /// [`IngestError::Config`] when `config` fails validation.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: SchemaCache::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Cached schema of `R`.
    ///
    /// # Errors
    ///
    /// See [`RecordSchema::infer_with`].
    pub fn schema<R: Record + 'static>(&self) -> Result<Arc<RecordSchema>> {
        self.cache.get_or_infer::<R>(&self.config)
    }

    /// A new table builder that follows the configured sanitize policy.
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::new(name).with_sanitize(self.config.sanitize_names)
    }

    /// A new metric with the configured timestamp alias and precision.
    ///
    /// # Errors
    ///
    /// Name errors for the configured alias.
    pub fn metric(&self) -> Result<Metric> {
        Metric::with_config(&self.config)
    }

    /// A new series that follows the configured name policy and instant
    /// type.
    #[must_use]
    pub fn series(&self, timestamp: DateTime<Utc>) -> Series {
        Series::with_config(timestamp, &self.config)
    }

    /// # Errors
    ///
    /// See [`RowPayload::from_table`].
    pub fn encode_table(&self, table: &Table) -> Result<RowPayload> {
        RowPayload::from_table(table)
    }

    /// # Errors
    ///
    /// Inference, extraction and assembly errors.
    pub fn encode_record<R: Record + 'static>(&self, record: &R) -> Result<RowPayload> {
        self.encode_records(std::slice::from_ref(record))
    }

    /// # Errors
    ///
    /// Inference, extraction and assembly errors.
    pub fn encode_records<R: Record + 'static>(&self, records: &[R]) -> Result<RowPayload> {
        let schema = self.schema::<R>()?;
        RowPayload::from_schema(&schema, records)
    }

    /// # Errors
    ///
    /// [`IngestError::NilInput`] for `None`, otherwise as
    /// [`Encoder::encode_record`].
    pub fn encode_optional_record<R: Record + 'static>(
        &self,
        record: Option<&R>,
    ) -> Result<RowPayload> {
        self.encode_record(record.ok_or(IngestError::NilInput)?)
    }

    /// # Errors
    ///
    /// See [`ColumnarPayload::from_metric`].
    pub fn encode_metric(&self, metric: &Metric, table_name: &str) -> Result<ColumnarPayload> {
        ColumnarPayload::from_metric_with(metric, table_name, &self.config)
    }
}
