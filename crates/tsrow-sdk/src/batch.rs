//! Multi-table insert batches and the transport boundary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::payload::{ColumnarPayload, RowPayload};
use crate::types::{IngestError, Result};

/// One table of an insert batch, in either payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TablePayload {
    Rows(RowPayload),
    Columns(ColumnarPayload),
}

impl TablePayload {
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            Self::Rows(p) => &p.table_name,
            Self::Columns(p) => &p.table_name,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows(p) => p.row_count(),
            Self::Columns(p) => p.row_count,
        }
    }
}

impl From<RowPayload> for TablePayload {
    fn from(p: RowPayload) -> Self {
        Self::Rows(p)
    }
}

impl From<ColumnarPayload> for TablePayload {
    fn from(p: ColumnarPayload) -> Self {
        Self::Columns(p)
    }
}

/// Tables bundled into one insert request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertBatch {
    tables: Vec<TablePayload>,
}

impl InsertBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: impl Into<TablePayload>) -> &mut Self {
        self.tables.push(table.into());
        self
    }

    #[must_use]
    pub fn tables(&self) -> &[TablePayload] {
        &self.tables
    }

    /// Rows across all tables.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(TablePayload::row_count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Seal the batch for sending.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyTables`] when no table was added.
    pub fn finish(self) -> Result<Self> {
        if self.tables.is_empty() {
            return Err(IngestError::EmptyTables);
        }
        debug!(
            tables = self.tables.len(),
            rows = self.row_count(),
            "insert batch ready"
        );
        Ok(self)
    }

    /// Finish the batch and hand it to `transport`.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyTables`] converted into the transport's error, or
    /// whatever the transport reports.
    pub fn send<T: Transport>(self, transport: &T) -> std::result::Result<u32, T::Error> {
        let batch = self.finish()?;
        transport.send(&batch)
    }
}

/// Boundary to the network layer that delivers insert batches.
///
/// Implementors own connection handling, request headers (database,
/// credentials) and retries. Payloads are forwarded unchanged.
pub trait Transport {
    type Error: std::error::Error + From<IngestError>;

    /// Deliver `batch`, returning the number of rows the server accepted.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn send(&self, batch: &InsertBatch) -> std::result::Result<u32, Self::Error>;
}
