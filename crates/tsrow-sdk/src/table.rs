//! Manual table builder.
//!
//! Columns are declared up front, then rows of raw [`Datum`]s are coerced
//! against them one cell at a time.

use tracing::debug;

use crate::cell::coerce;
use crate::datum::Datum;
use crate::types::{
    sanitize_name, ColumnSchema, IngestError, Result, Row, SemanticType, WireType,
};

/// A table under construction: name, ordered columns and coerced rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<ColumnSchema>,
    rows: Vec<Row>,
    sanitize: bool,
}

impl Table {
    /// Start an empty table. The name is sanitized when the table is
    /// assembled into a payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            sanitize: true,
        }
    }

    /// Toggle name sanitization. When disabled, table and column names are
    /// only trimmed.
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// A table whose names are already final and whose rows are already
    /// coerced.
    pub(crate) fn from_parts(name: String, columns: Vec<ColumnSchema>, rows: Vec<Row>) -> Self {
        Self {
            name,
            columns,
            rows,
            sanitize: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn sanitize(&self) -> bool {
        self.sanitize
    }

    /// Declare a column. Duplicate names are not detected. With
    /// sanitization off the name is only trimmed.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyName`] or [`IngestError::NameTooLong`] when the name
    /// is rejected by the sanitizer.
    pub fn add_column(
        &mut self,
        name: &str,
        semantic_type: SemanticType,
        data_type: WireType,
    ) -> Result<&mut Self> {
        let name = if self.sanitize {
            sanitize_name(name)?
        } else {
            name.trim().to_string()
        };
        self.columns.push(ColumnSchema::new(name, semantic_type, data_type));
        Ok(self)
    }

    /// Declare a tag column.
    ///
    /// # Errors
    ///
    /// See [`Table::add_column`].
    pub fn add_tag_column(&mut self, name: &str, data_type: WireType) -> Result<&mut Self> {
        self.add_column(name, SemanticType::Tag, data_type)
    }

    /// Declare a field column.
    ///
    /// # Errors
    ///
    /// See [`Table::add_column`].
    pub fn add_field_column(&mut self, name: &str, data_type: WireType) -> Result<&mut Self> {
        self.add_column(name, SemanticType::Field, data_type)
    }

    /// Declare the time index column.
    ///
    /// # Errors
    ///
    /// See [`Table::add_column`].
    pub fn add_timestamp_column(&mut self, name: &str, data_type: WireType) -> Result<&mut Self> {
        self.add_column(name, SemanticType::Timestamp, data_type)
    }

    /// Append one row, one value per declared column in declaration order.
    ///
    /// The row is either appended whole or not at all.
    ///
    /// # Errors
    ///
    /// [`IngestError::EmptyColumn`] before any column is declared,
    /// [`IngestError::ArityMismatch`] when the width differs from the column
    /// count, or the coercion error of the first bad cell.
    pub fn add_row(&mut self, values: Vec<Datum>) -> Result<&mut Self> {
        if self.columns.is_empty() {
            return Err(IngestError::EmptyColumn);
        }
        if values.len() != self.columns.len() {
            debug!(
                table = %self.name,
                expected = self.columns.len(),
                got = values.len(),
                "row rejected"
            );
            return Err(IngestError::ArityMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let cells = values
            .into_iter()
            .zip(&self.columns)
            .map(|(value, col)| coerce(value, col.data_type))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| debug!(table = %self.name, error = %e, "row rejected"))?;

        self.rows.push(Row::new(cells));
        Ok(self)
    }

    #[must_use]
    pub fn is_column_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn is_row_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// No columns and no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_column_empty() && self.is_row_empty()
    }
}
