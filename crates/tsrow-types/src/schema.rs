//! Column schema and row types.

use serde::{Deserialize, Serialize};

use crate::value::Value;
use crate::wire::{SemanticType, WireType};

/// Column definition within a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name, already sanitized unless the table opted out.
    pub name: String,
    /// Role of the column.
    pub semantic_type: SemanticType,
    /// Wire data type.
    pub data_type: WireType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType, data_type: WireType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            data_type,
        }
    }
}

/// One row of a table: one cell per column, `None` for absent cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Option<Value>>,
}

impl Row {
    #[must_use]
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell at `idx`, `None` when absent or out of range.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx).and_then(Option::as_ref)
    }
}

impl From<Vec<Option<Value>>> for Row {
    fn from(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }
}
