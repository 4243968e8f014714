//! Arrow schema construction from column definitions.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{Field, Schema};

use super::types::arrow_data_type;
use crate::types::{ColumnSchema, SemanticType, WireType};

/// Field metadata key holding the column's semantic type (`TAG`, `FIELD`,
/// `TIMESTAMP`).
pub const SEMANTIC_TYPE_KEY: &str = "tsrow:semantic_type";

/// Build an Arrow Schema from column definitions. Every field is nullable.
#[must_use]
pub fn build_arrow_schema(columns: &[ColumnSchema]) -> Arc<Schema> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|col| arrow_field(&col.name, col.semantic_type, col.data_type))
        .collect();
    Arc::new(Schema::new(fields))
}

pub(crate) fn arrow_field(name: &str, semantic_type: SemanticType, data_type: WireType) -> Field {
    Field::new(name, arrow_data_type(data_type), true).with_metadata(HashMap::from([(
        SEMANTIC_TYPE_KEY.to_string(),
        semantic_type.as_str().to_string(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, TimeUnit};

    #[test]
    fn builds_schema_from_column_schemas() {
        let columns = vec![
            ColumnSchema::new("host", SemanticType::Tag, WireType::String),
            ColumnSchema::new("usage", SemanticType::Field, WireType::Float64),
            ColumnSchema::new("ts", SemanticType::Timestamp, WireType::TimestampMicrosecond),
        ];

        let schema = build_arrow_schema(&columns);
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field(0).name(), "host");
        assert_eq!(*schema.field(0).data_type(), DataType::Utf8);
        assert!(schema.field(0).is_nullable());
        assert_eq!(
            schema.field(0).metadata().get(SEMANTIC_TYPE_KEY).map(String::as_str),
            Some("TAG")
        );
        assert_eq!(
            *schema.field(2).data_type(),
            DataType::Timestamp(TimeUnit::Microsecond, None)
        );
        assert_eq!(
            schema.field(2).metadata().get(SEMANTIC_TYPE_KEY).map(String::as_str),
            Some("TIMESTAMP")
        );
    }

    #[test]
    fn empty_columns_produces_empty_schema() {
        let schema = build_arrow_schema(&[]);
        assert_eq!(schema.fields().len(), 0);
    }
}
