//! Record schema inference and value extraction.
//!
//! A [`Record`] describes its exported fields statically (normally through
//! `#[derive(Record)]`). Inference turns that description into an ordered
//! column schema once per type; extraction then pulls one row per instance.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::annotation::Annotation;
use crate::cell::coerce;
use crate::config::EncoderConfig;
use crate::datum::Datum;
use crate::table::Table;
use crate::types::{
    parse_type_with, ColumnSchema, IngestError, Result, Row, SemanticType, WireType,
};

/// Column type a field gets when its annotation does not name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalType {
    Fixed(WireType),
    /// A point in time; the column type comes from
    /// [`EncoderConfig::instant_type`].
    Instant,
}

impl NaturalType {
    #[must_use]
    pub fn resolve(self, instant_type: WireType) -> WireType {
        match self {
            Self::Fixed(ty) => ty,
            Self::Instant => instant_type,
        }
    }
}

/// Static description of one exported record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field identifier as written in the source.
    pub name: &'static str,
    /// Raw annotation string, empty when the field has none.
    pub annotation: &'static str,
    /// Source type, for error messages.
    pub rust_type: &'static str,
    pub natural_type: Option<NaturalType>,
}

/// A structured type that can be mapped onto a table.
///
/// Implement with `#[derive(Record)]`. Hand-written implementations must
/// return exactly one datum per entry of [`Record::FIELDS`], in order.
pub trait Record {
    /// Type identifier, sanitized into the default table name.
    const TYPE_NAME: &'static str;
    /// Table name used verbatim instead of the type name.
    const TABLE_NAME: Option<&'static str> = None;
    /// Exported fields in declaration order.
    const FIELDS: &'static [FieldDef];

    /// One datum per field of [`Record::FIELDS`].
    fn datums(&self) -> Vec<Datum>;
}

/// A value that can sit in a record field.
pub trait FieldValue {
    /// `None` when the type has no default column type and the field must
    /// carry a `type:` annotation.
    const NATURAL_TYPE: Option<NaturalType>;

    fn to_datum(&self) -> Datum;
}

macro_rules! field_value {
    ($($ty:ty => $natural:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const NATURAL_TYPE: Option<NaturalType> = Some($natural);

                fn to_datum(&self) -> Datum {
                    Datum::from(self)
                }
            }
        )*
    };
}

field_value! {
    bool => NaturalType::Fixed(WireType::Boolean),
    i8 => NaturalType::Fixed(WireType::Int64),
    i16 => NaturalType::Fixed(WireType::Int64),
    i32 => NaturalType::Fixed(WireType::Int64),
    i64 => NaturalType::Fixed(WireType::Int64),
    u8 => NaturalType::Fixed(WireType::UInt64),
    u16 => NaturalType::Fixed(WireType::UInt64),
    u32 => NaturalType::Fixed(WireType::UInt64),
    u64 => NaturalType::Fixed(WireType::UInt64),
    f32 => NaturalType::Fixed(WireType::Float32),
    f64 => NaturalType::Fixed(WireType::Float64),
    String => NaturalType::Fixed(WireType::String),
    Vec<u8> => NaturalType::Fixed(WireType::Binary),
    DateTime<Utc> => NaturalType::Instant,
    NaiveDate => NaturalType::Fixed(WireType::Date),
    serde_json::Value => NaturalType::Fixed(WireType::Json),
}

impl FieldValue for isize {
    const NATURAL_TYPE: Option<NaturalType> = Some(NaturalType::Fixed(WireType::Int64));

    fn to_datum(&self) -> Datum {
        Datum::from(*self)
    }
}

impl FieldValue for usize {
    const NATURAL_TYPE: Option<NaturalType> = Some(NaturalType::Fixed(WireType::UInt64));

    fn to_datum(&self) -> Datum {
        Datum::from(*self)
    }
}

impl FieldValue for &str {
    const NATURAL_TYPE: Option<NaturalType> = Some(NaturalType::Fixed(WireType::String));

    fn to_datum(&self) -> Datum {
        Datum::from(*self)
    }
}

impl FieldValue for &[u8] {
    const NATURAL_TYPE: Option<NaturalType> = Some(NaturalType::Fixed(WireType::Binary));

    fn to_datum(&self) -> Datum {
        Datum::from(*self)
    }
}

impl<const N: usize> FieldValue for [u8; N] {
    const NATURAL_TYPE: Option<NaturalType> = Some(NaturalType::Fixed(WireType::Binary));

    fn to_datum(&self) -> Datum {
        Datum::Bytes(self.to_vec())
    }
}

/// A dynamically typed field; requires a `type:` annotation.
impl FieldValue for Datum {
    const NATURAL_TYPE: Option<NaturalType> = None;

    fn to_datum(&self) -> Datum {
        self.clone()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const NATURAL_TYPE: Option<NaturalType> = T::NATURAL_TYPE;

    fn to_datum(&self) -> Datum {
        self.as_ref().map_or(Datum::Null, FieldValue::to_datum)
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Box<T> {
    const NATURAL_TYPE: Option<NaturalType> = T::NATURAL_TYPE;

    fn to_datum(&self) -> Datum {
        (**self).to_datum()
    }
}

/// Inferred mapping of one record field onto a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub source_field: &'static str,
    /// Position in [`Record::FIELDS`] and [`Record::datums`].
    pub source_index: usize,
    pub column_name: String,
    pub semantic_type: SemanticType,
    pub data_type: WireType,
}

impl FieldDescriptor {
    #[must_use]
    pub fn column_schema(&self) -> ColumnSchema {
        ColumnSchema::new(self.column_name.clone(), self.semantic_type, self.data_type)
    }
}

/// Column schema inferred from a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub type_name: &'static str,
    pub table_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Infer with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`RecordSchema::infer_with`].
    pub fn infer<R: Record>() -> Result<Self> {
        Self::infer_with::<R>(&EncoderConfig::default())
    }

    /// Infer the column schema of `R`.
    ///
    /// Fields annotated with exactly `-` are skipped. Each remaining field
    /// becomes one column, in declaration order.
    ///
    /// # Errors
    ///
    /// [`IngestError::UnsupportedDataType`] when `R` describes no fields,
    /// [`IngestError::UnsupportedType`] for an unknown annotated type or a
    /// field with neither annotation type nor natural type,
    /// [`IngestError::SchemaConflict`] when two fields map to one column,
    /// [`IngestError::MultipleTimestamps`] for a second timestamp field, and
    /// name errors from the sanitizer.
    pub fn infer_with<R: Record>(config: &EncoderConfig) -> Result<Self> {
        if R::FIELDS.is_empty() {
            return Err(IngestError::UnsupportedDataType(format!(
                "{} has no exported fields",
                R::TYPE_NAME
            )));
        }

        let table_name = match R::TABLE_NAME {
            Some(name) => name.to_string(),
            None => config.name(R::TYPE_NAME)?,
        };

        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(R::FIELDS.len());
        for (source_index, def) in R::FIELDS.iter().enumerate() {
            let annotation = Annotation::parse(def.annotation);
            if annotation.is_ignored() {
                continue;
            }

            let column_name = match annotation.column() {
                Some(column) => column.to_string(),
                None => config.name(def.name)?,
            };

            let data_type = match annotation.type_name() {
                Some(name) => parse_type_with(
                    name,
                    annotation.precision().unwrap_or_default(),
                    config.default_precision,
                )?,
                None => def
                    .natural_type
                    .map(|n| n.resolve(config.instant_type))
                    .ok_or_else(|| {
                        IngestError::UnsupportedType(format!(
                            "{}.{}: {}",
                            R::TYPE_NAME,
                            def.name,
                            def.rust_type
                        ))
                    })?,
            };

            let semantic_type = annotation.semantic_type();
            if let Some(first) = fields
                .iter()
                .find(|f| f.column_name == column_name)
            {
                return Err(IngestError::SchemaConflict {
                    column: column_name,
                    expected_role: first.semantic_type,
                    expected_type: first.data_type,
                    found_role: semantic_type,
                    found_type: data_type,
                });
            }
            if semantic_type == SemanticType::Timestamp {
                if let Some(first) = fields
                    .iter()
                    .find(|f| f.semantic_type == SemanticType::Timestamp)
                {
                    return Err(IngestError::MultipleTimestamps {
                        first: first.column_name.clone(),
                        second: column_name,
                    });
                }
            }

            fields.push(FieldDescriptor {
                source_field: def.name,
                source_index,
                column_name,
                semantic_type,
                data_type,
            });
        }

        debug!(
            record = R::TYPE_NAME,
            table = %table_name,
            columns = fields.len(),
            "inferred record schema"
        );
        Ok(Self {
            type_name: R::TYPE_NAME,
            table_name,
            fields,
        })
    }

    #[must_use]
    pub fn columns(&self) -> Vec<ColumnSchema> {
        self.fields.iter().map(FieldDescriptor::column_schema).collect()
    }

    /// Extract one row from `record`.
    ///
    /// # Errors
    ///
    /// [`IngestError::UnsupportedDataType`] when the schema was inferred from
    /// another type, [`IngestError::ArityMismatch`] when the record yields the
    /// wrong number of datums, or the first coercion error.
    pub fn extract<R: Record>(&self, record: &R) -> Result<Row> {
        if self.type_name != R::TYPE_NAME {
            return Err(IngestError::UnsupportedDataType(format!(
                "schema of {} cannot extract {}",
                self.type_name,
                R::TYPE_NAME
            )));
        }

        let datums = record.datums();
        if datums.len() != R::FIELDS.len() {
            return Err(IngestError::ArityMismatch {
                expected: R::FIELDS.len(),
                got: datums.len(),
            });
        }

        let mut slots: Vec<Option<Datum>> = datums.into_iter().map(Some).collect();
        let values = self
            .fields
            .iter()
            .map(|field| {
                let datum = slots
                    .get_mut(field.source_index)
                    .and_then(Option::take)
                    .unwrap_or_default();
                coerce(datum, field.data_type)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Row::new(values))
    }

    /// Extract one row per record, in iteration order. Fails on the first
    /// bad record without returning partial rows.
    ///
    /// # Errors
    ///
    /// See [`RecordSchema::extract`].
    pub fn extract_all<'a, R, I>(&self, records: I) -> Result<Vec<Row>>
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        records.into_iter().map(|r| self.extract(r)).collect()
    }

    /// Extract `records` into a table carrying this schema's final names.
    ///
    /// # Errors
    ///
    /// See [`RecordSchema::extract`].
    pub fn to_table<'a, R, I>(&self, records: I) -> Result<Table>
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let rows = self.extract_all(records)?;
        Ok(Table::from_parts(
            self.table_name.clone(),
            self.columns(),
            rows,
        ))
    }
}
