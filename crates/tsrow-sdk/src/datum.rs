//! Dynamic input values.
//!
//! A [`Datum`] is what callers hand to the table builder, series and record
//! extraction before the value has been matched against a column type. It is
//! deliberately loose: any integer may later land in any integer column, an
//! instant may land in any temporal column, and so on. See
//! [`crate::cell::coerce`] for the rules.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::types::{Result, WireType};

/// Untyped input value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Datum {
    /// Absent value. Coerces to an absent cell for every column type.
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// A point in time.
    Time(DateTime<Utc>),
    /// An already parsed JSON document.
    Json(serde_json::Value),
}

impl Datum {
    /// Marshal any serializable value into a [`Datum::Json`].
    ///
    /// # Errors
    ///
    /// [`crate::types::IngestError::Json`] when serialization fails.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The column type a value of this kind gets when nothing else is known.
    ///
    /// Signed integers widen to `INT64`, unsigned to `UINT64`, and instants
    /// take `instant_type`. `Null` has no natural type.
    #[must_use]
    pub fn natural_type(&self, instant_type: WireType) -> Option<WireType> {
        let ty = match self {
            Self::Null => return None,
            Self::Bool(_) => WireType::Boolean,
            Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) => WireType::Int64,
            Self::U8(_) | Self::U16(_) | Self::U32(_) | Self::U64(_) => WireType::UInt64,
            Self::F32(_) => WireType::Float32,
            Self::F64(_) => WireType::Float64,
            Self::String(_) => WireType::String,
            Self::Bytes(_) => WireType::Binary,
            Self::Time(_) => instant_type,
            Self::Json(_) => WireType::Json,
        };
        Some(ty)
    }
}

macro_rules! datum_from_copy {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Datum {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl From<&$ty> for Datum {
                fn from(v: &$ty) -> Self {
                    Self::$variant(*v)
                }
            }
        )*
    };
}

datum_from_copy! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    DateTime<Utc> => Time,
}

impl From<isize> for Datum {
    fn from(v: isize) -> Self {
        Self::I64(v as i64)
    }
}

impl From<usize> for Datum {
    fn from(v: usize) -> Self {
        Self::U64(v as u64)
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for Datum {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for Datum {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&Vec<u8>> for Datum {
    fn from(v: &Vec<u8>) -> Self {
        Self::Bytes(v.clone())
    }
}

impl From<&[u8]> for Datum {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

/// A calendar date is carried as its midnight instant (UTC).
impl From<NaiveDate> for Datum {
    fn from(v: NaiveDate) -> Self {
        Self::Time(v.and_time(NaiveTime::default()).and_utc())
    }
}

impl From<&NaiveDate> for Datum {
    fn from(v: &NaiveDate) -> Self {
        Self::from(*v)
    }
}

impl From<serde_json::Value> for Datum {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<&serde_json::Value> for Datum {
    fn from(v: &serde_json::Value) -> Self {
        Self::Json(v.clone())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build a `Vec<Datum>` from heterogeneous values, for [`crate::table::Table::add_row`].
///
/// ```
/// use tsrow_sdk::{row, Datum};
///
/// let values = row![1i64, "host-a", None::<f64>];
/// assert_eq!(values[2], Datum::Null);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        ::std::vec::Vec::<$crate::Datum>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Datum::from($value)),+]
    };
}
