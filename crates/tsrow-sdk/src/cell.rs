//! Cell coercion: one [`Datum`] plus a target [`WireType`] into a wire
//! [`Value`].
//!
//! Rules, by target:
//!
//! - `BOOLEAN`, `STRING`, `BINARY` require the exact input kind.
//! - Integer targets accept any integer and keep the low bits of its
//!   two's-complement representation (`300` into `INT8` is `44`).
//! - Float targets accept floats only.
//! - Temporal targets accept an instant, or an integer taken as already
//!   expressed in the target unit.
//! - `JSON` accepts a string verbatim and serializes anything else.
//!
//! A [`Datum::Null`] is absent for every target.

use chrono::{DateTime, Utc};

use crate::datum::Datum;
use crate::types::{IngestError, Result, Value, WireType};

const SECONDS_PER_DAY: i64 = 86_400;

/// Coerce `datum` into a value of type `target`. `Ok(None)` is an absent cell.
///
/// # Errors
///
/// [`IngestError::TypeMismatch`] when the input kind cannot become `target`,
/// [`IngestError::Json`] when JSON serialization fails.
pub fn coerce(datum: Datum, target: WireType) -> Result<Option<Value>> {
    if datum.is_null() {
        return Ok(None);
    }

    let value = match target {
        WireType::Boolean => match datum {
            Datum::Bool(v) => Value::Boolean(v),
            other => return Err(IngestError::mismatch(&other, target)),
        },
        WireType::String => match datum {
            Datum::String(v) => Value::String(v),
            other => return Err(IngestError::mismatch(&other, target)),
        },
        WireType::Binary => match datum {
            Datum::Bytes(v) => Value::Binary(v),
            other => return Err(IngestError::mismatch(&other, target)),
        },
        WireType::Int8
        | WireType::Int16
        | WireType::Int32
        | WireType::Int64
        | WireType::UInt8
        | WireType::UInt16
        | WireType::UInt32
        | WireType::UInt64 => {
            let bits = integer_bits(&datum).ok_or_else(|| IngestError::mismatch(&datum, target))?;
            truncate_integer(bits, target)
        }
        WireType::Float32 => match datum {
            #[allow(clippy::cast_possible_truncation)]
            Datum::F64(v) => Value::Float32(v as f32),
            Datum::F32(v) => Value::Float32(v),
            other => return Err(IngestError::mismatch(&other, target)),
        },
        WireType::Float64 => match datum {
            Datum::F64(v) => Value::Float64(v),
            Datum::F32(v) => Value::Float64(f64::from(v)),
            other => return Err(IngestError::mismatch(&other, target)),
        },
        WireType::Date
        | WireType::Datetime
        | WireType::TimestampSecond
        | WireType::TimestampMillisecond
        | WireType::TimestampMicrosecond
        | WireType::TimestampNanosecond => temporal(&datum, target)?,
        WireType::Json => match datum {
            Datum::String(v) => Value::Json(v),
            Datum::Json(v) => Value::Json(v.to_string()),
            other => Value::Json(json_text(&other)?),
        },
    };
    Ok(Some(value))
}

/// Raw 64 bits of any integer datum. Unsigned values are reinterpreted.
#[allow(clippy::cast_possible_wrap)]
fn integer_bits(datum: &Datum) -> Option<i64> {
    let bits = match *datum {
        Datum::I8(v) => i64::from(v),
        Datum::I16(v) => i64::from(v),
        Datum::I32(v) => i64::from(v),
        Datum::I64(v) => v,
        Datum::U8(v) => i64::from(v),
        Datum::U16(v) => i64::from(v),
        Datum::U32(v) => i64::from(v),
        Datum::U64(v) => v as i64,
        _ => return None,
    };
    Some(bits)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn truncate_integer(bits: i64, target: WireType) -> Value {
    match target {
        WireType::Int8 => Value::Int8(bits as i8),
        WireType::Int16 => Value::Int16(bits as i16),
        WireType::Int32 => Value::Int32(bits as i32),
        WireType::UInt8 => Value::UInt8(bits as u8),
        WireType::UInt16 => Value::UInt16(bits as u16),
        WireType::UInt32 => Value::UInt32(bits as u32),
        WireType::UInt64 => Value::UInt64(bits as u64),
        _ => Value::Int64(bits),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn temporal(datum: &Datum, target: WireType) -> Result<Value> {
    if let Datum::Time(t) = datum {
        return instant(t, target).ok_or_else(|| IngestError::mismatch(datum, target));
    }

    let bits = integer_bits(datum).ok_or_else(|| IngestError::mismatch(datum, target))?;
    let value = match target {
        WireType::Date => Value::Date(bits as i32),
        WireType::Datetime => Value::Datetime(bits),
        WireType::TimestampSecond => Value::TimestampSecond(bits),
        WireType::TimestampMicrosecond => Value::TimestampMicrosecond(bits),
        WireType::TimestampNanosecond => Value::TimestampNanosecond(bits),
        _ => Value::TimestampMillisecond(bits),
    };
    Ok(value)
}

/// Epoch offset of `t` in the unit of `target`. `None` when it does not fit.
fn instant(t: &DateTime<Utc>, target: WireType) -> Option<Value> {
    let value = match target {
        WireType::Date => {
            let days = t.timestamp().div_euclid(SECONDS_PER_DAY);
            Value::Date(i32::try_from(days).ok()?)
        }
        WireType::Datetime => Value::Datetime(t.timestamp_millis()),
        WireType::TimestampSecond => Value::TimestampSecond(t.timestamp()),
        WireType::TimestampMicrosecond => Value::TimestampMicrosecond(t.timestamp_micros()),
        WireType::TimestampNanosecond => Value::TimestampNanosecond(t.timestamp_nanos_opt()?),
        _ => Value::TimestampMillisecond(t.timestamp_millis()),
    };
    Some(value)
}

fn json_text(datum: &Datum) -> Result<String> {
    let text = match datum {
        Datum::Null => "null".to_string(),
        Datum::Bool(v) => serde_json::to_string(v)?,
        Datum::I8(v) => serde_json::to_string(v)?,
        Datum::I16(v) => serde_json::to_string(v)?,
        Datum::I32(v) => serde_json::to_string(v)?,
        Datum::I64(v) => serde_json::to_string(v)?,
        Datum::U8(v) => serde_json::to_string(v)?,
        Datum::U16(v) => serde_json::to_string(v)?,
        Datum::U32(v) => serde_json::to_string(v)?,
        Datum::U64(v) => serde_json::to_string(v)?,
        Datum::F32(v) => serde_json::to_string(v)?,
        Datum::F64(v) => serde_json::to_string(v)?,
        Datum::String(v) => serde_json::to_string(v)?,
        Datum::Bytes(v) => serde_json::to_string(v)?,
        Datum::Time(v) => serde_json::to_string(v)?,
        Datum::Json(v) => v.to_string(),
    };
    Ok(text)
}
