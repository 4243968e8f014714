//! Conversion from wire types to arrow crate `DataType`s.

use arrow::datatypes::{DataType, TimeUnit};

use crate::types::WireType;

/// Arrow type carrying values of `wire` type.
///
/// `DATE` is days (`Date32`), `DATETIME` milliseconds (`Date64`) and `JSON`
/// travels as `Utf8`.
#[must_use]
pub fn arrow_data_type(wire: WireType) -> DataType {
    match wire {
        WireType::Boolean => DataType::Boolean,
        WireType::Int8 => DataType::Int8,
        WireType::Int16 => DataType::Int16,
        WireType::Int32 => DataType::Int32,
        WireType::Int64 => DataType::Int64,
        WireType::UInt8 => DataType::UInt8,
        WireType::UInt16 => DataType::UInt16,
        WireType::UInt32 => DataType::UInt32,
        WireType::UInt64 => DataType::UInt64,
        WireType::Float32 => DataType::Float32,
        WireType::Float64 => DataType::Float64,
        WireType::Binary => DataType::Binary,
        WireType::String | WireType::Json => DataType::Utf8,
        WireType::Date => DataType::Date32,
        WireType::Datetime => DataType::Date64,
        WireType::TimestampSecond => DataType::Timestamp(TimeUnit::Second, None),
        WireType::TimestampMillisecond => DataType::Timestamp(TimeUnit::Millisecond, None),
        WireType::TimestampMicrosecond => DataType::Timestamp(TimeUnit::Microsecond, None),
        WireType::TimestampNanosecond => DataType::Timestamp(TimeUnit::Nanosecond, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_scalar_types() {
        assert_eq!(arrow_data_type(WireType::Boolean), DataType::Boolean);
        assert_eq!(arrow_data_type(WireType::Int16), DataType::Int16);
        assert_eq!(arrow_data_type(WireType::UInt64), DataType::UInt64);
        assert_eq!(arrow_data_type(WireType::Float32), DataType::Float32);
        assert_eq!(arrow_data_type(WireType::Binary), DataType::Binary);
        assert_eq!(arrow_data_type(WireType::String), DataType::Utf8);
    }

    #[test]
    fn maps_temporal_types() {
        assert_eq!(arrow_data_type(WireType::Date), DataType::Date32);
        assert_eq!(arrow_data_type(WireType::Datetime), DataType::Date64);
        assert_eq!(
            arrow_data_type(WireType::TimestampSecond),
            DataType::Timestamp(TimeUnit::Second, None)
        );
        assert_eq!(
            arrow_data_type(WireType::TimestampNanosecond),
            DataType::Timestamp(TimeUnit::Nanosecond, None)
        );
    }

    #[test]
    fn json_maps_to_utf8() {
        assert_eq!(arrow_data_type(WireType::Json), DataType::Utf8);
    }
}
