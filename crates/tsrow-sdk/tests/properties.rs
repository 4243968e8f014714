use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use tsrow_sdk::prelude::*;
use tsrow_sdk::{coerce, Datum};

fn wire_type() -> impl Strategy<Value = WireType> {
    prop::sample::select(WireType::ALL.to_vec())
}

proptest! {
    #[test]
    fn null_is_absent_for_every_type(target in wire_type()) {
        prop_assert_eq!(coerce(Datum::Null, target).unwrap(), None);
    }

    #[test]
    fn integers_truncate_to_column_width(v in any::<i64>()) {
        prop_assert_eq!(coerce(Datum::I64(v), WireType::Int8).unwrap(), Some(Value::Int8(v as i8)));
        prop_assert_eq!(coerce(Datum::I64(v), WireType::Int32).unwrap(), Some(Value::Int32(v as i32)));
        prop_assert_eq!(coerce(Datum::I64(v), WireType::UInt16).unwrap(), Some(Value::UInt16(v as u16)));
    }

    #[test]
    fn integers_within_width_round_trip(v in any::<i16>()) {
        prop_assert_eq!(
            coerce(Datum::I16(v), WireType::Int64).unwrap(),
            Some(Value::Int64(i64::from(v)))
        );
    }

    #[test]
    fn instant_matches_integer_millis(ms in -4_000_000_000_000i64..4_000_000_000_000i64) {
        let instant = Utc.timestamp_millis_opt(ms).unwrap();
        prop_assert_eq!(
            coerce(Datum::Time(instant), WireType::TimestampMillisecond).unwrap(),
            coerce(Datum::I64(instant.timestamp_millis()), WireType::TimestampMillisecond).unwrap()
        );
    }

    #[test]
    fn table_accepts_only_matching_arity(columns in 1usize..8, extra in 1usize..3) {
        let mut table = Table::new("t");
        for i in 0..columns {
            table.add_field_column(&format!("c{i}"), WireType::Int64).unwrap();
        }
        let row_of = |n: usize| (0..n).map(|i| Datum::from(i as i64)).collect::<Vec<_>>();

        let short = table.add_row(row_of(columns - 1)).is_err();
        let long = table.add_row(row_of(columns + extra)).is_err();
        prop_assert!(short);
        prop_assert!(long);
        prop_assert!(table.add_row(row_of(columns)).is_ok());
        prop_assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn disjoint_columns_never_conflict(kinds in prop::collection::vec(0u8..4, 1..12)) {
        let mut metric = Metric::new();
        for (i, kind) in kinds.iter().enumerate() {
            let mut series = Series::at(Utc.timestamp_opt(i as i64, 0).unwrap());
            let name = format!("col_{i}");
            match kind {
                0 => series.add(&name, i as i64),
                1 => series.add(&name, format!("v{i}")),
                2 => series.add_tag(&name, true),
                _ => series.add(&name, 0.5f64),
            }
            .unwrap();
            prop_assert!(metric.add_series(series).is_ok());
        }
        prop_assert_eq!(metric.column_names().len(), kinds.len());
    }

    #[test]
    fn masks_mark_missing_rows(present in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut metric = Metric::new();
        for (i, has_x) in present.iter().enumerate() {
            let mut series = Series::at(Utc.timestamp_opt(i as i64, 0).unwrap());
            series.add_tag("host", "h").unwrap();
            if *has_x {
                series.add("x", i as i64).unwrap();
            }
            metric.add_series(series).unwrap();
        }
        prop_assume!(present.iter().any(|p| *p));

        let payload = ColumnarPayload::from_metric(&metric, "m").unwrap();
        let x = payload.column("x").unwrap();
        let expected: Vec<usize> = present
            .iter()
            .enumerate()
            .filter(|(_, p)| !**p)
            .map(|(i, _)| i)
            .collect();

        prop_assert_eq!(x.null_mask.len(), present.len().div_ceil(8));
        prop_assert_eq!(x.null_rows(present.len()), expected);
        prop_assert_eq!(x.values.len(), present.iter().filter(|p| **p).count());
    }
}
