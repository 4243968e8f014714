//! End-to-end ingestion flows: records, manual tables and metrics assembled
//! into payloads and sent through a transport.

use std::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use tsrow_sdk::prelude::*;
use tsrow_sdk::types::Value;

fn at_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

#[derive(Record)]
struct User {
    #[tsrow("tag")]
    pub id: i64,
    pub name: String,
    #[tsrow("timestamp")]
    pub at: DateTime<Utc>,
}

#[test]
fn records_become_rows() {
    let users = [
        User { id: 1, name: "a".into(), at: at_ms(1_000) },
        User { id: 2, name: "b".into(), at: at_ms(2_000) },
    ];
    let payload = RowPayload::from_records(&users).unwrap();

    assert_eq!(payload.table_name, "user");
    assert_eq!(
        payload.columns,
        vec![
            ColumnSchema::new("id", SemanticType::Tag, WireType::Int64),
            ColumnSchema::new("name", SemanticType::Field, WireType::String),
            ColumnSchema::new("at", SemanticType::Timestamp, WireType::TimestampMillisecond),
        ]
    );
    assert_eq!(
        payload.rows[0].values,
        vec![
            Some(Value::Int64(1)),
            Some(Value::String("a".into())),
            Some(Value::TimestampMillisecond(1_000)),
        ]
    );
    assert_eq!(payload.rows[1].get(2), Some(&Value::TimestampMillisecond(2_000)));
}

#[test]
fn empty_record_collection_is_rejected() {
    let users: [User; 0] = [];
    assert!(matches!(
        RowPayload::from_records(&users),
        Err(IngestError::EmptyTable(_))
    ));
}

#[test]
fn manual_table_with_null_cell() {
    let mut table = Table::new("Weather Station");
    table.add_field_column("temp", WireType::Float64).unwrap();
    table.add_row(row![23.5f64]).unwrap();
    table.add_row(row![None::<f64>]).unwrap();

    let payload = RowPayload::from_table(&table).unwrap();
    assert_eq!(payload.table_name, "weather_station");
    assert_eq!(payload.rows[0].get(0), Some(&Value::Float64(23.5)));
    assert_eq!(payload.rows[1].get(0), None);
}

#[test]
fn rejected_row_leaves_table_unchanged() {
    let mut table = Table::new("t");
    table
        .add_tag_column("host", WireType::String)
        .unwrap()
        .add_field_column("v", WireType::Int32)
        .unwrap();
    table.add_row(row!["a", 1i64]).unwrap();

    assert!(matches!(
        table.add_row(row!["b"]),
        Err(IngestError::ArityMismatch { expected: 2, got: 1 })
    ));
    assert!(matches!(
        table.add_row(row![1i64, 1i64]),
        Err(IngestError::TypeMismatch { target: WireType::String, .. })
    ));
    assert_eq!(table.rows().len(), 1);
}

#[test]
fn sparse_series_merge_into_columns() {
    let mut metric = Metric::new();
    let mut s1 = Series::at(at_ms(1));
    s1.add("x", 1i64).unwrap();
    let mut s2 = Series::at(at_ms(2));
    s2.add("y", "s").unwrap();
    let mut s3 = Series::at(at_ms(3));
    s3.add("x", 2i64).unwrap();
    for s in [s1, s2, s3] {
        metric.add_series(s).unwrap();
    }

    let payload = ColumnarPayload::from_metric(&metric, "m").unwrap();
    let names: Vec<&str> = payload.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["x", "y", "ts"]);
    assert_eq!(payload.row_count, 3);

    let x = payload.column("x").unwrap();
    assert_eq!(x.data_type, WireType::Int64);
    assert_eq!(x.null_rows(3), [1]);
    assert_eq!(x.values, [Value::Int64(1), Value::Int64(2)]);

    let y = payload.column("y").unwrap();
    assert_eq!(y.data_type, WireType::String);
    assert_eq!(y.null_rows(3), [0, 2]);
    assert_eq!(y.value_at(1), Some(&Value::String("s".into())));

    let ts = payload.column("ts").unwrap();
    assert_eq!(ts.semantic_type, SemanticType::Timestamp);
    assert_eq!(ts.null_mask, [0]);
    assert_eq!(
        ts.values,
        [
            Value::TimestampMillisecond(1),
            Value::TimestampMillisecond(2),
            Value::TimestampMillisecond(3),
        ]
    );
}

#[test]
fn conflicting_series_is_rejected_without_side_effects() {
    let mut metric = Metric::new();
    let mut first = Series::at(at_ms(1));
    first.add("v", 1.5f64).unwrap();
    metric.add_series(first).unwrap();

    let mut second = Series::at(at_ms(2));
    second.add("w", 1i64).unwrap().add("v", "oops").unwrap();
    let err = metric.add_series(second).unwrap_err();
    assert!(matches!(
        err,
        IngestError::SchemaConflict { ref column, expected_type: WireType::Float64, found_type: WireType::String, .. }
            if column == "v"
    ));
    assert_eq!(metric.len(), 1);
    assert!(metric.column("w").is_none());
}

// -- Insert batches -----------------------------------------------------------

#[derive(Default)]
struct Recording {
    batches: RefCell<Vec<InsertBatch>>,
}

impl Transport for Recording {
    type Error = IngestError;

    fn send(&self, batch: &InsertBatch) -> Result<u32> {
        self.batches.borrow_mut().push(batch.clone());
        Ok(u32::try_from(batch.row_count()).unwrap_or(u32::MAX))
    }
}

#[test]
fn mixed_batch_goes_out_in_one_request() {
    let encoder = Encoder::default();

    let users = encoder
        .encode_records(&[User { id: 7, name: "x".into(), at: at_ms(5) }])
        .unwrap();

    let mut metric = encoder.metric().unwrap();
    let mut s = Series::at(at_ms(5));
    s.add_tag("host", "h1").unwrap().add("load", 0.25f64).unwrap();
    metric.add_series(s).unwrap();
    let load = encoder.encode_metric(&metric, "Host Load").unwrap();

    let transport = Recording::default();
    let mut batch = InsertBatch::new();
    batch.push(users).push(load);
    assert_eq!(batch.send(&transport).unwrap(), 2);

    let sent = transport.batches.borrow();
    let names: Vec<&str> = sent[0].tables().iter().map(TablePayload::table_name).collect();
    assert_eq!(names, ["user", "host_load"]);
}

#[test]
fn yaml_config_drives_encoder() {
    let config = EncoderConfig::from_yaml_str(
        "sanitize_names: false\ndefault_precision: nanosecond\ntimestamp_alias: time\n",
    )
    .unwrap();
    let encoder = Encoder::new(config).unwrap();

    let mut metric = encoder.metric().unwrap();
    let mut s = Series::at(at_ms(1));
    s.add("v", 1u32).unwrap();
    metric.add_series(s).unwrap();

    let payload = encoder.encode_metric(&metric, "Raw").unwrap();
    assert_eq!(payload.table_name, "Raw");
    assert_eq!(payload.column("v").unwrap().data_type, WireType::UInt64);
    assert_eq!(
        payload.column("time").unwrap().values,
        [Value::TimestampNanosecond(1_000_000)]
    );
}

#[test]
fn payload_converts_to_arrow_ipc() {
    let payload = RowPayload::from_records(&[
        User { id: 1, name: "a".into(), at: at_ms(1) },
        User { id: 2, name: "b".into(), at: at_ms(2) },
    ])
    .unwrap();
    let bytes = payload.to_ipc().unwrap();
    let (schema, batches) = tsrow_sdk::arrow::decode_ipc(&bytes).unwrap();
    assert_eq!(schema.field(2).name(), "at");
    assert_eq!(batches[0].num_rows(), 2);
}
