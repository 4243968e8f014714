//! Sparse series and the metric that unions them.
//!
//! A [`Series`] is one timestamped set of tag and field values. A [`Metric`]
//! accumulates series into one table: the column set is the union of every
//! series' columns, and each column keeps the role and type of the series
//! that introduced it. Rows lacking a column are tracked by a null mask when
//! the metric is assembled.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::cell::coerce;
use crate::config::EncoderConfig;
use crate::datum::Datum;
use crate::types::{
    sanitize_name, IngestError, Precision, Result, SemanticType, Value, WireType,
};

const DEFAULT_TIMESTAMP_ALIAS: &str = "ts";

/// One value of a series with its role.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesValue {
    pub semantic_type: SemanticType,
    pub value: Value,
}

impl SeriesValue {
    #[must_use]
    pub fn data_type(&self) -> WireType {
        self.value.wire_type()
    }
}

/// One row of a metric: named values sharing a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    order: Vec<String>,
    values: HashMap<String, SeriesValue>,
    timestamp: DateTime<Utc>,
    instant_type: WireType,
    sanitize: bool,
}

impl Default for Series {
    fn default() -> Self {
        Self::new()
    }
}

impl Series {
    /// An empty series stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// An empty series stamped with `timestamp`. Names are sanitized and
    /// instants become `TIMESTAMP_MILLISECOND` columns.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
            timestamp,
            instant_type: WireType::TimestampMillisecond,
            sanitize: true,
        }
    }

    /// Like [`Series::at`], following the name policy and instant type of
    /// `config`.
    #[must_use]
    pub fn with_config(timestamp: DateTime<Utc>, config: &EncoderConfig) -> Self {
        Self {
            instant_type: config.instant_type,
            sanitize: config.sanitize_names,
            ..Self::at(timestamp)
        }
    }

    /// Add a tag value.
    ///
    /// # Errors
    ///
    /// See [`Series::add`].
    pub fn add_tag(&mut self, name: &str, value: impl Into<Datum>) -> Result<&mut Self> {
        self.insert(name, SemanticType::Tag, value.into())
    }

    /// Add a field value.
    ///
    /// # Errors
    ///
    /// See [`Series::add`].
    pub fn add_field(&mut self, name: &str, value: impl Into<Datum>) -> Result<&mut Self> {
        self.insert(name, SemanticType::Field, value.into())
    }

    /// Add a value with role field. The column type is the value's natural
    /// type: signed integers become `INT64`, unsigned `UINT64`, instants
    /// the series' instant type. Adding an existing name replaces its value.
    ///
    /// # Errors
    ///
    /// Name errors from the sanitizer, and [`IngestError::UnsupportedType`]
    /// for a null value, which carries no type. Omit the column instead.
    pub fn add(&mut self, name: &str, value: impl Into<Datum>) -> Result<&mut Self> {
        self.insert(name, SemanticType::Field, value.into())
    }

    fn insert(&mut self, name: &str, semantic_type: SemanticType, datum: Datum) -> Result<&mut Self> {
        let name = if self.sanitize {
            sanitize_name(name)?
        } else {
            name.trim().to_string()
        };
        let unsupported = || IngestError::UnsupportedType(format!("{name}: null value has no type"));
        let data_type = datum
            .natural_type(self.instant_type)
            .ok_or_else(unsupported)?;
        let value = coerce(datum, data_type)?.ok_or_else(unsupported)?;

        if !self.values.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.values.insert(name, SeriesValue { semantic_type, value });
        Ok(self)
    }

    /// Override the timestamp.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Value of column `name`, if this series has one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SeriesValue> {
        self.values.get(name)
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeriesValue)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Role and type of one metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricColumn {
    pub semantic_type: SemanticType,
    pub data_type: WireType,
}

/// Union of series, plus the name and precision of the implicit timestamp
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    timestamp_alias: String,
    sanitize: bool,
    precision: Precision,
    order: Vec<String>,
    columns: HashMap<String, MetricColumn>,
    series: Vec<Series>,
}

impl Default for Metric {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric {
    /// Timestamp column `ts`, millisecond precision.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp_alias: DEFAULT_TIMESTAMP_ALIAS.to_string(),
            sanitize: true,
            precision: Precision::default(),
            order: Vec::new(),
            columns: HashMap::new(),
            series: Vec::new(),
        }
    }

    /// Timestamp alias, precision and name policy from `config`.
    ///
    /// # Errors
    ///
    /// Name errors when the configured alias is invalid.
    pub fn with_config(config: &EncoderConfig) -> Result<Self> {
        let mut metric = Self::new();
        metric.sanitize = config.sanitize_names;
        metric.set_timestamp_alias(&config.timestamp_alias)?;
        metric.precision = config.default_precision;
        Ok(metric)
    }

    /// Add one series, unioning its columns into the metric.
    ///
    /// The whole series is validated before anything changes, so a failed
    /// call leaves the metric as it was.
    ///
    /// # Errors
    ///
    /// [`IngestError::SchemaConflict`] when a column already exists with a
    /// different role or type, or is named like the timestamp column.
    pub fn add_series(&mut self, series: Series) -> Result<()> {
        for (name, value) in series.iter() {
            if name == self.timestamp_alias {
                warn!(column = name, "series column shadows the timestamp column");
                return Err(IngestError::SchemaConflict {
                    column: name.to_string(),
                    expected_role: SemanticType::Timestamp,
                    expected_type: self.precision.timestamp_type(),
                    found_role: value.semantic_type,
                    found_type: value.data_type(),
                });
            }
            if let Some(existing) = self.columns.get(name) {
                if existing.semantic_type != value.semantic_type
                    || existing.data_type != value.data_type()
                {
                    warn!(
                        column = name,
                        expected = %existing.data_type,
                        found = %value.data_type(),
                        "series conflicts with metric schema"
                    );
                    return Err(IngestError::SchemaConflict {
                        column: name.to_string(),
                        expected_role: existing.semantic_type,
                        expected_type: existing.data_type,
                        found_role: value.semantic_type,
                        found_type: value.data_type(),
                    });
                }
            }
        }

        for (name, value) in series.iter() {
            if !self.columns.contains_key(name) {
                self.order.push(name.to_string());
                self.columns.insert(
                    name.to_string(),
                    MetricColumn {
                        semantic_type: value.semantic_type,
                        data_type: value.data_type(),
                    },
                );
            }
        }
        self.series.push(series);
        Ok(())
    }

    /// Change the timestamp precision.
    ///
    /// # Errors
    ///
    /// [`IngestError::PrecisionLocked`] once any series has been added.
    pub fn set_precision(&mut self, precision: Precision) -> Result<()> {
        if !self.series.is_empty() {
            return Err(IngestError::PrecisionLocked);
        }
        self.precision = precision;
        Ok(())
    }

    /// Change the timestamp precision from a duration of 1s, 1ms, 1µs or 1ns.
    ///
    /// # Errors
    ///
    /// [`IngestError::InvalidPrecision`] for other durations and
    /// [`IngestError::PrecisionLocked`] once any series has been added.
    pub fn set_precision_duration(&mut self, precision: Duration) -> Result<()> {
        self.set_precision(Precision::from_duration(precision)?)
    }

    /// Rename the timestamp column. The alias is sanitized unless the
    /// metric was configured otherwise.
    ///
    /// # Errors
    ///
    /// Name errors from the sanitizer, and [`IngestError::SchemaConflict`]
    /// when a tag or field column already has that name.
    pub fn set_timestamp_alias(&mut self, alias: &str) -> Result<()> {
        let alias = if self.sanitize {
            sanitize_name(alias)?
        } else {
            alias.trim().to_string()
        };
        if let Some(existing) = self.columns.get(&alias) {
            return Err(IngestError::SchemaConflict {
                column: alias,
                expected_role: existing.semantic_type,
                expected_type: existing.data_type,
                found_role: SemanticType::Timestamp,
                found_type: self.precision.timestamp_type(),
            });
        }
        self.timestamp_alias = alias;
        Ok(())
    }

    #[must_use]
    pub fn timestamp_alias(&self) -> &str {
        &self.timestamp_alias
    }

    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Tag and field column names, excluding the timestamp, in order of
    /// first appearance.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<MetricColumn> {
        self.columns.get(name).copied()
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(sec: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(sec, 0).unwrap()
    }

    #[test]
    fn series_records_roles_and_natural_types() {
        let mut s = Series::at(t(1));
        s.add_tag("Host", "a").unwrap().add_field("cpu", 0.5f64).unwrap().add("n", 3i8).unwrap();
        assert_eq!(s.names(), ["host", "cpu", "n"]);
        assert_eq!(s.get("host").unwrap().semantic_type, SemanticType::Tag);
        assert_eq!(s.get("n").unwrap().value, Value::Int64(3));
        assert_eq!(s.get("cpu").unwrap().data_type(), WireType::Float64);
    }

    #[test]
    fn series_rejects_null_and_bad_names() {
        let mut s = Series::new();
        assert!(matches!(
            s.add("x", None::<i64>),
            Err(IngestError::UnsupportedType(_))
        ));
        assert!(matches!(s.add("  ", 1i64), Err(IngestError::EmptyName)));
        assert!(s.is_empty());
    }

    #[test]
    fn series_overwrites_same_name() {
        let mut s = Series::new();
        s.add("x", 1i64).unwrap().add("X", 2i64).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("x").unwrap().value, Value::Int64(2));
    }

    #[test]
    fn metric_unions_columns_in_first_seen_order() {
        let mut m = Metric::new();
        let mut a = Series::at(t(1));
        a.add("x", 1i64).unwrap();
        let mut b = Series::at(t(2));
        b.add("y", "s").unwrap().add("x", 5i64).unwrap();
        m.add_series(a).unwrap();
        m.add_series(b).unwrap();
        assert_eq!(m.column_names(), ["x", "y"]);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn type_conflict_is_rejected_without_mutation() {
        let mut m = Metric::new();
        let mut a = Series::new();
        a.add("cpu", 1.0f64).unwrap();
        m.add_series(a).unwrap();

        let mut b = Series::new();
        b.add("mem", 2i64).unwrap().add("cpu", "high").unwrap();
        let err = m.add_series(b).unwrap_err();
        assert!(matches!(
            err,
            IngestError::SchemaConflict {
                ref column,
                expected_type: WireType::Float64,
                found_type: WireType::String,
                ..
            } if column == "cpu"
        ));
        assert_eq!(m.column_names(), ["cpu"]);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn role_conflict_is_rejected() {
        let mut m = Metric::new();
        let mut a = Series::new();
        a.add_tag("host", "a").unwrap();
        m.add_series(a).unwrap();
        let mut b = Series::new();
        b.add_field("host", "b").unwrap();
        assert!(matches!(
            m.add_series(b),
            Err(IngestError::SchemaConflict {
                expected_role: SemanticType::Tag,
                found_role: SemanticType::Field,
                ..
            })
        ));
    }

    #[test]
    fn precision_locks_after_first_series() {
        let mut m = Metric::new();
        m.set_precision(Precision::Second).unwrap();
        assert!(matches!(
            m.set_precision_duration(Duration::from_secs(60)),
            Err(IngestError::InvalidPrecision(_))
        ));
        let mut s = Series::new();
        s.add("x", 1i64).unwrap();
        m.add_series(s).unwrap();
        assert!(matches!(
            m.set_precision(Precision::Nanosecond),
            Err(IngestError::PrecisionLocked)
        ));
        assert_eq!(m.precision(), Precision::Second);
    }

    #[test]
    fn timestamp_alias() {
        let mut m = Metric::new();
        assert_eq!(m.timestamp_alias(), "ts");
        m.set_timestamp_alias("Event Time").unwrap();
        assert_eq!(m.timestamp_alias(), "event_time");
        assert!(m.set_timestamp_alias("").is_err());
        assert_eq!(m.timestamp_alias(), "event_time");
    }

    #[test]
    fn column_named_like_timestamp_is_rejected() {
        let mut m = Metric::new();
        let mut s = Series::at(t(1));
        s.add("x", 1i64).unwrap().add("ts", 5i64).unwrap();
        let err = m.add_series(s).unwrap_err();
        assert!(matches!(
            err,
            IngestError::SchemaConflict {
                ref column,
                expected_role: SemanticType::Timestamp,
                found_role: SemanticType::Field,
                ..
            } if column == "ts"
        ));
        assert!(m.is_empty());
        assert!(m.column_names().is_empty());
    }

    #[test]
    fn alias_cannot_take_an_existing_column_name() {
        let mut m = Metric::new();
        let mut s = Series::at(t(1));
        s.add_tag("host", "a").unwrap();
        m.add_series(s).unwrap();

        assert!(matches!(
            m.set_timestamp_alias("Host"),
            Err(IngestError::SchemaConflict { expected_role: SemanticType::Tag, .. })
        ));
        assert_eq!(m.timestamp_alias(), "ts");
    }

    #[test]
    fn series_follows_config() {
        let config = EncoderConfig {
            sanitize_names: false,
            instant_type: WireType::TimestampSecond,
            ..EncoderConfig::default()
        };
        let mut s = Series::with_config(t(1), &config);
        s.add(" SeenAt ", t(90)).unwrap();
        let value = s.get("SeenAt").unwrap();
        assert_eq!(value.data_type(), WireType::TimestampSecond);
        assert_eq!(value.value, Value::TimestampSecond(90));
    }

    #[test]
    fn config_seeds_alias_and_precision() {
        let config = EncoderConfig {
            timestamp_alias: "at".into(),
            default_precision: Precision::Microsecond,
            ..EncoderConfig::default()
        };
        let m = Metric::with_config(&config).unwrap();
        assert_eq!(m.timestamp_alias(), "at");
        assert_eq!(m.precision(), Precision::Microsecond);
    }
}
