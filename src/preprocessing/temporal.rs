use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;

use crate::error::{Error, Result};

/// Calendar unit a temporal feature is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalUnit {
    Second,
    Minute,
    Hour,
    /// Monday = 0, matching the upstream data loaders.
    DayOfWeek,
    DayOfMonth,
    Month,
}

impl TemporalUnit {
    /// Natural cycle length of the unit.
    pub fn period(self) -> f64 {
        match self {
            TemporalUnit::Second | TemporalUnit::Minute => 60.0,
            TemporalUnit::Hour => 24.0,
            TemporalUnit::DayOfWeek => 7.0,
            TemporalUnit::DayOfMonth => 31.0,
            TemporalUnit::Month => 12.0,
        }
    }

    fn value(self, ts: &NaiveDateTime) -> f64 {
        match self {
            TemporalUnit::Second => f64::from(ts.second()),
            TemporalUnit::Minute => f64::from(ts.minute()),
            TemporalUnit::Hour => f64::from(ts.hour()),
            TemporalUnit::DayOfWeek => f64::from(ts.weekday().num_days_from_monday()),
            TemporalUnit::DayOfMonth => f64::from(ts.day()),
            TemporalUnit::Month => f64::from(ts.month()),
        }
    }
}

impl FromStr for TemporalUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "second" => Ok(TemporalUnit::Second),
            "minute" => Ok(TemporalUnit::Minute),
            "hour" => Ok(TemporalUnit::Hour),
            "day" | "weekday" | "day_of_week" => Ok(TemporalUnit::DayOfWeek),
            "day_of_month" => Ok(TemporalUnit::DayOfMonth),
            "month" => Ok(TemporalUnit::Month),
            other => Err(Error::InvalidArgument(format!(
                "unrecognized temporal unit '{other}'"
            ))),
        }
    }
}

/// How a temporal unit is turned into feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    /// A `(sin, cos)` pair over the unit's natural cycle, continuous at the
    /// cycle boundary.
    Cyclical,
    /// The raw unit value as a single numeric column.
    Numerical,
}

impl FromStr for EncodingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cyclical" => Ok(EncodingKind::Cyclical),
            "numerical" => Ok(EncodingKind::Numerical),
            other => Err(Error::InvalidArgument(format!(
                "unrecognized encoding kind '{other}'"
            ))),
        }
    }
}

/// Appends temporal feature columns derived from `time_column`.
///
/// `spec` maps a unit name (e.g. `"hour"`) to an encoding kind (`"cyclical"`
/// or `"numerical"`). Cyclical entries append `sin_<unit>` and `cos_<unit>`
/// columns computed as sine/cosine of `2π · value / period`; numerical
/// entries append the raw value under the unit name. Entries are processed in
/// key order, so the output column order is deterministic. Row identity and
/// ordering are untouched.
///
/// # Errors
/// `InvalidArgument` when a unit or kind is unrecognized, the time column is
/// missing, or it cannot be parsed as timestamps.
pub fn encode_temporal_features(
    spec: &BTreeMap<String, String>,
    time_column: &str,
    df: &DataFrame,
) -> Result<DataFrame> {
    let mut encoded = df.clone();
    if spec.is_empty() {
        return Ok(encoded);
    }

    let timestamps = parse_time_column(df, time_column)?;

    for (unit_name, kind_name) in spec {
        let unit: TemporalUnit = unit_name.parse()?;
        let kind: EncodingKind = kind_name.parse()?;
        let values: Vec<f64> = timestamps.iter().map(|ts| unit.value(ts)).collect();

        match kind {
            EncodingKind::Cyclical => {
                let period = unit.period();
                let sin_vals: Vec<f64> = values
                    .iter()
                    .map(|v| (2.0 * PI * v / period).sin())
                    .collect();
                let cos_vals: Vec<f64> = values
                    .iter()
                    .map(|v| (2.0 * PI * v / period).cos())
                    .collect();
                encoded.with_column(Series::new(format!("sin_{unit_name}").into(), sin_vals))?;
                encoded.with_column(Series::new(format!("cos_{unit_name}").into(), cos_vals))?;
            }
            EncodingKind::Numerical => {
                encoded.with_column(Series::new(unit_name.as_str().into(), values))?;
            }
        }
    }

    Ok(encoded)
}

const TIMESTAMP_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_time_column(df: &DataFrame, time_column: &str) -> Result<Vec<NaiveDateTime>> {
    let series = df
        .column(time_column)
        .map_err(|_| Error::InvalidArgument(format!("unknown time column '{time_column}'")))?
        .as_materialized_series();

    match series.dtype() {
        DataType::String => {
            let ca = series.str()?;
            let mut out = Vec::with_capacity(ca.len());
            for value in ca.into_iter() {
                let raw = value.ok_or_else(|| null_timestamp(time_column))?;
                let ts = parse_timestamp(raw).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "cannot parse '{raw}' in time column '{time_column}' as a timestamp"
                    ))
                })?;
                out.push(ts);
            }
            Ok(out)
        }
        DataType::Datetime(time_unit, _) => {
            let time_unit = *time_unit;
            let physical = series.to_physical_repr();
            let ca = physical.i64()?;
            let mut out = Vec::with_capacity(ca.len());
            for value in ca.into_iter() {
                let raw = value.ok_or_else(|| null_timestamp(time_column))?;
                let ts = match time_unit {
                    TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(raw),
                    TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw)
                        .ok_or_else(|| out_of_range(time_column, raw))?,
                    TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw)
                        .ok_or_else(|| out_of_range(time_column, raw))?,
                };
                out.push(ts.naive_utc());
            }
            Ok(out)
        }
        DataType::Date => {
            let physical = series.to_physical_repr();
            let ca = physical.i32()?;
            let mut out = Vec::with_capacity(ca.len());
            for value in ca.into_iter() {
                let days = value.ok_or_else(|| null_timestamp(time_column))?;
                let ts = DateTime::from_timestamp(i64::from(days) * 86_400, 0)
                    .ok_or_else(|| out_of_range(time_column, i64::from(days)))?;
                out.push(ts.naive_utc());
            }
            Ok(out)
        }
        other => Err(Error::InvalidArgument(format!(
            "time column '{time_column}' has dtype {other} which cannot be parsed as timestamps"
        ))),
    }
}

fn null_timestamp(time_column: &str) -> Error {
    Error::InvalidArgument(format!("null value in time column '{time_column}'"))
}

fn out_of_range(time_column: &str, raw: i64) -> Error {
    Error::InvalidArgument(format!(
        "value {raw} in time column '{time_column}' is outside the representable timestamp range"
    ))
}
