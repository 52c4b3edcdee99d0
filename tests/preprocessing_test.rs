use std::collections::BTreeMap;
use std::f64::consts::PI;

use flood_forecast_train::error::Error;
use flood_forecast_train::preprocessing::{back_forward_fill, encode_temporal_features};
use polars::prelude::*;

fn spec_of(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(unit, kind)| (unit.to_string(), kind.to_string()))
        .collect()
}

fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

#[test]
fn test_back_forward() {
    let df = df!(
        "number_of_animals" => &[Some(100.0), None, None, Some(165.0), None],
    )
    .unwrap();

    let filled = back_forward_fill(&df, &["number_of_animals"]).unwrap();
    let animals = column_values(&filled, "number_of_animals");

    assert_eq!(animals[3], 165.0);
    assert_eq!(animals, vec![100.0, 100.0, 100.0, 165.0, 165.0]);
}

#[test]
fn test_fill_without_gaps_is_identity() {
    let df = df!(
        "flow" => &[1.0, 2.0, 3.0],
        "precip" => &[0.0, 0.4, 0.1],
    )
    .unwrap();

    let filled = back_forward_fill(&df, &["flow", "precip"]).unwrap();
    assert!(filled.equals(&df));
}

#[test]
fn test_make_temporal_feats() {
    let df = df!(
        "datetime" => &["2016-05-31 00:00:00", "2016-05-31 06:00:00"],
        "cfs" => &[445.0, 482.0],
    )
    .unwrap();

    let feats = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df).unwrap();

    let names = feats.get_column_names();
    assert!(names.iter().any(|n| n.as_str() == "sin_hour"));
    assert!(names.iter().any(|n| n.as_str() == "cos_hour"));

    let sin_hour = column_values(&feats, "sin_hour");
    let cos_hour = column_values(&feats, "cos_hour");

    // Hour 0 sits at the cycle origin; hour 6 is a quarter turn.
    assert!((sin_hour[0] - 0.0).abs() < 1e-9);
    assert!((cos_hour[0] - 1.0).abs() < 1e-9);
    assert!((sin_hour[1] - 1.0).abs() < 1e-9);
    assert!(cos_hour[1].abs() < 1e-9);
}

#[test]
fn test_cyclical_round_trip() -> anyhow::Result<()> {
    let stamps: Vec<String> = (0..24)
        .map(|h| format!("2016-05-31 {h:02}:00:00"))
        .collect();
    let df = df!("datetime" => &stamps)?;

    let feats = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df)?;
    let sin_hour = column_values(&feats, "sin_hour");
    let cos_hour = column_values(&feats, "cos_hour");

    for hour in 0..24 {
        let mut recovered = sin_hour[hour].atan2(cos_hour[hour]) / (2.0 * PI) * 24.0;
        if recovered < 0.0 {
            recovered += 24.0;
        }
        assert!(
            (recovered - hour as f64).abs() < 1e-9,
            "hour {hour} recovered as {recovered}"
        );
    }

    Ok(())
}

#[test]
fn test_numerical_kind_appends_raw_values() {
    let df = df!(
        "datetime" => &["2016-05-31 00:00:00", "2016-05-31 06:00:00"],
    )
    .unwrap();

    let feats = encode_temporal_features(&spec_of(&[("hour", "numerical")]), "datetime", &df).unwrap();
    assert_eq!(column_values(&feats, "hour"), vec![0.0, 6.0]);
}

#[test]
fn test_month_and_weekday_periods() {
    // 2016-06-15 was a Wednesday (weekday 2, Monday = 0) in June (month 6).
    let df = df!("datetime" => &["2016-06-15 12:00:00"]).unwrap();

    let feats = encode_temporal_features(
        &spec_of(&[("month", "cyclical"), ("weekday", "cyclical")]),
        "datetime",
        &df,
    )
    .unwrap();

    let sin_month = column_values(&feats, "sin_month")[0];
    let cos_month = column_values(&feats, "cos_month")[0];
    assert!(sin_month.abs() < 1e-9);
    assert!((cos_month - (-1.0)).abs() < 1e-9);

    let sin_weekday = column_values(&feats, "sin_weekday")[0];
    let expected = (2.0 * PI * 2.0 / 7.0).sin();
    assert!((sin_weekday - expected).abs() < 1e-9);
}

#[test]
fn test_datetime_dtype_column() {
    // Epoch and epoch + 6h, as a millisecond datetime column.
    let raw = df!("datetime" => &[0i64, 21_600_000]).unwrap();
    let casted = raw
        .column("datetime")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    let mut df = raw.clone();
    df.with_column(casted).unwrap();

    let feats = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df).unwrap();
    let sin_hour = column_values(&feats, "sin_hour");
    assert!(sin_hour[0].abs() < 1e-9);
    assert!((sin_hour[1] - 1.0).abs() < 1e-9);
}

#[test]
fn test_unknown_unit_is_rejected() {
    let df = df!("datetime" => &["2016-05-31 00:00:00"]).unwrap();
    let err =
        encode_temporal_features(&spec_of(&[("fortnight", "cyclical")]), "datetime", &df).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let df = df!("datetime" => &["2016-05-31 00:00:00"]).unwrap();
    let err = encode_temporal_features(&spec_of(&[("hour", "onehot")]), "datetime", &df).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_missing_time_column_is_rejected() {
    let df = df!("cfs" => &[1.0]).unwrap();
    let err = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_unparseable_time_column_is_rejected() {
    let df = df!("datetime" => &["yesterday-ish"]).unwrap();
    let err = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_numeric_time_column_is_rejected() {
    let df = df!("datetime" => &[1.5f64, 2.5]).unwrap();
    let err = encode_temporal_features(&spec_of(&[("hour", "cyclical")]), "datetime", &df).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}
