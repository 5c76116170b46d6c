//! Forecast normalizer
//!
//! Pure functions turning raw upstream JSON into the records of
//! [`crate::models`]. Nothing in here performs I/O or fails on shape: a
//! missing, mistyped or malformed field becomes `None` and the rest of the
//! record is still produced.

mod compose;
mod current;
mod daily;
mod forecast;
mod heatmap;

pub use compose::{approximate_dew_point, compose_dashboard_view};
pub use current::{normalize_air_quality, normalize_current};
pub use daily::{normalize_daily, normalize_hourly_humidity};
pub use forecast::{ForecastPayload, normalize_forecast_series};
pub use heatmap::normalize_heatmap_grid;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Read a measurement leniently.
///
/// Finite JSON numbers are used as-is and strings are parsed after
/// trimming. Anything else, or a non-finite result, is absent.
#[must_use]
pub fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Array stored under `key`, if the section has one
fn column<'a>(section: &'a Value, key: &str) -> Option<&'a [Value]> {
    section.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

/// Element `index` of a column; short or missing columns yield `None`
fn cell<'a>(column: Option<&'a [Value]>, index: usize) -> Option<&'a Value> {
    column.and_then(|values| values.get(index))
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?.trim(), "%Y-%m-%d").ok()
}

fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&json!(12.5)), Some(12.5));
        assert_eq!(lenient_number(&json!(-3)), Some(-3.0));
        assert_eq!(lenient_number(&json!(" 7.25 ")), Some(7.25));
        assert_eq!(lenient_number(&json!("abc")), None);
        assert_eq!(lenient_number(&json!("NaN")), None);
        assert_eq!(lenient_number(&json!("inf")), None);
        assert_eq!(lenient_number(&json!(null)), None);
        assert_eq!(lenient_number(&json!(true)), None);
        assert_eq!(lenient_number(&json!([1])), None);
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime(&json!("2026-03-14T06:42")).is_some());
        assert!(parse_datetime(&json!("2026-03-14T06:42:10")).is_some());
        assert!(parse_datetime(&json!("yesterday")).is_none());
        assert!(parse_date(&json!("2026-03-14")).is_some());
        assert!(parse_date(&json!(20260314)).is_none());
    }
}
