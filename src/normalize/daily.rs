use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::{cell, column, lenient_number, parse_date, parse_datetime};
use crate::models::DailyPoint;

/// Zip the API's parallel daily arrays into at most `past_days` points.
///
/// The series length is taken from `time`; a column that is missing or
/// shorter than that leaves the corresponding field absent.
#[must_use]
pub fn normalize_daily(raw_daily: &Value, past_days: usize) -> Vec<DailyPoint> {
    let time = column(raw_daily, "time");
    let max = column(raw_daily, "temperature_2m_max");
    let min = column(raw_daily, "temperature_2m_min");
    let sunrise = column(raw_daily, "sunrise");
    let sunset = column(raw_daily, "sunset");
    let uv = column(raw_daily, "uv_index_max");
    let precipitation = column(raw_daily, "precipitation_sum");

    let len = time.map_or(0, <[Value]>::len).min(past_days);

    let points: Vec<DailyPoint> = (0..len)
        .map(|i| {
            let temperature_max = cell(max, i).and_then(lenient_number);
            let temperature_min = cell(min, i).and_then(lenient_number);
            let temperature_avg = match (temperature_max, temperature_min) {
                (Some(high), Some(low)) => Some((high + low) / 2.0),
                _ => None,
            };

            DailyPoint {
                date: cell(time, i).and_then(parse_date),
                temperature_max,
                temperature_min,
                temperature_avg,
                sunrise: cell(sunrise, i).and_then(parse_datetime),
                sunset: cell(sunset, i).and_then(parse_datetime),
                uv_index_max: cell(uv, i).and_then(lenient_number),
                precipitation_sum: cell(precipitation, i).and_then(lenient_number),
                humidity_mean: None,
            }
        })
        .collect();

    if !dates_strictly_ascending(&points) {
        warn!("Daily series is not strictly ascending by date; keeping upstream order");
    }

    points
}

/// Dated points ascend with no duplicates; undated points are ignored
fn dates_strictly_ascending(points: &[DailyPoint]) -> bool {
    let dates: Vec<NaiveDate> = points.iter().filter_map(|p| p.date).collect();
    dates.windows(2).all(|pair| pair[0] < pair[1])
}

/// Mean hourly relative humidity per calendar date.
///
/// Samples with an unparsable time or an absent value are skipped; a date
/// without any valid sample does not appear in the map.
#[must_use]
pub fn normalize_hourly_humidity(raw_hourly: &Value) -> BTreeMap<NaiveDate, f64> {
    let time = column(raw_hourly, "time").unwrap_or_default();
    let humidity = column(raw_hourly, "relative_humidity_2m");

    let mut sums: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for (i, stamp) in time.iter().enumerate() {
        let (Some(at), Some(value)) = (
            parse_datetime(stamp),
            cell(humidity, i).and_then(lenient_number),
        ) else {
            continue;
        };
        let entry = sums.entry(at.date()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / f64::from(count)))
        .collect()
}
