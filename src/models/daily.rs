//! Daily aggregate model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of aggregates, zipped from the API's parallel daily arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: Option<NaiveDate>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    /// Midpoint of max and min; absent unless both are present
    pub temperature_avg: Option<f64>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub uv_index_max: Option<f64>,
    pub precipitation_sum: Option<f64>,
    /// Mean of the hourly relative humidity samples of this date
    pub humidity_mean: Option<f64>,
}

impl DailyPoint {
    /// Attach the per-day humidity mean computed from hourly samples
    #[must_use]
    pub fn with_humidity(mut self, humidity_by_date: &BTreeMap<NaiveDate, f64>) -> Self {
        self.humidity_mean = self
            .date
            .and_then(|date| humidity_by_date.get(&date).copied());
        self
    }

    #[must_use]
    pub fn history_point(&self) -> HistoryPoint {
        HistoryPoint {
            date: self.date,
            temperature_avg: self.temperature_avg,
            humidity_mean: self.humidity_mean,
        }
    }
}

/// One point of the history chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: Option<NaiveDate>,
    pub temperature_avg: Option<f64>,
    pub humidity_mean: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_humidity_matches_by_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut humidity = BTreeMap::new();
        humidity.insert(date, 64.5);

        let point = DailyPoint {
            date: Some(date),
            ..Default::default()
        }
        .with_humidity(&humidity);
        assert_eq!(point.humidity_mean, Some(64.5));

        let undated = DailyPoint::default().with_humidity(&humidity);
        assert_eq!(undated.humidity_mean, None);
    }
}
