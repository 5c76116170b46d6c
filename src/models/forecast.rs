//! ML forecast series entry

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::format_measurement;

/// One day of the backend's temperature forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDayEntry {
    /// Position in the series, 0 = today
    pub day_index: usize,
    /// Temperature rounded to one decimal; absent when the element had none
    pub temperature_celsius: Option<f64>,
    /// Row label, e.g. "Day 1"
    pub source_label: String,
}

impl ForecastDayEntry {
    #[must_use]
    pub fn new(day_index: usize, temperature_celsius: Option<f64>) -> Self {
        Self {
            day_index,
            temperature_celsius,
            source_label: format!("Day {}", day_index + 1),
        }
    }

    /// Calendar date of this entry counted from `base` (the day of the request)
    #[must_use]
    pub fn date_from(&self, base: NaiveDate) -> Option<NaiveDate> {
        base.checked_add_days(Days::new(self.day_index as u64))
    }

    #[must_use]
    pub fn format_temperature(&self) -> String {
        format_measurement(self.temperature_celsius, "°C")
    }
}
