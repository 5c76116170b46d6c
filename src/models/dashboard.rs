//! Composed view records and their text rendering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::current::wind_direction_to_cardinal;
use super::{
    ABSENT, AirQualitySample, AqiCategory, CurrentConditions, DailyPoint, ForecastDayEntry,
    HeatmapCell, HistoryPoint, format_measurement,
};

/// Tile record set of the weather dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub current: CurrentConditions,
    /// Today's aggregates (high, low, UV)
    pub today: Option<DailyPoint>,
    /// Approximate dew point; see [`crate::normalize::approximate_dew_point`]
    pub dew_point: Option<f64>,
    pub air_quality: AirQualitySample,
    pub air_quality_category: Option<AqiCategory>,
    /// Days before today, oldest first
    pub history: Vec<HistoryPoint>,
}

/// Forecast table plus the optional heatmap overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastView {
    pub property: String,
    /// Day the forecast was requested; entry 0 falls on this date
    pub issued_on: NaiveDate,
    pub entries: Vec<ForecastDayEntry>,
    /// `None` when the heatmap request failed; the table is still shown
    pub heatmap: Option<Vec<HeatmapCell>>,
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = &self.current;
        let temperature_unit = current.unit("temperature_2m");

        writeln!(
            f,
            "Now: {} ({})",
            format_measurement(current.temperature, temperature_unit),
            current.description().unwrap_or(ABSENT)
        )?;
        writeln!(
            f,
            "   Feels like: {}",
            format_measurement(current.apparent_temperature, temperature_unit)
        )?;
        if let Some(today) = &self.today {
            writeln!(
                f,
                "   H: {}  L: {}",
                format_measurement(today.temperature_max, "°"),
                format_measurement(today.temperature_min, "°")
            )?;
        }

        let aqi = self
            .air_quality
            .us_aqi
            .map_or_else(|| ABSENT.to_string(), |v| v.to_string());
        let category = self.air_quality_category.map_or(ABSENT, |c| c.label());
        let elevated = if self.air_quality.is_elevated() { " (!)" } else { "" };
        writeln!(f, "Air Quality: {aqi} AQI - {category}{elevated}")?;

        let uv = self
            .today
            .as_ref()
            .and_then(|t| t.uv_index_max)
            .map_or_else(|| ABSENT.to_string(), |v| format!("{v:.1}"));
        writeln!(f, "UV Index: {uv} (max today)")?;

        let direction = current.wind_direction_degrees.map_or_else(
            || ABSENT.to_string(),
            |d| format!("{d:.0}° {}", wind_direction_to_cardinal(d)),
        );
        writeln!(
            f,
            "Wind: {} (dir: {direction})",
            format_measurement(
                current.wind_speed,
                &format!(" {}", current.unit("wind_speed_10m"))
            )
        )?;

        writeln!(
            f,
            "Humidity: {} (dew point ~{})",
            format_measurement(current.humidity_percent, "%"),
            format_measurement(self.dew_point, "°")
        )?;
        writeln!(
            f,
            "Visibility: {}",
            format_measurement(current.visibility_km(), " km")
        )?;
        writeln!(
            f,
            "Pressure: {}",
            format_measurement(current.pressure_hpa, " hPa")
        )?;

        if !self.history.is_empty() {
            writeln!(f, "History:")?;
            for point in &self.history {
                let date = point
                    .date
                    .map_or_else(|| ABSENT.to_string(), |d| d.format("%a %d %b").to_string());
                writeln!(
                    f,
                    "   {date:<11} avg {:>8}  humidity {:>6}",
                    format_measurement(point.temperature_avg, temperature_unit),
                    format_measurement(point.humidity_mean, "%")
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ForecastView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast ({}):", self.property)?;
        for entry in &self.entries {
            let date = entry
                .date_from(self.issued_on)
                .map_or_else(|| ABSENT.to_string(), |d| d.format("%a %d %b").to_string());
            writeln!(
                f,
                "   {:<7} {date:<11} {}",
                entry.source_label,
                entry.format_temperature()
            )?;
        }
        match &self.heatmap {
            Some(cells) => writeln!(f, "Heatmap: {} cells", cells.len()),
            None => writeln!(f, "Heatmap: unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_renders_absent_fields() {
        let view = DashboardView {
            current: CurrentConditions::default(),
            today: None,
            dew_point: None,
            air_quality: AirQualitySample::default(),
            air_quality_category: None,
            history: Vec::new(),
        };
        let text = view.to_string();
        assert!(text.contains("Now: n/a"));
        assert!(text.contains("Air Quality: n/a AQI - n/a"));
        assert!(!text.contains("0.0"));
    }

    #[test]
    fn test_forecast_view_rendering() {
        let view = ForecastView {
            property: "T2M".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            entries: vec![ForecastDayEntry::new(0, Some(21.4)), ForecastDayEntry::new(1, None)],
            heatmap: None,
        };
        let text = view.to_string();
        assert!(text.contains("Day 1   Sat 14 Mar  21.4°C"));
        assert!(text.contains("Day 2   Sun 15 Mar  n/a"));
        assert!(text.contains("Heatmap: unavailable"));
    }
}
