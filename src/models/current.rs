//! Current conditions model and display methods

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current weather conditions. Every measurement may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Local observation time reported by the API
    pub observed_at: Option<NaiveDateTime>,
    /// Air temperature at 2 m
    pub temperature: Option<f64>,
    /// Apparent ("feels like") temperature
    pub apparent_temperature: Option<f64>,
    /// Relative humidity at 2 m, 0-100
    pub humidity_percent: Option<f64>,
    /// Precipitation of the preceding interval
    pub precipitation: Option<f64>,
    /// Rain of the preceding interval
    pub rain: Option<f64>,
    /// WMO weather interpretation code
    pub weather_code: Option<u8>,
    /// Wind speed at 10 m
    pub wind_speed: Option<f64>,
    /// Wind direction at 10 m in degrees (0/360 is North)
    pub wind_direction_degrees: Option<f64>,
    /// Visibility in meters
    pub visibility_meters: Option<f64>,
    /// Surface pressure in hPa
    pub pressure_hpa: Option<f64>,
    /// Unit string per upstream field name (`temperature_2m` -> `°C`)
    pub units: BTreeMap<String, String>,
}

impl CurrentConditions {
    /// Unit reported for an upstream field, or an empty string
    #[must_use]
    pub fn unit(&self, field: &str) -> &str {
        self.units.get(field).map_or("", String::as_str)
    }

    #[must_use]
    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_meters.map(|m| m / 1000.0)
    }

    /// Human-readable description of the weather code
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        self.weather_code.map(weather_code_to_description)
    }
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Convert wind direction from degrees to a 16-point cardinal direction
#[must_use]
pub fn wind_direction_to_cardinal(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    if !degrees.is_finite() {
        return "Unknown";
    }
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5).round() as usize) % POINTS.len();
    POINTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_code_description() {
        assert_eq!(weather_code_to_description(0), "Clear sky");
        assert_eq!(weather_code_to_description(63), "Moderate rain");
        assert_eq!(weather_code_to_description(200), "Unknown");
    }

    #[test]
    fn test_wind_direction_to_cardinal() {
        assert_eq!(wind_direction_to_cardinal(0.0), "N");
        assert_eq!(wind_direction_to_cardinal(359.0), "N");
        assert_eq!(wind_direction_to_cardinal(90.0), "E");
        assert_eq!(wind_direction_to_cardinal(202.5), "SSW");
        assert_eq!(wind_direction_to_cardinal(f64::NAN), "Unknown");
    }

    #[test]
    fn test_visibility_and_units() {
        let mut current = CurrentConditions {
            visibility_meters: Some(24_140.0),
            ..Default::default()
        };
        current
            .units
            .insert("temperature_2m".to_string(), "°C".to_string());

        assert_eq!(current.visibility_km(), Some(24.14));
        assert_eq!(current.unit("temperature_2m"), "°C");
        assert_eq!(current.unit("missing"), "");
        assert_eq!(current.description(), None);
    }
}
