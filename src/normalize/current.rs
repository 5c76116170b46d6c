use serde_json::Value;
use std::collections::BTreeMap;

use super::{lenient_number, parse_datetime};
use crate::models::{AirQualitySample, CurrentConditions};

/// Build current conditions from the `current` and `current_units` sections
#[must_use]
pub fn normalize_current(current: &Value, units: &Value) -> CurrentConditions {
    let number = |key: &str| current.get(key).and_then(lenient_number);

    let weather_code = number("weather_code")
        .filter(|code| code.fract() == 0.0 && (0.0..=255.0).contains(code))
        .map(|code| code as u8);

    let units = units
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(field, unit)| Some((field.clone(), unit.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_else(BTreeMap::new);

    CurrentConditions {
        observed_at: current.get("time").and_then(parse_datetime),
        temperature: number("temperature_2m"),
        apparent_temperature: number("apparent_temperature"),
        humidity_percent: number("relative_humidity_2m"),
        precipitation: number("precipitation"),
        rain: number("rain"),
        weather_code,
        wind_speed: number("wind_speed_10m"),
        wind_direction_degrees: number("wind_direction_10m"),
        visibility_meters: number("visibility"),
        pressure_hpa: number("surface_pressure"),
        units,
    }
}

/// Read `current.us_aqi` from an air-quality response
#[must_use]
pub fn normalize_air_quality(raw: &Value) -> AirQualitySample {
    let us_aqi = raw
        .get("current")
        .and_then(|current| current.get("us_aqi"))
        .and_then(lenient_number)
        .map(|aqi| aqi.round() as i64);
    AirQualitySample { us_aqi }
}
