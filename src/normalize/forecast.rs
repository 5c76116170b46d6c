use serde_json::Value;

use super::lenient_number;
use crate::models::ForecastDayEntry;

/// Wrapper keys probed, in order, when the payload is not itself an array
const WRAPPER_KEYS: [&str; 2] = ["forecast", "predictions"];

/// Per-element temperature fields, in priority order
const TEMPERATURE_KEYS: [&str; 3] = ["temperature", "temp", "value"];

/// Shape of a forecast backend response, decided once before extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastPayload<'a> {
    /// The payload is a bare array
    Series(&'a [Value]),
    /// The array sits under one of the wrapper keys
    Wrapped {
        key: &'static str,
        series: &'a [Value],
    },
    /// Anything else is a one-element series
    Single(&'a Value),
}

impl<'a> ForecastPayload<'a> {
    /// Resolution order: bare array, then `forecast`, then `predictions`,
    /// then the whole payload as a single element. A wrapper key holding a
    /// non-array value yields that value as a single element.
    #[must_use]
    pub fn decode(raw: &'a Value) -> Self {
        if let Value::Array(items) = raw {
            return Self::Series(items);
        }

        for key in WRAPPER_KEYS {
            match raw.get(key) {
                Some(Value::Array(items)) => {
                    return Self::Wrapped { key, series: items };
                }
                Some(Value::Null) | None => {}
                Some(other) => return Self::Single(other),
            }
        }

        Self::Single(raw)
    }

    #[must_use]
    pub fn elements(&self) -> &'a [Value] {
        match *self {
            Self::Series(items) | Self::Wrapped { series: items, .. } => items,
            Self::Single(value) => std::slice::from_ref(value),
        }
    }
}

fn element_temperature(element: &Value) -> Option<f64> {
    match element {
        Value::Object(fields) => TEMPERATURE_KEYS
            .iter()
            .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
            .and_then(lenient_number),
        other => lenient_number(other),
    }
}

/// Round to one decimal; huge magnitudes that overflow while scaling are absent
fn round_to_tenth(value: f64) -> Option<f64> {
    Some((value * 10.0).round() / 10.0).filter(|v| v.is_finite())
}

/// Normalize any of the backend's forecast shapes into a day-indexed series
#[must_use]
pub fn normalize_forecast_series(raw_forecast: &Value) -> Vec<ForecastDayEntry> {
    ForecastPayload::decode(raw_forecast)
        .elements()
        .iter()
        .enumerate()
        .map(|(day_index, element)| {
            ForecastDayEntry::new(day_index, element_temperature(element).and_then(round_to_tenth))
        })
        .collect()
}
