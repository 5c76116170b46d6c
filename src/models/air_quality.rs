//! Air quality sample and its display category

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current US AQI reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub us_aqi: Option<i64>,
}

/// Two-bucket air quality label used by the dashboard tile.
///
/// This is not the full AQI scale: everything from 50 upwards is labelled
/// `Moderate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
}

impl AqiCategory {
    #[must_use]
    pub fn from_us_aqi(aqi: i64) -> Self {
        if aqi < 50 { Self::Good } else { Self::Moderate }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AirQualitySample {
    #[must_use]
    pub fn category(&self) -> Option<AqiCategory> {
        self.us_aqi.map(AqiCategory::from_us_aqi)
    }

    /// Above 100 the tile is highlighted as unhealthy
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.us_aqi.is_some_and(|aqi| aqi > 100)
    }
}
