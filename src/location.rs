//! Coordinates and location resolution
//!
//! A [`Coordinate`] can only be built through validation, so every fetch
//! receives an in-range latitude/longitude. When no device location is
//! available, [`resolve_location`] falls back to a fixed coordinate and
//! reports an informational notice instead of failing.

use crate::{Result, SkyviewError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Fallback coordinate (London) used when geolocation is unavailable
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 51.5074,
    longitude: -0.1278,
};

/// Validated geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = SkyviewError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Validate and build a coordinate. Both bounds are inclusive.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SkyviewError::validation(
                "Latitude must be between -90 and 90",
            ));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SkyviewError::validation(
                "Longitude must be between -180 and 180",
            ));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°, {:.2}°", self.latitude, self.longitude)
    }
}

/// Why a device location could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Location request timed out")]
    Timeout,
}

/// Informational notice shown when the fallback coordinate is in use
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNotice {
    pub message: String,
}

impl fmt::Display for LocationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A provider of the device's current position
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> std::result::Result<Coordinate, GeolocationError>;
}

/// Location source that always answers with the same result
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Option<Coordinate>);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_location(&self) -> std::result::Result<Coordinate, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}

/// Resolve the coordinate for a fetch cycle.
///
/// Geolocation failures never abort: the fallback coordinate is returned
/// together with a non-blocking notice.
pub async fn resolve_location(
    source: &dyn LocationSource,
    fallback: Coordinate,
) -> (Coordinate, Option<LocationNotice>) {
    match source.current_location().await {
        Ok(coordinate) => {
            debug!("Resolved device location: {}", coordinate.format_coordinates());
            (coordinate, None)
        }
        Err(e) => {
            let reason = match e {
                GeolocationError::PermissionDenied => "Location access denied",
                GeolocationError::Unsupported => "Geolocation not supported",
                GeolocationError::Timeout => "Location request timed out",
            };
            let message = format!(
                "{reason}. Using default location ({}).",
                fallback.format_coordinates()
            );
            info!("{}", message);
            (fallback, Some(LocationNotice { message }))
        }
    }
}
