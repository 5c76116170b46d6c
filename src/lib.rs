//! `Skyview` - weather dashboard data pipeline
//!
//! This library fetches current conditions, daily aggregates, air quality,
//! ML forecasts and temperature heatmaps, and normalizes the loosely shaped
//! upstream JSON into typed view records for display.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod session;

// Re-export core types for public API
pub use api::{BackendClient, WeatherApiClient};
pub use config::SkyviewConfig;
pub use dashboard::{BackendStatus, DashboardService, Snapshot, ViewSlot};
pub use error::SkyviewError;
pub use location::{Coordinate, LocationNotice, LocationSource, resolve_location};
pub use models::{DashboardView, ForecastDayEntry, ForecastView, HeatmapCell};
pub use session::{Credentials, IdentityProvider, Role, Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkyviewError>;
