//! Data models for the Skyview pipeline
//!
//! This module contains the canonical, display-ready records produced by the
//! normalizer, organized by source:
//! - Current: current conditions and their units
//! - Daily: daily aggregates and derived history points
//! - Air quality: US AQI sample and its category
//! - Forecast: ML forecast series entries
//! - Heatmap: temperature grid cells for the intensity overlay
//! - Dashboard: the composed tile record set

pub mod air_quality;
pub mod current;
pub mod daily;
pub mod dashboard;
pub mod forecast;
pub mod heatmap;

// Re-export all public types for convenient access
pub use air_quality::{AirQualitySample, AqiCategory};
pub use current::CurrentConditions;
pub use daily::{DailyPoint, HistoryPoint};
pub use dashboard::{DashboardView, ForecastView};
pub use forecast::ForecastDayEntry;
pub use heatmap::{HEATMAP_INTENSITY_SCALE, HeatmapCell};

/// Placeholder shown for an absent measurement
pub const ABSENT: &str = "n/a";

/// Format an optional measurement with one decimal and a unit suffix.
/// Absent values render as [`ABSENT`], never as zero.
#[must_use]
pub fn format_measurement(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => ABSENT.to_string(),
    }
}
