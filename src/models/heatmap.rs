//! Heatmap grid cell

use serde::{Deserialize, Serialize};

/// Divisor mapping temperature onto the overlay's 0..1 intensity scale
pub const HEATMAP_INTENSITY_SCALE: f64 = 40.0;

/// Grid cell with a valid temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
}

impl HeatmapCell {
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.temperature / HEATMAP_INTENSITY_SCALE
    }
}
