use serde_json::Value;

use crate::models::HeatmapCell;

fn finite(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// Keep the grid points that carry a finite numeric temperature.
///
/// Accepts the bare point array or the `{grid: [...]}` response. Points
/// with a null or non-numeric `temp` (or unusable coordinates) are dropped;
/// nothing is interpolated or defaulted.
#[must_use]
pub fn normalize_heatmap_grid(raw_grid: &Value) -> Vec<HeatmapCell> {
    let points = match raw_grid {
        Value::Array(points) => points.as_slice(),
        other => other
            .get("grid")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
    };

    points
        .iter()
        .filter_map(|point| {
            Some(HeatmapCell {
                latitude: finite(point.get("lat"))?,
                longitude: finite(point.get("lon"))?,
                temperature: finite(point.get("temp"))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_null_and_non_numeric() {
        let raw = json!([
            {"lat": 1, "lon": 1, "temp": 20},
            {"lat": 2, "lon": 2, "temp": null},
            {"lat": 3, "lon": 3, "temp": "x"}
        ]);
        let cells = normalize_heatmap_grid(&raw);
        assert_eq!(
            cells,
            vec![HeatmapCell {
                latitude: 1.0,
                longitude: 1.0,
                temperature: 20.0
            }]
        );
        assert_eq!(cells[0].intensity(), 0.5);
    }

    #[test]
    fn test_grid_wrapper_and_order() {
        let raw = json!({"grid": [
            {"lat": 20.0, "lon": 78.0, "temp": 30.0},
            {"lat": 20.5, "lon": 78.0},
            {"lat": 21.0, "lon": 78.5, "temp": -4.0}
        ]});
        let cells = normalize_heatmap_grid(&raw);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].intensity(), 0.75);
        assert_eq!(cells[1].temperature, -4.0);
        assert_eq!(cells[1].intensity(), -0.1);
    }

    #[test]
    fn test_zero_temperature_is_kept() {
        let cells = normalize_heatmap_grid(&json!([{"lat": 0, "lon": 0, "temp": 0}]));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].intensity(), 0.0);
    }

    #[test]
    fn test_missing_grid_is_empty() {
        assert!(normalize_heatmap_grid(&json!({"error": "no data"})).is_empty());
        assert!(normalize_heatmap_grid(&json!(null)).is_empty());
    }
}
