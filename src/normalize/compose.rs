use crate::models::{AirQualitySample, CurrentConditions, DailyPoint, DashboardView};

/// Approximate dew point: `temperature - (100 - humidity) / 5`.
///
/// This is a rule of thumb that is only reasonable for humid air. It is not
/// a physical model and should be labelled as approximate wherever shown.
/// Absent when either input is absent.
#[must_use]
pub fn approximate_dew_point(temperature: Option<f64>, humidity_percent: Option<f64>) -> Option<f64> {
    Some(temperature? - (100.0 - humidity_percent?) / 5.0)
}

/// Merge current conditions, the daily series and air quality into the
/// dashboard tiles.
///
/// Today is the daily point dated like the current observation, else the
/// last point. Points before it become the history series.
#[must_use]
pub fn compose_dashboard_view(
    current: CurrentConditions,
    daily: Vec<DailyPoint>,
    air_quality: AirQualitySample,
) -> DashboardView {
    let observed_date = current.observed_at.map(|at| at.date());
    let today_index = observed_date
        .and_then(|date| daily.iter().position(|p| p.date == Some(date)))
        .or_else(|| daily.len().checked_sub(1));

    let (history, today) = match today_index {
        Some(index) => (
            daily[..index].iter().map(DailyPoint::history_point).collect(),
            daily.get(index).cloned(),
        ),
        None => (Vec::new(), None),
    };

    DashboardView {
        dew_point: approximate_dew_point(current.temperature, current.humidity_percent),
        air_quality_category: air_quality.category(),
        current,
        today,
        air_quality,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AqiCategory;
    use chrono::NaiveDate;

    fn day(d: u32, avg: f64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 3, d),
            temperature_max: Some(avg + 4.0),
            temperature_min: Some(avg - 4.0),
            temperature_avg: Some(avg),
            ..Default::default()
        }
    }

    #[test]
    fn test_dew_point() {
        assert_eq!(approximate_dew_point(Some(20.0), Some(80.0)), Some(16.0));
        assert_eq!(approximate_dew_point(Some(20.0), None), None);
        assert_eq!(approximate_dew_point(None, Some(50.0)), None);
    }

    #[test]
    fn test_today_matched_by_observation_date() {
        let current = CurrentConditions {
            observed_at: NaiveDate::from_ymd_opt(2026, 3, 12).and_then(|d| d.and_hms_opt(9, 0, 0)),
            temperature: Some(10.0),
            humidity_percent: Some(75.0),
            ..Default::default()
        };
        let daily = vec![day(10, 5.0), day(11, 6.0), day(12, 7.0), day(13, 8.0)];

        let view = compose_dashboard_view(current, daily, AirQualitySample { us_aqi: Some(30) });
        assert_eq!(view.today.as_ref().and_then(|t| t.date), NaiveDate::from_ymd_opt(2026, 3, 12));
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.history[1].temperature_avg, Some(6.0));
        assert_eq!(view.dew_point, Some(5.0));
        assert_eq!(view.air_quality_category, Some(AqiCategory::Good));
    }

    #[test]
    fn test_today_defaults_to_last_point() {
        let daily = vec![day(10, 5.0), day(11, 6.0), day(12, 7.0)];
        let view = compose_dashboard_view(
            CurrentConditions::default(),
            daily,
            AirQualitySample { us_aqi: Some(75) },
        );
        assert_eq!(view.today.as_ref().and_then(|t| t.temperature_avg), Some(7.0));
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.dew_point, None);
        assert_eq!(view.air_quality_category, Some(AqiCategory::Moderate));
    }

    #[test]
    fn test_empty_daily_series() {
        let view = compose_dashboard_view(
            CurrentConditions::default(),
            Vec::new(),
            AirQualitySample::default(),
        );
        assert!(view.today.is_none());
        assert!(view.history.is_empty());
        assert!(view.air_quality_category.is_none());
    }
}
