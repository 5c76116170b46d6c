//! Fetch cycles for the dashboard and forecast views
//!
//! A cycle validates the coordinate, fetches its sources concurrently,
//! normalizes them and commits the result into a [`ViewSlot`]. Only the most
//! recently begun cycle may commit; results of superseded cycles are dropped.

use crate::api::{BackendClient, WeatherApiClient};
use crate::config::{DefaultsConfig, SkyviewConfig};
use crate::location::Coordinate;
use crate::models::{DashboardView, ForecastView};
use crate::normalize::{
    compose_dashboard_view, normalize_air_quality, normalize_current, normalize_daily,
    normalize_forecast_series, normalize_heatmap_grid, normalize_hourly_humidity,
};
use crate::{Result, SkyviewError};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// A committed view together with what it was fetched for
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub coordinate: Coordinate,
    pub view: T,
    pub fetched_at: DateTime<Utc>,
}

/// Token handed out by [`ViewSlot::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleToken(u64);

/// Holder of the current view, replaced whole on each successful cycle
#[derive(Debug)]
pub struct ViewSlot<T> {
    latest: AtomicU64,
    current: RwLock<Option<(CycleToken, Arc<Snapshot<T>>)>>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self {
            latest: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }
}

impl<T> ViewSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle; any cycle begun earlier becomes stale
    pub fn begin(&self) -> CycleToken {
        CycleToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: CycleToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Install `snapshot` if no newer cycle has begun.
    ///
    /// Returns the installed snapshot, or `None` when the result was stale
    /// and discarded.
    pub async fn commit(&self, token: CycleToken, snapshot: Snapshot<T>) -> Option<Arc<Snapshot<T>>> {
        let mut current = self.current.write().await;
        if !self.is_current(token) {
            warn!(
                "Discarding stale result for {} (cycle {} superseded)",
                snapshot.coordinate.format_coordinates(),
                token.0
            );
            return None;
        }
        let snapshot = Arc::new(snapshot);
        *current = Some((token, Arc::clone(&snapshot)));
        Some(snapshot)
    }

    pub async fn current(&self) -> Option<Arc<Snapshot<T>>> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|(_, snapshot)| Arc::clone(snapshot))
    }

    /// Drop the view and invalidate cycles in flight
    pub async fn clear(&self) {
        let mut current = self.current.write().await;
        self.latest.fetch_add(1, Ordering::SeqCst);
        *current = None;
    }
}

/// What the backend said when asked for its version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Online(String),
    /// Reachable, but the version request did not succeed
    Unavailable,
    /// No response at all
    Offline,
}

impl BackendStatus {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Online(version) => version,
            Self::Unavailable => "Version unavailable",
            Self::Offline => "Offline",
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs fetch cycles against the upstream clients
#[derive(Debug)]
pub struct DashboardService {
    weather: WeatherApiClient,
    backend: BackendClient,
    defaults: DefaultsConfig,
    dashboard: ViewSlot<DashboardView>,
    forecast: ViewSlot<ForecastView>,
}

impl DashboardService {
    pub fn new(config: &SkyviewConfig) -> Result<Self> {
        let http = crate::api::build_http_client(&config.endpoints)?;
        Ok(Self::with_clients(
            WeatherApiClient::with_http(http.clone(), &config.endpoints),
            BackendClient::with_http(http, &config.endpoints),
            config.defaults.clone(),
        ))
    }

    #[must_use]
    pub fn with_clients(
        weather: WeatherApiClient,
        backend: BackendClient,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            weather,
            backend,
            defaults,
            dashboard: ViewSlot::new(),
            forecast: ViewSlot::new(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Fetch weather and air quality for `coordinate` and commit the
    /// composed dashboard.
    ///
    /// Both sources are required. If either fails the cycle fails with
    /// [`SkyviewError::FetchFailed`] and the previously committed view is
    /// left in place.
    #[instrument(skip(self))]
    pub async fn refresh(&self, latitude: f64, longitude: f64) -> Result<Arc<Snapshot<DashboardView>>> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let token = self.dashboard.begin();
        info!("Refreshing dashboard for {}", coordinate.format_coordinates());

        let (weather, air_quality) = tokio::join!(
            self.weather.weather(
                coordinate,
                self.defaults.past_days,
                self.defaults.forecast_days
            ),
            self.weather.air_quality(coordinate),
        );

        let (sections, air_quality) = match (weather, air_quality) {
            (Ok(sections), Ok(air_quality)) => (sections, air_quality),
            (weather, air_quality) => {
                let failures: Vec<SkyviewError> = [weather.err(), air_quality.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                let error = SkyviewError::fetch_failed(failures);
                warn!("Dashboard refresh failed: {}", error);
                return Err(error);
            }
        };

        let humidity = normalize_hourly_humidity(&sections.hourly);
        let days = (self.defaults.past_days + self.defaults.forecast_days) as usize;
        let daily = normalize_daily(&sections.daily, days)
            .into_iter()
            .map(|point| point.with_humidity(&humidity))
            .collect();

        let view = compose_dashboard_view(
            normalize_current(&sections.current, &sections.current_units),
            daily,
            normalize_air_quality(&air_quality),
        );

        let snapshot = Snapshot {
            coordinate,
            view,
            fetched_at: Utc::now(),
        };
        self.dashboard
            .commit(token, snapshot)
            .await
            .ok_or_else(|| SkyviewError::general("Refresh superseded by a newer request"))
    }

    /// Fetch the ML forecast and heatmap for `coordinate`.
    ///
    /// The forecast is required. The heatmap is an overlay; when it fails
    /// the view is committed without it.
    #[instrument(skip(self))]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        property: Option<&str>,
    ) -> Result<Arc<Snapshot<ForecastView>>> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let property = property
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(self.defaults.forecast_property.as_str());
        let token = self.forecast.begin();

        let (forecast, heatmap) = tokio::join!(
            self.backend.forecast(coordinate, property),
            self.backend.heatmap(coordinate),
        );

        let raw_forecast = forecast.map_err(|e| {
            let error = SkyviewError::fetch_failed(vec![e]);
            warn!("Forecast fetch failed: {}", error);
            error
        })?;

        let heatmap = match heatmap {
            Ok(raw_grid) => Some(normalize_heatmap_grid(&raw_grid)),
            Err(e) => {
                warn!("Heatmap unavailable, showing forecast without it: {}", e);
                None
            }
        };

        let fetched_at = Utc::now();
        let view = ForecastView {
            property: property.to_string(),
            issued_on: fetched_at.date_naive(),
            entries: normalize_forecast_series(&raw_forecast),
            heatmap,
        };
        info!(
            "Forecast for {}: {} entries",
            coordinate.format_coordinates(),
            view.entries.len()
        );

        self.forecast
            .commit(
                token,
                Snapshot {
                    coordinate,
                    view,
                    fetched_at,
                },
            )
            .await
            .ok_or_else(|| SkyviewError::general("Forecast superseded by a newer request"))
    }

    /// Backend version for display only
    pub async fn backend_version(&self) -> BackendStatus {
        match self.backend.version().await {
            Ok(version) => BackendStatus::Online(version),
            Err(e) if e.is_connection_failure() => {
                warn!("Backend offline: {}", e);
                BackendStatus::Offline
            }
            Err(e) => {
                warn!("Backend version unavailable: {}", e);
                BackendStatus::Unavailable
            }
        }
    }

    pub async fn current_dashboard(&self) -> Option<Arc<Snapshot<DashboardView>>> {
        self.dashboard.current().await
    }

    pub async fn current_forecast(&self) -> Option<Arc<Snapshot<ForecastView>>> {
        self.forecast.current().await
    }

    /// Drop every view; called on logout
    pub async fn clear(&self) {
        self.dashboard.clear().await;
        self.forecast.clear().await;
        info!("Cleared dashboard state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::DEFAULT_COORDINATE;

    fn snapshot(view: &'static str) -> Snapshot<&'static str> {
        Snapshot {
            coordinate: DEFAULT_COORDINATE,
            view,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_latest_begun_cycle_wins() {
        let slot = ViewSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.commit(second, snapshot("second")).await.is_some());
        assert!(slot.commit(first, snapshot("first")).await.is_none());
        assert_eq!(slot.current().await.map(|s| s.view), Some("second"));
    }

    #[tokio::test]
    async fn test_stale_commit_before_newer_completes() {
        let slot = ViewSlot::new();
        let first = slot.begin();
        assert!(slot.commit(first, snapshot("first")).await.is_some());

        let second = slot.begin();
        let third = slot.begin();
        assert!(slot.commit(second, snapshot("second")).await.is_none());
        assert_eq!(slot.current().await.map(|s| s.view), Some("first"));

        assert!(slot.commit(third, snapshot("third")).await.is_some());
        assert_eq!(slot.current().await.map(|s| s.view), Some("third"));
    }

    #[tokio::test]
    async fn test_clear_invalidates_in_flight_cycle() {
        let slot = ViewSlot::new();
        let token = slot.begin();
        slot.clear().await;

        assert!(slot.commit(token, snapshot("late")).await.is_none());
        assert!(slot.current().await.is_none());
    }

    #[test]
    fn test_backend_status_labels() {
        assert_eq!(BackendStatus::Online("2.0.1".to_string()).to_string(), "2.0.1");
        assert_eq!(BackendStatus::Unavailable.label(), "Version unavailable");
        assert_eq!(BackendStatus::Offline.label(), "Offline");
    }

    #[test]
    fn test_tokens_increase() {
        let slot: ViewSlot<()> = ViewSlot::new();
        let a = slot.begin();
        let b = slot.begin();
        assert!(b > a);
        assert!(slot.is_current(b));
        assert!(!slot.is_current(a));
    }
}
