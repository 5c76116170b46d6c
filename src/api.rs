//! Upstream HTTP clients
//!
//! This module provides async clients for the Open-Meteo weather and
//! air-quality APIs and for the forecast backend (ML forecast, heatmap,
//! version, login). Transient failures are retried with exponential
//! backoff; every other non-success status becomes a
//! [`SkyviewError::Api`] naming the source, and a request that gets no
//! response at all becomes [`SkyviewError::Connection`]. Bodies are returned
//! as raw JSON for the normalizer to interpret.

use crate::config::EndpointsConfig;
use crate::location::Coordinate;
use crate::session::{Credentials, Role, Session};
use crate::{Result, SkyviewError};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("Skyview/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,rain,weather_code,surface_pressure,wind_speed_10m,wind_direction_10m,visibility";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,sunrise,sunset,uv_index_max,precipitation_sum";
const HOURLY_FIELDS: &str = "relative_humidity_2m";

/// Responses slower than this are logged as a warning
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

pub const WEATHER_SOURCE: &str = "weather";
pub const AIR_QUALITY_SOURCE: &str = "air quality";
pub const FORECAST_SOURCE: &str = "forecast";
pub const HEATMAP_SOURCE: &str = "heatmap";
pub const VERSION_SOURCE: &str = "version";
pub const LOGIN_SOURCE: &str = "login";

/// Raw sections of a weather response, left untyped for the normalizer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherSections {
    #[serde(default)]
    pub current: Value,
    #[serde(default)]
    pub current_units: Value,
    #[serde(default)]
    pub daily: Value,
    #[serde(default)]
    pub hourly: Value,
}

#[derive(Debug, Serialize)]
struct ForecastRequest<'a> {
    lat: f64,
    lon: f64,
    property: &'a str,
}

#[derive(Debug, Serialize)]
struct HeatmapRequest {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: Value,
}

/// Build the shared HTTP client with timeout, user agent and retry policy
pub fn build_http_client(config: &EndpointsConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SkyviewError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Send a request and decode a successful JSON body.
///
/// Non-success statuses surface the body's `error` field when the server
/// sent one.
async fn send_json<T: serde::de::DeserializeOwned>(
    source: &str,
    request: RequestBuilder,
) -> Result<T> {
    let start_time = Instant::now();

    let response = request.send().await.map_err(|e| {
        warn!("Network error calling {} API: {}", source, e);
        SkyviewError::connection(source, e.to_string())
    })?;

    let status = response.status();
    let elapsed = start_time.elapsed();
    debug!(
        "{} API responded {} in {:.3}s",
        source,
        status,
        elapsed.as_secs_f64()
    );

    if elapsed > SLOW_RESPONSE {
        warn!("Slow {} API response: {:.3}s", source, elapsed.as_secs_f64());
    }

    if !status.is_success() {
        let body: Option<Value> = response.json().await.ok();
        let message = error_field(body.as_ref()).map_or_else(
            || format!("HTTP {status}"),
            |detail| format!("HTTP {status}: {detail}"),
        );
        warn!("{} API request failed: {}", source, message);
        return Err(SkyviewError::api(source, message));
    }

    response.json::<T>().await.map_err(|e| {
        warn!("Failed to parse {} response: {}", source, e);
        SkyviewError::api(source, format!("Invalid response body: {e}"))
    })
}

fn error_field(body: Option<&Value>) -> Option<String> {
    body?.get("error")?.as_str().map(str::to_string)
}

/// Client for the Open-Meteo weather and air-quality APIs
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: ClientWithMiddleware,
    weather_base_url: String,
    air_quality_base_url: String,
}

impl WeatherApiClient {
    pub fn new(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self::with_http(build_http_client(config)?, config))
    }

    /// Create a client sharing an existing HTTP client
    #[must_use]
    pub fn with_http(http: ClientWithMiddleware, config: &EndpointsConfig) -> Self {
        Self {
            http,
            weather_base_url: trim_base(&config.weather_base_url),
            air_quality_base_url: trim_base(&config.air_quality_base_url),
        }
    }

    /// Current conditions, daily aggregates and hourly humidity
    #[instrument(skip(self))]
    pub async fn weather(
        &self,
        coordinate: Coordinate,
        past_days: u32,
        forecast_days: u32,
    ) -> Result<WeatherSections> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&hourly={HOURLY_FIELDS}&past_days={past_days}&forecast_days={forecast_days}&timezone=auto",
            self.weather_base_url,
            coordinate.latitude(),
            coordinate.longitude(),
        );
        debug!("Weather API request URL: {}", url);

        let sections: WeatherSections = send_json(WEATHER_SOURCE, self.http.get(&url)).await?;
        info!(
            "Retrieved weather for {}",
            coordinate.format_coordinates()
        );
        Ok(sections)
    }

    /// Current US AQI; the raw body is returned for the normalizer
    #[instrument(skip(self))]
    pub async fn air_quality(&self, coordinate: Coordinate) -> Result<Value> {
        let url = format!(
            "{}/air-quality?latitude={}&longitude={}&current=us_aqi",
            self.air_quality_base_url,
            coordinate.latitude(),
            coordinate.longitude(),
        );
        debug!("Air quality API request URL: {}", url);

        let body: Value = send_json(AIR_QUALITY_SOURCE, self.http.get(&url)).await?;
        info!(
            "Retrieved air quality for {}",
            coordinate.format_coordinates()
        );
        Ok(body)
    }
}

/// Client for the forecast backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: ClientWithMiddleware,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self::with_http(build_http_client(config)?, config))
    }

    #[must_use]
    pub fn with_http(http: ClientWithMiddleware, config: &EndpointsConfig) -> Self {
        Self {
            http,
            base_url: trim_base(&config.backend_url),
        }
    }

    fn post<T: Serialize + ?Sized>(&self, source: &str, path: &str, body: &T) -> RequestBuilder {
        debug!("POST {}{} ({})", self.base_url, path, source);
        self.http.post(format!("{}{path}", self.base_url)).json(body)
    }

    /// ML forecast in whatever shape the backend returns
    #[instrument(skip(self))]
    pub async fn forecast(&self, coordinate: Coordinate, property: &str) -> Result<Value> {
        let body = ForecastRequest {
            lat: coordinate.latitude(),
            lon: coordinate.longitude(),
            property,
        };
        let payload: Value =
            send_json(FORECAST_SOURCE, self.post(FORECAST_SOURCE, "/forecast", &body)).await?;
        info!("Retrieved {} forecast for {}", property, coordinate.format_coordinates());
        Ok(payload)
    }

    /// Temperature grid around the coordinate
    #[instrument(skip(self))]
    pub async fn heatmap(&self, coordinate: Coordinate) -> Result<Value> {
        let body = HeatmapRequest {
            lat: coordinate.latitude(),
            lon: coordinate.longitude(),
        };
        send_json(HEATMAP_SOURCE, self.post(HEATMAP_SOURCE, "/heatmap", &body)).await
    }

    /// Backend version string, for display only
    #[instrument(skip(self))]
    pub async fn version(&self) -> Result<String> {
        let response: VersionResponse = send_json(
            VERSION_SOURCE,
            self.http.get(format!("{}/version", self.base_url)),
        )
        .await?;
        Ok(match response.version {
            Value::String(version) => version,
            other => other.to_string(),
        })
    }

    /// Submit credentials to the backend's login endpoint.
    ///
    /// The backend decides; a rejection becomes [`SkyviewError::Auth`]
    /// carrying its `error` message.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .post(LOGIN_SOURCE, "/login", credentials)
            .send()
            .await
            .map_err(|e| {
                warn!("Login request failed: {}", e);
                SkyviewError::connection(LOGIN_SOURCE, e.to_string())
            })?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = error_field(body.as_ref()).unwrap_or_else(|| "Invalid credentials".to_string());
            info!("Login rejected ({}): {}", status, message);
            return Err(SkyviewError::auth(message));
        }

        let role = body
            .as_ref()
            .and_then(|b| b.get("role"))
            .and_then(Value::as_str)
            .map_or(Role::Admin, Role::from_flag);

        info!("Login succeeded for '{}'", credentials.username);
        Ok(Session {
            username: credentials.username.clone(),
            role,
        })
    }
}
