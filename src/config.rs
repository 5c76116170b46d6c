//! Configuration management for `Skyview`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkyviewError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `Skyview`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyviewConfig {
    /// Upstream endpoint configuration
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default request settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Upstream endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the weather API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Base URL of the air-quality API
    #[serde(default = "default_air_quality_base_url")]
    pub air_quality_base_url: String,
    /// Base URL of the forecast backend (forecast, heatmap, version, login)
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Look-back window for daily history
    #[serde(default = "default_past_days")]
    pub past_days: u32,
    /// Forecast window for daily aggregates
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// Property requested from the forecast backend
    #[serde(default = "default_forecast_property")]
    pub forecast_property: String,
    /// Fallback latitude when no location is available
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Fallback longitude when no location is available
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_past_days() -> u32 {
    10
}

fn default_forecast_days() -> u32 {
    1
}

fn default_forecast_property() -> String {
    "T2M".to_string()
}

fn default_latitude() -> f64 {
    crate::location::DEFAULT_COORDINATE.latitude()
}

fn default_longitude() -> f64 {
    crate::location::DEFAULT_COORDINATE.longitude()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            weather_base_url: default_weather_base_url(),
            air_quality_base_url: default_air_quality_base_url(),
            backend_url: default_backend_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            past_days: default_past_days(),
            forecast_days: default_forecast_days(),
            forecast_property: default_forecast_property(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl Default for SkyviewConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl SkyviewConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYVIEW_ENDPOINTS__BACKEND_URL=... overrides endpoints.backend_url
        builder = builder.add_source(
            Environment::with_prefix("SKYVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkyviewConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Directory holding the config file and the persisted session flag
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skyview"))
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.endpoints.weather_base_url.is_empty() {
            self.endpoints.weather_base_url = default_weather_base_url();
        }
        if self.endpoints.air_quality_base_url.is_empty() {
            self.endpoints.air_quality_base_url = default_air_quality_base_url();
        }
        if self.endpoints.backend_url.is_empty() {
            self.endpoints.backend_url = default_backend_url();
        }
        if self.endpoints.timeout_seconds == 0 {
            self.endpoints.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.forecast_days == 0 {
            self.defaults.forecast_days = default_forecast_days();
        }
        if self.defaults.forecast_property.is_empty() {
            self.defaults.forecast_property = default_forecast_property();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.endpoints.timeout_seconds > 300 {
            return Err(SkyviewError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.endpoints.max_retries > 10 {
            return Err(SkyviewError::config("Max retries cannot exceed 10").into());
        }

        if self.defaults.past_days > 92 {
            return Err(SkyviewError::config("Past days cannot exceed 92").into());
        }

        if !(1..=16).contains(&self.defaults.forecast_days) {
            return Err(SkyviewError::config("Forecast days must be between 1 and 16").into());
        }

        crate::location::Coordinate::new(self.defaults.latitude, self.defaults.longitude)
            .map_err(|e| SkyviewError::config(format!("Default location: {}", e.user_message())))?;

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkyviewError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkyviewError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("weather_base_url", &self.endpoints.weather_base_url),
            ("air_quality_base_url", &self.endpoints.air_quality_base_url),
            ("backend_url", &self.endpoints.backend_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkyviewError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Fallback coordinate configured for this installation
    #[must_use]
    pub fn default_coordinate(&self) -> crate::location::Coordinate {
        crate::location::Coordinate::new(self.defaults.latitude, self.defaults.longitude)
            .unwrap_or(crate::location::DEFAULT_COORDINATE)
    }
}
