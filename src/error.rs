//! Error types and handling for the `Skyview` pipeline

use crate::api::LOGIN_SOURCE;
use thiserror::Error;

/// Main error type for the `Skyview` pipeline
#[derive(Error, Debug)]
pub enum SkyviewError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A single upstream call failed (status, connection or body)
    #[error("API error ({source_name}): {message}")]
    Api {
        source_name: String,
        message: String,
    },

    /// An upstream could not be reached at all (no HTTP response)
    #[error("Connection to {source_name} failed: {message}")]
    Connection {
        source_name: String,
        message: String,
    },

    /// A fetch cycle failed because one or more required sources failed
    #[error("Fetch failed: {}", .sources.join(", "))]
    FetchFailed { sources: Vec<String> },

    /// Input validation errors, raised before any network use
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The identity provider rejected the credentials
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl SkyviewError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error for the named upstream source
    pub fn api<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Api {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a new connection error for the named upstream source
    pub fn connection<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Connection {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// True when no HTTP response was received
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, SkyviewError::Connection { .. })
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Collapse the failures of one fetch cycle into a single error.
    ///
    /// Only `Api` errors contribute a source name; anything else is kept
    /// as its display text so the notice still says what went wrong.
    #[must_use]
    pub fn fetch_failed(errors: Vec<SkyviewError>) -> Self {
        let sources = errors
            .into_iter()
            .map(|e| match e {
                SkyviewError::Api { source_name, .. }
                | SkyviewError::Connection { source_name, .. } => source_name,
                other => other.to_string(),
            })
            .collect();
        Self::FetchFailed { sources }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkyviewError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkyviewError::Api { source_name, .. } | SkyviewError::Connection { source_name, .. }
                if source_name == LOGIN_SOURCE =>
            {
                "Connection failed.".to_string()
            }
            SkyviewError::Api { .. }
            | SkyviewError::Connection { .. }
            | SkyviewError::FetchFailed { .. } => {
                "Failed to fetch weather data. Please check your connection and try again."
                    .to_string()
            }
            SkyviewError::Validation { message } => message.clone(),
            SkyviewError::Auth { message } => message.clone(),
            SkyviewError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SkyviewError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SkyviewError::config("bad url");
        assert!(matches!(config_err, SkyviewError::Config { .. }));

        let api_err = SkyviewError::api("weather", "connection refused");
        assert!(matches!(api_err, SkyviewError::Api { .. }));

        let validation_err = SkyviewError::validation("Latitude must be between -90 and 90");
        assert!(matches!(validation_err, SkyviewError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let api_err = SkyviewError::api("air quality", "HTTP 500");
        assert!(api_err.user_message().contains("Failed to fetch weather data"));

        let validation_err = SkyviewError::validation("Longitude must be between -180 and 180");
        assert_eq!(
            validation_err.user_message(),
            "Longitude must be between -180 and 180"
        );

        let auth_err = SkyviewError::auth("invalid credentials");
        assert_eq!(auth_err.user_message(), "invalid credentials");
    }

    #[test]
    fn test_login_connection_failure_message() {
        let err = SkyviewError::connection(LOGIN_SOURCE, "tcp connect error");
        assert!(err.is_connection_failure());
        assert_eq!(err.user_message(), "Connection failed.");

        let err = SkyviewError::connection("forecast", "tcp connect error");
        assert!(err.user_message().contains("Failed to fetch weather data"));
        assert!(!SkyviewError::api("version", "HTTP 500").is_connection_failure());
    }

    #[test]
    fn test_fetch_failed_collects_sources() {
        let err = SkyviewError::fetch_failed(vec![
            SkyviewError::connection("weather", "timeout"),
            SkyviewError::api("air quality", "HTTP 502"),
        ]);
        match &err {
            SkyviewError::FetchFailed { sources } => {
                assert_eq!(sources, &vec!["weather".to_string(), "air quality".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "Fetch failed: weather, air quality");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SkyviewError = io_err.into();
        assert!(matches!(err, SkyviewError::Io { .. }));
    }
}
