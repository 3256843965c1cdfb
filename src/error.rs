//! Error types and handling for the Seoul Explorer application

use thiserror::Error;

use crate::tracking::LocationError;

/// Main error type for the Seoul Explorer application
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Catalog or input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup of an unknown landmark
    #[error("Unknown landmark: {id}")]
    NotFound { id: String },

    /// Favorites storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Location acquisition or geocoding errors
    #[error(transparent)]
    Location(#[from] LocationError),

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExplorerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ExplorerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ExplorerError::NotFound { id } => {
                format!("No landmark with id '{id}'.")
            }
            ExplorerError::Storage { .. } => {
                "Favorites could not be saved. You may need to clear the favorites store."
                    .to_string()
            }
            ExplorerError::Location(err) if err.is_acquisition() => {
                "Location unavailable. Please enable location services.".to_string()
            }
            ExplorerError::Location(_) => {
                "Address lookup failed; showing coordinates instead.".to_string()
            }
            ExplorerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_creation() {
        let config_err = ExplorerError::config("missing API key");
        assert!(matches!(config_err, ExplorerError::Config { .. }));

        let validation_err = ExplorerError::validation("invalid coordinates");
        assert!(matches!(validation_err, ExplorerError::Validation { .. }));

        let not_found = ExplorerError::not_found("gyeongbokgung");
        assert_eq!(not_found.to_string(), "Unknown landmark: gyeongbokgung");
    }

    #[test]
    fn test_user_messages() {
        let config_err = ExplorerError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = ExplorerError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let timeout: ExplorerError =
            LocationError::AcquisitionTimeout(Duration::from_secs(10)).into();
        assert!(timeout.user_message().contains("Location unavailable"));

        let geocoding: ExplorerError = LocationError::GeocodingFailed("offline".into()).into();
        assert!(geocoding.user_message().contains("coordinates"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let explorer_err: ExplorerError = io_err.into();
        assert!(matches!(explorer_err, ExplorerError::Io { .. }));
    }
}
