use std::time::Duration;

use thiserror::Error;

/// Failures reported by the position provider and the reverse geocoder.
///
/// Acquisition errors feed the retry policy; none of them is surfaced to
/// callers as a hard failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Position acquisition timed out after {0:?}")]
    AcquisitionTimeout(Duration),

    #[error("Location permission denied: {0}")]
    AcquisitionDenied(String),

    #[error("Location capability unavailable: {0}")]
    AcquisitionUnavailable(String),

    #[error("Reverse geocoding failed: {0}")]
    GeocodingFailed(String),
}

impl LocationError {
    /// True for the errors that count against the retry budget
    #[must_use]
    pub fn is_acquisition(&self) -> bool {
        !matches!(self, LocationError::GeocodingFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, LocationError>;
