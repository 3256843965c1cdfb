//! Location model for geographic coordinates and position samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seoul City Hall. Display fallback for map centring and labels only;
/// ranking never substitutes it for a missing position.
pub const SEOUL_CENTER: Coordinates = Coordinates {
    lat: 37.5665,
    lng: 126.9780,
};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and inside the WGS84 ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A single fix delivered by the platform location provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PositionSample {
    pub coordinates: Coordinates,
    /// Horizontal accuracy radius reported by the provider
    pub accuracy_meters: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl PositionSample {
    #[must_use]
    pub fn new(lat: f64, lng: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            coordinates: Coordinates::new(lat, lng),
            accuracy_meters: None,
            captured_at,
        }
    }

    /// Sample captured now
    #[must_use]
    pub fn now(lat: f64, lng: f64) -> Self {
        Self::new(lat, lng, Utc::now())
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }

    #[must_use]
    pub fn captured_at_millis(&self) -> i64 {
        self.captured_at.timestamp_millis()
    }

    /// Milliseconds from `earlier` to this sample; negative when this one is older
    #[must_use]
    pub fn millis_since(&self, earlier: &PositionSample) -> i64 {
        self.captured_at_millis() - earlier.captured_at_millis()
    }
}
