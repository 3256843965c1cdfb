//! Seoul Explorer - nearby landmark discovery for Seoul
//!
//! This library provides the landmark catalog, great-circle proximity
//! ranking, and a self-healing location tracker that re-ranks landmarks as
//! the device moves.

pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod proximity;
pub mod tracking;

// Re-export core types for public API
pub use catalog::LandmarkCatalog;
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use favorites::FavoritesStore;
pub use geocoding::{DistrictGeocoder, FallbackGeocoder, GoogleGeocoder, ReverseGeocoder};
pub use models::{Category, Coordinates, Landmark, PositionSample, SEOUL_CENTER};
pub use proximity::{RankedLandmark, distance_km, format_distance, nearest, rank};
pub use tracking::{
    LocationError, LocationTracker, PositionProvider, TrackerEvent, TrackingPhase,
    TrackingSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
