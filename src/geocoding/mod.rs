//! Reverse geocoding
//!
//! Turns a position into a place label for the location banner. Lookups are
//! best effort: any failure degrades the label to raw coordinates and never
//! blocks proximity ranking.

pub mod districts;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::models::Coordinates;
use crate::tracking::error::Result;

pub use districts::DistrictGeocoder;
pub use google::GoogleGeocoder;

/// Converts coordinates into a human-readable place description
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String>;
}

/// Tries `primary` and asks `fallback` when it fails
pub struct FallbackGeocoder {
    primary: Arc<dyn ReverseGeocoder>,
    fallback: Arc<dyn ReverseGeocoder>,
}

impl FallbackGeocoder {
    pub fn new(primary: Arc<dyn ReverseGeocoder>, fallback: Arc<dyn ReverseGeocoder>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ReverseGeocoder for FallbackGeocoder {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String> {
        match self.primary.reverse_geocode(coordinates).await {
            Ok(label) => Ok(label),
            Err(e) => {
                debug!("Primary geocoder failed: {}, trying fallback", e);
                self.fallback.reverse_geocode(coordinates).await
            }
        }
    }
}

/// Pick the geocoder the configuration allows. With an API key, Google is
/// asked first and the district lookup covers its failures.
pub fn geocoder_from_config(config: &GeocodingConfig) -> Result<Arc<dyn ReverseGeocoder>> {
    match &config.api_key {
        Some(_) => Ok(Arc::new(FallbackGeocoder::new(
            Arc::new(GoogleGeocoder::new(config)?),
            Arc::new(DistrictGeocoder),
        ))),
        None => {
            warn!("Geocoding API key not configured, using approximate district lookup");
            Ok(Arc::new(DistrictGeocoder))
        }
    }
}

/// Resolve a display label, falling back to the raw coordinates
pub async fn resolve_label(geocoder: &dyn ReverseGeocoder, coordinates: Coordinates) -> String {
    match geocoder.reverse_geocode(coordinates).await {
        Ok(label) => label,
        Err(e) => {
            debug!("Reverse geocoding failed: {}, using coordinates as label", e);
            coordinates.format_coordinates()
        }
    }
}
