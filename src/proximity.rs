//! Great-circle distance and proximity ranking of catalog landmarks

use std::f64::consts::PI;
use std::sync::Arc;

use crate::catalog::LandmarkCatalog;
use crate::models::{Coordinates, Landmark};

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Exactly antipodal inputs can round `a` just above 1, which the formula
/// turns into NaN; that case is the half circumference.
#[must_use]
pub fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let distance = haversine::distance(
        haversine::Location {
            latitude: from.lat,
            longitude: from.lng,
        },
        haversine::Location {
            latitude: to.lat,
            longitude: to.lng,
        },
        haversine::Units::Kilometers,
    );

    if distance.is_nan() {
        PI * EARTH_RADIUS_KM
    } else {
        distance
    }
}

/// Round to 0.1 km for display
#[must_use]
pub fn round_to_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Format a distance the way landmark cards show it
#[must_use]
pub fn format_distance(km: f64) -> String {
    format!("{km:.1} km")
}

/// A landmark annotated with its distance from a reference point
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLandmark {
    pub landmark: Arc<Landmark>,
    pub distance_km: f64,
}

impl RankedLandmark {
    #[must_use]
    pub fn rounded_km(&self) -> f64 {
        round_to_tenth(self.distance_km)
    }

    #[must_use]
    pub fn display_distance(&self) -> String {
        format_distance(self.distance_km)
    }
}

/// Every catalog entry, nearest first.
///
/// The sort is stable, so equidistant landmarks keep catalog order.
#[must_use]
pub fn rank(reference: &Coordinates, catalog: &LandmarkCatalog) -> Vec<RankedLandmark> {
    let mut ranked: Vec<RankedLandmark> = catalog
        .iter()
        .map(|landmark| RankedLandmark {
            landmark: Arc::clone(landmark),
            distance_km: distance_km(reference, &landmark.coordinates),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// The `limit` closest landmarks
#[must_use]
pub fn nearest(
    reference: &Coordinates,
    catalog: &LandmarkCatalog,
    limit: usize,
) -> Vec<RankedLandmark> {
    let mut ranked = rank(reference, catalog);
    ranked.truncate(limit);
    ranked
}

/// Landmarks within `radius_km` of the reference, nearest first
#[must_use]
pub fn within_radius(
    reference: &Coordinates,
    catalog: &LandmarkCatalog,
    radius_km: f64,
) -> Vec<RankedLandmark> {
    rank(reference, catalog)
        .into_iter()
        .take_while(|ranked| ranked.distance_km <= radius_km)
        .collect()
}
