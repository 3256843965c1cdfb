use async_trait::async_trait;

use super::ReverseGeocoder;
use crate::models::Coordinates;
use crate::tracking::error::{LocationError, Result};

struct District {
    name: &'static str,
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

// Approximate boxes; they overlap, first match wins.
const DISTRICTS: [District; 6] = [
    District { name: "Mapogu", north: 37.58, south: 37.53, east: 126.96, west: 126.89 },
    District { name: "Jongno-gu", north: 37.60, south: 37.56, east: 127.02, west: 126.94 },
    District { name: "Jung-gu", north: 37.58, south: 37.55, east: 127.02, west: 126.96 },
    District { name: "Yongsan-gu", north: 37.55, south: 37.52, east: 127.01, west: 126.94 },
    District { name: "Gangnam-gu", north: 37.52, south: 37.48, east: 127.08, west: 127.01 },
    District { name: "Songpa-gu", north: 37.52, south: 37.47, east: 127.14, west: 127.06 },
];

/// Offline approximate lookup of central Seoul districts
#[derive(Debug, Clone, Copy, Default)]
pub struct DistrictGeocoder;

impl DistrictGeocoder {
    #[must_use]
    pub fn district_of(coordinates: Coordinates) -> Option<&'static str> {
        DISTRICTS
            .iter()
            .find(|d| {
                (d.south..=d.north).contains(&coordinates.lat)
                    && (d.west..=d.east).contains(&coordinates.lng)
            })
            .map(|d| d.name)
    }
}

#[async_trait]
impl ReverseGeocoder for DistrictGeocoder {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String> {
        Self::district_of(coordinates)
            .map(|name| format!("Seoul, {name}"))
            .ok_or_else(|| {
                LocationError::GeocodingFailed(format!(
                    "no district covers {}",
                    coordinates.format_coordinates()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SEOUL_CENTER;
    use rstest::rstest;

    #[rstest]
    #[case(SEOUL_CENTER, Some("Jongno-gu"))]
    #[case(Coordinates::new(37.55, 126.92), Some("Mapogu"))]
    #[case(Coordinates::new(37.5512, 126.9882), Some("Jung-gu"))]
    #[case(Coordinates::new(37.5072, 127.0553), Some("Gangnam-gu"))]
    #[case(Coordinates::new(37.5120, 127.1020), Some("Songpa-gu"))]
    #[case(Coordinates::new(35.1796, 129.0756), None)]
    fn test_district_lookup(#[case] point: Coordinates, #[case] expected: Option<&str>) {
        assert_eq!(DistrictGeocoder::district_of(point), expected);
    }

    #[tokio::test]
    async fn test_outside_seoul_is_a_geocoding_failure() {
        let result = DistrictGeocoder
            .reverse_geocode(Coordinates::new(35.1796, 129.0756))
            .await;
        assert!(matches!(result, Err(LocationError::GeocodingFailed(_))));
    }
}
