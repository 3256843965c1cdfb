//! Google Geocoding API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ReverseGeocoder;
use crate::config::GeocodingConfig;
use crate::models::Coordinates;
use crate::tracking::error::{LocationError, Result};

/// Reverse geocoder backed by the Google Geocoding web service
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocationError::GeocodingFailed("missing geocoding API key".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("SeoulExplorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LocationError::GeocodingFailed(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
        })
    }

    fn request_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}?latlng={},{}&language={}&region={}&key={}",
            self.base_url,
            coordinates.lat,
            coordinates.lng,
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocoder {
    #[instrument(name = "reverse_geocode", level = "debug", skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String> {
        let response = self
            .client
            .get(self.request_url(coordinates))
            .send()
            .await
            .map_err(|e| LocationError::GeocodingFailed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LocationError::GeocodingFailed(format!(
                "geocoding service returned {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| LocationError::GeocodingFailed(format!("unreadable response: {e}")))?;

        label_from_response(&body)
    }
}

fn label_from_response(response: &GeocodeResponse) -> Result<String> {
    if response.status != "OK" {
        return Err(LocationError::GeocodingFailed(format!(
            "geocoding status {}",
            response.status
        )));
    }

    let first = response
        .results
        .first()
        .ok_or_else(|| LocationError::GeocodingFailed("no geocoding results found".into()))?;

    let label = format_address(&first.address_components);
    debug!("Resolved address label: {}", label);
    Ok(label)
}

/// `Seoul[, district][ route | sublocality]`
fn format_address(components: &[AddressComponent]) -> String {
    let mut district = None;
    let mut sublocality = None;
    let mut route = None;

    for component in components {
        let has = |kind: &str| component.types.iter().any(|t| t == kind);
        if has("sublocality_level_1") {
            district = Some(component.long_name.as_str());
        } else if has("sublocality_level_2") {
            sublocality = Some(component.long_name.as_str());
        } else if has("route") {
            route = Some(component.long_name.as_str());
        }
    }

    let mut label = String::from("Seoul");
    if let Some(district) = district {
        label.push_str(", ");
        label.push_str(&romanize_district(district));
    }
    if let Some(street) = route.or(sublocality) {
        label.push(' ');
        label.push_str(street);
    }
    label
}

fn romanize_district(name: &str) -> String {
    let name = name.replace("서울특별시", "Seoul");
    if let Some(stem) = name.strip_suffix('구') {
        format!("{stem}gu")
    } else if let Some(stem) = name.strip_suffix('동') {
        format!("{stem}dong")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_label_with_district_and_route() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"long_name": "Sejong-daero", "types": ["route"]},
                        {
                            "long_name": "Jung-gu",
                            "types": ["political", "sublocality", "sublocality_level_1"]
                        },
                        {"long_name": "Seoul", "types": ["locality", "political"]}
                    ]
                }]
            }"#,
        );
        assert_eq!(label_from_response(&response).unwrap(), "Seoul, Jung-gu Sejong-daero");
    }

    #[test]
    fn test_label_uses_sublocality_without_route() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"long_name": "Myeong-dong", "types": ["sublocality_level_2"]},
                        {"long_name": "중구", "types": ["sublocality_level_1"]}
                    ]
                }]
            }"#,
        );
        assert_eq!(label_from_response(&response).unwrap(), "Seoul, 중gu Myeong-dong");
    }

    #[test]
    fn test_error_statuses() {
        let denied = parse(r#"{"status": "REQUEST_DENIED", "results": []}"#);
        assert!(matches!(
            label_from_response(&denied),
            Err(LocationError::GeocodingFailed(_))
        ));

        let empty = parse(r#"{"status": "OK"}"#);
        assert!(label_from_response(&empty).is_err());
    }

    #[test]
    fn test_romanize_district() {
        assert_eq!(romanize_district("종로구"), "종로gu");
        assert_eq!(romanize_district("명동"), "명dong");
        assert_eq!(romanize_district("Gangnam-gu"), "Gangnam-gu");
    }

    #[test]
    fn test_request_url() {
        let config = GeocodingConfig {
            api_key: Some("test key+1".to_string()),
            ..GeocodingConfig::default()
        };
        let geocoder = GoogleGeocoder::new(&config).unwrap();
        let url = geocoder.request_url(Coordinates::new(37.5665, 126.978));
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/geocode/json\
             ?latlng=37.5665,126.978&language=en&region=US&key=test%20key%2B1"
        );
    }

    #[test]
    fn test_requires_api_key() {
        assert!(GoogleGeocoder::new(&GeocodingConfig::default()).is_err());
    }
}
