//! Landmark catalog
//!
//! The catalog is loaded once, validated at the loading boundary and then
//! shared read-only. The built-in Seoul catalog is embedded at compile time.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{Category, Landmark};
use crate::{ExplorerError, Result};

const SEOUL_LANDMARKS: &str = include_str!("seoul_landmarks.json");

/// Ordered, validated, immutable list of landmarks
#[derive(Debug, Clone)]
pub struct LandmarkCatalog {
    landmarks: Vec<Arc<Landmark>>,
}

impl LandmarkCatalog {
    /// Validate records and build a catalog preserving their order
    pub fn new(records: Vec<Landmark>) -> Result<Self> {
        let mut seen = HashSet::new();
        for landmark in &records {
            validate_landmark(landmark)?;
            if !seen.insert(landmark.id.as_str()) {
                return Err(ExplorerError::validation(format!(
                    "duplicate landmark id '{}'",
                    landmark.id
                )));
            }
        }

        debug!("Validated {} landmarks", records.len());
        Ok(Self {
            landmarks: records.into_iter().map(Arc::new).collect(),
        })
    }

    /// The built-in Seoul catalog
    pub fn seoul() -> Result<Self> {
        Self::from_json_str(SEOUL_LANDMARKS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Landmark> = serde_json::from_str(json)
            .map_err(|e| ExplorerError::validation(format!("malformed landmark catalog: {e}")))?;
        Self::new(records)
    }

    /// Load a catalog from a JSON file holding an array of landmark records
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading landmark catalog from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Landmark>> {
        self.landmarks.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Landmark>> {
        self.landmarks.iter().find(|landmark| landmark.id == id)
    }

    /// Like [`get`](Self::get) but reports unknown ids as errors
    pub fn require(&self, id: &str) -> Result<&Arc<Landmark>> {
        self.get(id).ok_or_else(|| ExplorerError::not_found(id))
    }

    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Arc<Landmark>> {
        self.landmarks
            .iter()
            .filter(|landmark| landmark.category == category)
            .collect()
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Arc<Landmark>> {
        self.landmarks
            .iter()
            .filter(|landmark| landmark.matches(query))
            .collect()
    }
}

fn validate_landmark(landmark: &Landmark) -> Result<()> {
    let required = [
        ("id", &landmark.id),
        ("name", &landmark.name),
        ("localizedName", &landmark.localized_name),
        ("description", &landmark.description),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ExplorerError::validation(format!(
                "landmark '{}' has an empty {field}",
                landmark.id
            )));
        }
    }

    if !landmark.coordinates.is_valid() {
        return Err(ExplorerError::validation(format!(
            "landmark '{}' has invalid coordinates ({}, {})",
            landmark.id, landmark.coordinates.lat, landmark.coordinates.lng
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn landmark(id: &str, lat: f64, lng: f64) -> Landmark {
        Landmark {
            id: id.to_string(),
            name: format!("Landmark {id}"),
            localized_name: "랜드마크".to_string(),
            category: Category::Landmark,
            description: "test".to_string(),
            long_description: None,
            coordinates: Coordinates::new(lat, lng),
            icon: None,
            image: None,
            tags: vec![],
            tips: vec![],
            hours: None,
            entrance: None,
            nearby_subway: None,
            cultural_tips: None,
            detail_sections: vec![],
        }
    }

    #[test]
    fn test_builtin_catalog_loads_in_order() {
        let catalog = LandmarkCatalog::seoul().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "naksan-park",
                "namsan-tower",
                "myeongdong",
                "jayang-station",
                "lotte-world-tower",
                "jamsil-stadium",
                "bukchon-hanok",
                "samsung-station",
            ]
        );
        let myeongdong = catalog.get("myeongdong").unwrap();
        assert_eq!(myeongdong.detail_sections.len(), 4);
    }

    #[test]
    fn test_lookup_helpers() {
        let catalog = LandmarkCatalog::seoul().unwrap();
        assert_eq!(catalog.by_category(Category::Modern).len(), 3);
        assert_eq!(catalog.by_category(Category::Shopping).len(), 1);
        assert!(catalog.get("gyeongbokgung").is_none());
        assert!(matches!(
            catalog.require("gyeongbokgung"),
            Err(ExplorerError::NotFound { .. })
        ));

        let hits: Vec<&str> = catalog.search("views").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(hits, vec!["naksan-park", "namsan-tower", "lotte-world-tower"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = LandmarkCatalog::new(vec![
            landmark("a", 37.5, 127.0),
            landmark("a", 37.6, 127.1),
        ]);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let result = LandmarkCatalog::new(vec![landmark("north-of-north", 91.0, 127.0)]);
        assert!(result.unwrap_err().to_string().contains("invalid coordinates"));

        let result = LandmarkCatalog::new(vec![landmark("nan", f64::NAN, 127.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_required_field() {
        let mut record = landmark("blank", 37.5, 127.0);
        record.name = "  ".to_string();
        let result = LandmarkCatalog::new(vec![record]);
        assert!(result.unwrap_err().to_string().contains("empty name"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = LandmarkCatalog::from_json_str("[{\"id\": \"x\"}]");
        assert!(matches!(result, Err(ExplorerError::Validation { .. })));
    }
}
