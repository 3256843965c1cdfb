//! Landmark records and their categories

use serde::{Deserialize, Serialize};
use std::fmt;

use super::location::Coordinates;

/// Landmark category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Historical,
    Landmark,
    Shopping,
    Modern,
    Cultural,
}

/// Display metadata attached to a [`Category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub localized_name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Historical,
        Category::Landmark,
        Category::Shopping,
        Category::Modern,
        Category::Cultural,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Category::Historical => "historical",
            Category::Landmark => "landmark",
            Category::Shopping => "shopping",
            Category::Modern => "modern",
            Category::Cultural => "cultural",
        }
    }

    #[must_use]
    pub fn info(self) -> CategoryInfo {
        match self {
            Category::Historical => CategoryInfo {
                name: "Historical",
                localized_name: "역사",
                description: "Historical sites and traditional Korean culture",
                icon: "fas fa-landmark",
                color: "#8B4513",
            },
            Category::Landmark => CategoryInfo {
                name: "Landmark",
                localized_name: "랜드마크",
                description: "Iconic buildings and famous landmarks",
                icon: "fas fa-building",
                color: "#667eea",
            },
            Category::Shopping => CategoryInfo {
                name: "Shopping",
                localized_name: "쇼핑",
                description: "Shopping districts and commercial areas",
                icon: "fas fa-shopping-bag",
                color: "#ff6b6b",
            },
            Category::Modern => CategoryInfo {
                name: "Modern",
                localized_name: "현대",
                description: "Modern Seoul - business districts and urban life",
                icon: "fas fa-city",
                color: "#4ecdc4",
            },
            Category::Cultural => CategoryInfo {
                name: "Cultural",
                localized_name: "문화",
                description: "Cultural sites and traditional experiences",
                icon: "fas fa-home",
                color: "#45b7d1",
            },
        }
    }

    /// Parse a category id, case-insensitively
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|category| category.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Extra illustrated section shown on a landmark detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSection {
    pub title: String,
    pub image: Option<String>,
    pub description: String,
}

/// Immutable catalog record for a single landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub id: String,
    pub name: String,
    /// Korean name
    #[serde(alias = "nameKorean")]
    pub localized_name: String,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub entrance: Option<String>,
    #[serde(default)]
    pub nearby_subway: Option<String>,
    #[serde(default)]
    pub cultural_tips: Option<String>,
    #[serde(default)]
    pub detail_sections: Vec<DetailSection>,
}

impl Landmark {
    /// Walking directions link for the landmark
    #[must_use]
    pub fn directions_url(&self) -> String {
        format!(
            "https://maps.google.com/maps?daddr={},{}&dirflg=w",
            self.coordinates.lat, self.coordinates.lng
        )
    }

    /// Case-insensitive match against name, Korean name and tags
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&query)
            || self.localized_name.contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}
