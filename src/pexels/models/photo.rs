use serde::{Deserialize, Serialize};

/// Resized renditions of a photo, keyed by the names the API uses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoSource {
    pub original: String,
    pub large: String,
    pub large2x: String,
    pub medium: String,
    pub small: String,
    pub portrait: String,
    pub square: String,
    pub landscape: String,
    pub tiny: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub photographer: String,
    pub photographer_url: String,
    pub src: PhotoSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedResult {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}
