use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Raw GeoJSON shapes, only the parts we read
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Geometry,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    // GeoJSON order: [lng, lat, (alt)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    arkeyo_link: Option<String>,
}

/// One archaeological site as loaded from the data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub external_link: Option<String>,
}

/// Parses a GeoJSON feature collection, keeping file order.
/// A feature without a [lng, lat] pair fails the whole collection.
pub fn parse_feature_collection(json: &str) -> Result<Vec<Feature>> {
    let collection: FeatureCollection =
        serde_json::from_str(json).context("Invalid GeoJSON feature collection")?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let (lng, lat) = match raw.geometry.coordinates.as_slice() {
                [lng, lat, ..] => (*lng, *lat),
                _ => anyhow::bail!(
                    "Feature #{} ({}) has no [lng, lat] coordinates",
                    i,
                    raw.properties.name
                ),
            };
            Ok(Feature {
                lat,
                lng,
                name: raw.properties.name,
                category: raw.properties.category,
                description: raw.properties.description,
                external_link: raw.properties.arkeyo_link.filter(|link| !link.trim().is_empty()),
            })
        })
        .collect()
}

/// Reads and parses the data file
pub async fn load_features(path: &Path) -> Result<Vec<Feature>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    parse_feature_collection(&json)
        .with_context(|| format!("Failed to parse data file {}", path.display()))
}
