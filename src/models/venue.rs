use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Venue map document saved by the map editor.
///
/// The engine only reads station identifiers from it; geometry and styling
/// fields are carried so the document round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueLayout {
    #[serde(default)]
    pub stations: Vec<StationPlacement>,

    #[serde(default)]
    pub labels: Vec<MapLabel>,

    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    /// Background image as a data URL
    #[serde(default)]
    pub background: Option<String>,

    #[serde(default)]
    pub bg_x: f64,

    #[serde(default)]
    pub bg_y: f64,

    #[serde(default = "default_scale")]
    pub bg_scale: f64,

    #[serde(default = "default_bg_opacity")]
    pub bg_opacity: f64,

    #[serde(default = "default_scale")]
    pub station_scale: f64,

    #[serde(default)]
    pub station_font_size: Option<f64>,
}

/// A station drawn on the venue map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPlacement {
    /// Matches the provider's station number
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub shape: StationShape,
    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationShape {
    #[default]
    Diamond,
    Cube,
}

/// Free text placed on the map (pool names etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLabel {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_bg_opacity() -> f64 {
    0.4
}

impl Default for VenueLayout {
    fn default() -> Self {
        Self {
            stations: Vec::new(),
            labels: Vec::new(),
            width: default_width(),
            height: default_height(),
            background: None,
            bg_x: 0.0,
            bg_y: 0.0,
            bg_scale: default_scale(),
            bg_opacity: default_bg_opacity(),
            station_scale: default_scale(),
            station_font_size: None,
        }
    }
}

impl VenueLayout {
    /// Load a layout from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context("Failed to read venue layout file")?;

        let layout: VenueLayout =
            serde_json::from_str(&content).context("Failed to parse venue layout JSON")?;

        info!(
            "Loaded venue layout with {} stations and {} labels",
            layout.stations.len(),
            layout.labels.len()
        );

        Ok(layout)
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station_ids(&self) -> BTreeSet<&str> {
        self.stations.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn has_station(&self, id: &str) -> bool {
        self.stations.iter().any(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_saved_layout() {
        let json = r##"{
            "stations": [
                {"id": "1", "x": 400, "y": 300, "shape": "diamond", "rotation": 0},
                {"id": "2", "x": 460, "y": 300, "shape": "cube", "rotation": 45}
            ],
            "labels": [
                {"id": "lbl-1", "text": "POOL A", "x": 400, "y": 250, "size": 24, "color": "#FFC300", "opacity": 1}
            ],
            "width": 1024,
            "height": 768,
            "background": null,
            "bgX": 0, "bgY": 0, "bgScale": 1, "bgOpacity": 0.4,
            "stationScale": 1.5
        }"##;

        let layout: VenueLayout = serde_json::from_str(json).unwrap();

        assert_eq!(layout.stations.len(), 2);
        assert_eq!(layout.stations[1].shape, StationShape::Cube);
        assert_eq!(layout.width, 1024.0);
        assert_eq!(layout.station_scale, 1.5);
        assert!(layout.has_station("2"));
        assert!(!layout.has_station("3"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let layout: VenueLayout = serde_json::from_str("{}").unwrap();

        assert!(layout.is_empty());
        assert_eq!(layout, VenueLayout::default());
    }
}
