//! Configuration for layout, viewport and rendering.
//!
//! Every struct deserializes with `#[serde(default)]`, so a partial JSON file
//! only overrides the fields it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Layered layout geometry, in world units (pixels at zoom 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between adjacent ranks along x.
    pub rank_sep: f64,
    /// Gap between adjacent items within a rank along y.
    pub node_sep: f64,
    /// Extent a virtual node occupies within its rank.
    pub edge_sep: f64,
    /// Upper bound on barycenter sweeps.
    pub ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 50.0,
            rank_sep: 100.0,
            node_sep: 30.0,
            edge_sep: 10.0,
            ordering_passes: 4,
        }
    }
}

/// Pan/zoom surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the content size kept as margin by `fit_to`.
    pub fit_padding: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
            fit_padding: 0.1,
        }
    }
}

/// SVG drawing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background: String,
    pub edge_color: String,
    pub edge_width: f64,
    pub label_color: String,
    pub font_size: f64,
    pub corner_radius: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#030712".to_string(),
            edge_color: "#64748b".to_string(),
            edge_width: 2.0,
            label_color: "#ffffff".to_string(),
            font_size: 12.0,
            corner_radius: 4.0,
        }
    }
}

/// Everything the coordinator needs, loadable from one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_config.rs"]
mod tests;
