use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CropError, CropResult};

/// Editor tunables. Defaults reproduce the stock crop tool; every field may be
/// omitted from a JSON config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Minimum crop width/height in canvas pixels.
    pub min_crop_size: f64,
    /// Hit-test margin around corners and edges, in canvas pixels.
    pub hit_margin: f64,
    /// Upper bound for the display canvas side; `None` keeps `scale == 1`.
    pub max_canvas_side: Option<u32>,
    /// Dim colour painted outside the crop rectangle (straight RGBA).
    pub overlay_rgba: [u8; 4],
    /// Crop boundary stroke colour.
    pub stroke_rgba: [u8; 4],
    /// Boundary dash pattern `[on, off]` in pixels.
    pub dash: [f64; 2],
    /// Composition guide colour.
    pub grid_rgba: [u8; 4],
    /// Colour of the "locked" label plate.
    pub label_rgba: [u8; 4],
    /// Maximum number of undo entries kept.
    pub history_depth: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_crop_size: 10.0,
            hit_margin: 20.0,
            max_canvas_side: None,
            overlay_rgba: [0, 0, 0, 128],
            stroke_rgba: [255, 255, 255, 255],
            dash: [6.0, 4.0],
            grid_rgba: [255, 255, 255, 96],
            label_rgba: [20, 20, 20, 200],
            history_depth: 50,
        }
    }
}

impl CropConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> CropResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> CropResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read crop config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check value ranges.
    pub fn validate(&self) -> CropResult<()> {
        if !(self.min_crop_size.is_finite() && self.min_crop_size > 0.0) {
            return Err(CropError::validation("min_crop_size must be > 0"));
        }
        if !(self.hit_margin.is_finite() && self.hit_margin >= 0.0) {
            return Err(CropError::validation("hit_margin must be >= 0"));
        }
        if self.max_canvas_side == Some(0) {
            return Err(CropError::validation("max_canvas_side must be > 0"));
        }
        if self.dash.iter().any(|d| !(d.is_finite() && *d > 0.0)) {
            return Err(CropError::validation("dash lengths must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
