//! Composition guides drawn inside the crop rectangle.

use crate::foundation::{
    core::{CropRect, Line, Point},
    error::{CropError, CropResult},
};

use super::surface::RenderSurface;

const GOLDEN_MINOR: f64 = 0.381_966_011_250_105_1; // 1 - 1/φ

/// Guide style.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    /// No guides.
    #[default]
    None,
    /// Rule of thirds.
    Thirds,
    /// Golden-ratio (phi) grid.
    Golden,
    /// Even 4x4 cell grid.
    Grid,
    /// Corner-to-corner diagonals.
    Diagonal,
}

impl GridType {
    /// Stable token used by the UI layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thirds => "thirds",
            Self::Golden => "golden",
            Self::Grid => "grid",
            Self::Diagonal => "diagonal",
        }
    }
}

impl std::str::FromStr for GridType {
    type Err = CropError;

    fn from_str(s: &str) -> CropResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "thirds" | "rule-of-thirds" => Ok(Self::Thirds),
            "golden" | "phi" => Ok(Self::Golden),
            "grid" => Ok(Self::Grid),
            "diagonal" => Ok(Self::Diagonal),
            other => Err(CropError::validation(format!("unknown grid type '{other}'"))),
        }
    }
}

/// Guide segments for `grid` inside `rect`.
pub fn grid_lines(rect: &CropRect, grid: GridType) -> Vec<Line> {
    match grid {
        GridType::None => Vec::new(),
        GridType::Thirds => fractional_lines(rect, &[1.0 / 3.0, 2.0 / 3.0]),
        GridType::Golden => fractional_lines(rect, &[GOLDEN_MINOR, 1.0 - GOLDEN_MINOR]),
        GridType::Grid => fractional_lines(rect, &[0.25, 0.5, 0.75]),
        GridType::Diagonal => vec![
            Line::new(Point::new(rect.x, rect.y), Point::new(rect.right(), rect.bottom())),
            Line::new(Point::new(rect.right(), rect.y), Point::new(rect.x, rect.bottom())),
        ],
    }
}

fn fractional_lines(rect: &CropRect, fractions: &[f64]) -> Vec<Line> {
    let mut lines = Vec::with_capacity(fractions.len() * 2);
    for &f in fractions {
        let x = rect.x + rect.width * f;
        lines.push(Line::new(Point::new(x, rect.y), Point::new(x, rect.bottom())));
    }
    for &f in fractions {
        let y = rect.y + rect.height * f;
        lines.push(Line::new(Point::new(rect.x, y), Point::new(rect.right(), y)));
    }
    lines
}

/// Stroke the guides for `grid` onto `surface`.
pub fn draw_grid(surface: &mut dyn RenderSurface, rect: &CropRect, grid: GridType, rgba: [u8; 4]) {
    for line in grid_lines(rect, grid) {
        surface.draw_line(line, rgba);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/grid.rs"]
mod tests;
