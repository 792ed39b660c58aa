use crate::foundation::{
    error::{CropError, CropResult},
    math::gcd,
};

/// Aspect-ratio selection as exposed to the UI layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AspectToken {
    /// Unlocked: any width/height.
    Free,
    /// Lock to the primary image's last committed aspect ratio.
    Main,
    /// Lock to `width:height`.
    Ratio {
        /// Ratio numerator.
        width: u32,
        /// Ratio denominator, never zero.
        height: u32,
    },
}

impl AspectToken {
    /// Tokens offered by the editor toolbar, in display order.
    pub const PRESETS: [&'static str; 9] = [
        "free", "main", "1:1", "4:3", "3:2", "16:9", "9:16", "5:4", "4:5",
    ];

    /// Fixed `width / height` for [`AspectToken::Ratio`]; `None` otherwise.
    pub fn fixed_ratio(self) -> Option<f64> {
        match self {
            Self::Ratio { width, height } => Some(f64::from(width) / f64::from(height)),
            Self::Free | Self::Main => None,
        }
    }
}

impl std::fmt::Display for AspectToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Main => f.write_str("main"),
            Self::Ratio { width, height } => write!(f, "{width}:{height}"),
        }
    }
}

impl std::str::FromStr for AspectToken {
    type Err = CropError;

    fn from_str(s: &str) -> CropResult<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "free" => return Ok(Self::Free),
            "main" => return Ok(Self::Main),
            _ => {}
        }

        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| CropError::validation(format!("aspect token '{s}' is not 'w:h'")))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| CropError::validation(format!("aspect width '{w}' is not an integer")))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| CropError::validation(format!("aspect height '{h}' is not an integer")))?;
        if width == 0 || height == 0 {
            return Err(CropError::validation(format!(
                "aspect token '{s}' must have non-zero terms"
            )));
        }
        Ok(Self::Ratio { width, height })
    }
}

/// Reduce `width:height` by their GCD for display, e.g. `1920x1080 -> "16:9"`.
pub fn simplify_aspect_ratio(width: u32, height: u32) -> String {
    let g = gcd(u64::from(width), u64::from(height));
    if g == 0 {
        return "0:0".to_string();
    }
    format!("{}:{}", u64::from(width) / g, u64::from(height) / g)
}

/// Label for a floating-point crop size, rounded to whole pixels first.
pub fn aspect_label(width: f64, height: f64) -> String {
    let w = if width.is_finite() { width.round().max(0.0) } else { 0.0 };
    let h = if height.is_finite() { height.round().max(0.0) } else { 0.0 };
    simplify_aspect_ratio(w as u32, h as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/aspect.rs"]
mod tests;
