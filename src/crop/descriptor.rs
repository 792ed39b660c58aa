use crate::{
    foundation::{
        core::CropRect,
        math::{clamp_lo_hi, finite_or, normalize_degrees},
    },
    geometry::bounds::RotatedBounds,
};

/// Resolution-independent crop: the rectangle as fractions of the rotated
/// bounds, plus the rotation and provenance needed to re-apply it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCropDescriptor {
    /// Left edge as a fraction of bounds width.
    pub normalized_x: f64,
    /// Top edge as a fraction of bounds height.
    pub normalized_y: f64,
    /// Width as a fraction of bounds width.
    pub normalized_width: f64,
    /// Height as a fraction of bounds height.
    pub normalized_height: f64,
    /// Rotation in degrees the bounds were computed for.
    pub rotation: f64,
    /// Source width the descriptor was made against.
    pub original_width: u32,
    /// Source height the descriptor was made against.
    pub original_height: u32,
    /// Display scale at the time of capture (informational).
    pub scale: f64,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl NormalizedCropDescriptor {
    /// Capture `rect` relative to `bounds`.
    pub fn from_rect(
        rect: &CropRect,
        bounds: &RotatedBounds,
        rotation: f64,
        original_size: (u32, u32),
        scale: f64,
    ) -> Self {
        let frac = |v: f64, len: f64| if len > 0.0 { v / len } else { 0.0 };
        Self {
            normalized_x: frac(rect.x - bounds.x, bounds.width),
            normalized_y: frac(rect.y - bounds.y, bounds.height),
            normalized_width: frac(rect.width, bounds.width),
            normalized_height: frac(rect.height, bounds.height),
            rotation: normalize_degrees(rotation),
            original_width: original_size.0,
            original_height: original_size.1,
            scale,
            timestamp: now_millis(),
        }
        .clamped()
    }

    /// Clamp every fraction into `[0, 1]` with `x + width <= 1` and
    /// `y + height <= 1`. Non-finite fields become the full-image crop.
    pub fn clamped(self) -> Self {
        let x = clamp_lo_hi(finite_or(self.normalized_x, 0.0), 0.0, 1.0);
        let y = clamp_lo_hi(finite_or(self.normalized_y, 0.0), 0.0, 1.0);
        let w = clamp_lo_hi(finite_or(self.normalized_width, 1.0), 0.0, 1.0 - x);
        let h = clamp_lo_hi(finite_or(self.normalized_height, 1.0), 0.0, 1.0 - y);
        Self {
            normalized_x: x,
            normalized_y: y,
            normalized_width: w,
            normalized_height: h,
            rotation: normalize_degrees(self.rotation),
            ..self
        }
    }

    /// Re-apply to `bounds` (which must be computed for [`Self::rotation`]).
    pub fn to_rect(&self, bounds: &RotatedBounds) -> CropRect {
        CropRect::new(
            bounds.x + self.normalized_x * bounds.width,
            bounds.y + self.normalized_y * bounds.height,
            self.normalized_width * bounds.width,
            self.normalized_height * bounds.height,
        )
    }

    /// Return `true` when the descriptor was made against a source of this size.
    pub fn matches_source(&self, width: u32, height: u32) -> bool {
        self.original_width == width && self.original_height == height
    }
}

/// Legacy pixel crop settings: the crop in unscaled rotated-source pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropSettings {
    /// Left edge in rotated-source pixels.
    pub x: f64,
    /// Top edge in rotated-source pixels.
    pub y: f64,
    /// Width in rotated-source pixels.
    pub width: f64,
    /// Height in rotated-source pixels.
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Display scale when captured.
    pub scale: f64,
}

impl CropSettings {
    /// Capture `rect` (canvas space, `scale` px per source px).
    pub fn from_rect(rect: &CropRect, bounds: &RotatedBounds, rotation: f64, scale: f64) -> Self {
        Self {
            x: (rect.x - bounds.x) / scale,
            y: (rect.y - bounds.y) / scale,
            width: rect.width / scale,
            height: rect.height / scale,
            rotation: normalize_degrees(rotation),
            scale,
        }
    }

    /// Map back into canvas space for the current `bounds` and `scale`.
    pub fn to_rect(&self, bounds: &RotatedBounds, scale: f64) -> CropRect {
        CropRect::new(
            bounds.x + self.x * scale,
            bounds.y + self.y * scale,
            self.width * scale,
            self.height * scale,
        )
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/crop/descriptor.rs"]
mod tests;
