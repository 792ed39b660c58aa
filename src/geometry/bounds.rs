//! Rotated bounding boxes and the canvas layout they live in.
//!
//! Every place that needs the image bounds (session init, drag clamping,
//! overlay drawing, commit) goes through [`CanvasLayout::bounds`] so the crop
//! rectangle never drifts relative to the image.

use crate::foundation::core::{Affine, CropRect, Point, Vec2};

/// Axis-aligned bounding box, in canvas space, of the source image after
/// rotation and uniform scaling. Derived, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RotatedBounds {
    /// Left edge in canvas space.
    pub x: f64,
    /// Top edge in canvas space.
    pub y: f64,
    /// Scaled width of the rotated bounding box.
    pub width: f64,
    /// Scaled height of the rotated bounding box.
    pub height: f64,
}

impl RotatedBounds {
    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The bounds as a crop rectangle (the "full image" crop).
    pub fn as_rect(&self) -> CropRect {
        CropRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Unscaled size of the axis-aligned box around a `width x height` rectangle
/// rotated by `rotation_deg`.
pub fn rotated_size(width: f64, height: f64, rotation_deg: f64) -> (f64, f64) {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + height * sin, width * sin + height * cos)
}

/// Rotated, scaled bounds of a `width x height` source centred in a
/// `canvas_width x canvas_height` canvas.
///
/// `rw = (w·|cos θ| + h·|sin θ|)·scale`, `rh = (w·|sin θ| + h·|cos θ|)·scale`,
/// centred: `x = (canvas_w - rw) / 2`, `y = (canvas_h - rh) / 2`.
pub fn rotated_bounds(
    width: f64,
    height: f64,
    rotation_deg: f64,
    scale: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> RotatedBounds {
    let width = sanitize_len(width);
    let height = sanitize_len(height);
    let scale = sanitize_scale(scale);
    let rotation_deg = if rotation_deg.is_finite() {
        rotation_deg
    } else {
        0.0
    };

    let (rw, rh) = rotated_size(width, height, rotation_deg);
    let (rw, rh) = (rw * scale, rh * scale);
    RotatedBounds {
        x: (canvas_width - rw) / 2.0,
        y: (canvas_height - rh) / 2.0,
        width: rw,
        height: rh,
    }
}

/// Bounding box of the four corners of the source rectangle after applying
/// [`canvas_from_source`]. Matches [`rotated_bounds`] up to float error.
pub fn rotated_corners_bbox(
    width: f64,
    height: f64,
    rotation_deg: f64,
    scale: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> kurbo::Rect {
    let xf = canvas_from_source(
        width,
        height,
        rotation_deg,
        scale,
        Point::new(canvas_width / 2.0, canvas_height / 2.0),
    );
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ]
    .map(|p| xf * p);

    corners
        .iter()
        .skip(1)
        .fold(kurbo::Rect::from_points(corners[0], corners[0]), |acc, p| {
            acc.union_pt(*p)
        })
}

/// Transform mapping source pixel space into canvas space: the source centre
/// lands on `center`, rotated by `rotation_deg` (clockwise on a y-down canvas)
/// and scaled uniformly.
pub fn canvas_from_source(
    width: f64,
    height: f64,
    rotation_deg: f64,
    scale: f64,
    center: Point,
) -> Affine {
    Affine::translate(center.to_vec2())
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale(sanitize_scale(scale))
        * Affine::translate(Vec2::new(-width / 2.0, -height / 2.0))
}

/// Square side that accommodates any rotation of a `width x height` source:
/// `ceil(max(width, height) · √2)`.
pub fn rotation_extent(width: u32, height: u32) -> u32 {
    let side = f64::from(width.max(height).max(1));
    (side * std::f64::consts::SQRT_2).ceil() as u32
}

/// Display canvas for one source image: a square large enough for any
/// rotation, shrunk uniformly by `scale` to respect an optional side cap.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasLayout {
    /// Source width in pixels.
    pub source_width: u32,
    /// Source height in pixels.
    pub source_height: u32,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Uniform display scale (source px -> canvas px).
    pub scale: f64,
}

impl CanvasLayout {
    /// Fit a source into a canvas whose side is at most `max_canvas_side`
    /// (no cap keeps `scale == 1`).
    pub fn fit(source_width: u32, source_height: u32, max_canvas_side: Option<u32>) -> Self {
        let extent = rotation_extent(source_width, source_height);
        let scale = match max_canvas_side {
            Some(cap) if cap > 0 && cap < extent => f64::from(cap) / f64::from(extent),
            _ => 1.0,
        };
        Self::with_scale(source_width, source_height, scale)
    }

    /// Canvas for an explicit display scale.
    pub fn with_scale(source_width: u32, source_height: u32, scale: f64) -> Self {
        let scale = sanitize_scale(scale);
        let extent = f64::from(rotation_extent(source_width, source_height));
        let raw = extent * scale;
        // Absorb float noise so `fit` to an exact cap does not round up a pixel.
        let side = if (raw - raw.round()).abs() < 1e-9 {
            raw.round()
        } else {
            raw.ceil()
        };
        let side = (side as u32).max(1);
        Self {
            source_width,
            source_height,
            width: side,
            height: side,
            scale,
        }
    }

    /// Rotated bounds of the source for `rotation_deg`.
    pub fn bounds(&self, rotation_deg: f64) -> RotatedBounds {
        rotated_bounds(
            f64::from(self.source_width),
            f64::from(self.source_height),
            rotation_deg,
            self.scale,
            f64::from(self.width),
            f64::from(self.height),
        )
    }

    /// Source-to-canvas transform for `rotation_deg`.
    pub fn canvas_from_source(&self, rotation_deg: f64) -> Affine {
        canvas_from_source(
            f64::from(self.source_width),
            f64::from(self.source_height),
            rotation_deg,
            self.scale,
            Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0),
        )
    }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/bounds.rs"]
mod tests;
