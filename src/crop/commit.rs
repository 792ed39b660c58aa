//! Turning a finished crop session into pixels.
//!
//! The rotated source is rendered unscaled into an offscreen surface sized to
//! its rotated bounding box, the canvas-space crop rectangle is mapped into
//! that surface by undoing the display scale, and the region is copied into a
//! new bitmap of exactly the crop size.

use image::{RgbaImage, imageops};

use crate::{
    foundation::{
        core::{CropRect, Point},
        error::CropResult,
        math::normalize_degrees,
    },
    geometry::bounds::{CanvasLayout, RotatedBounds, canvas_from_source, rotated_size},
    render::surface::{CpuSurface, RenderSurface},
};

use super::{
    descriptor::{CropSettings, NormalizedCropDescriptor},
    model::{CropState, fit_aspect_ratio},
};

/// Descriptors within this many degrees share a rotation frame.
const ROTATION_EPSILON: f64 = 1e-9;

/// Integer pixel rectangle inside the unscaled rotated source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, at least 1.
    pub width: u32,
    /// Height, at least 1.
    pub height: u32,
}

/// Result of committing one crop.
#[derive(Clone, Debug)]
pub struct CropOutput {
    /// Cropped pixels with the rotation baked in.
    pub image: RgbaImage,
    /// Region of the rotated source that was copied.
    pub source_rect: PixelRect,
    /// Resolution-independent record of the crop.
    pub descriptor: NormalizedCropDescriptor,
    /// Legacy pixel record of the crop.
    pub settings: CropSettings,
}

/// Render `source` rotated by `rotation_deg` at full resolution into a bitmap
/// sized to its rotated bounding box (rounded up).
///
/// Quarter turns are exact pixel permutations; other angles are rasterized
/// with bilinear sampling.
pub fn render_rotated(source: &RgbaImage, rotation_deg: f64) -> CropResult<RgbaImage> {
    let rotation = normalize_degrees(rotation_deg);
    let quarters = rotation / 90.0;
    if (quarters - quarters.round()).abs() < 1e-9 {
        return Ok(match (quarters.round() as i64).rem_euclid(4) {
            1 => imageops::rotate90(source),
            2 => imageops::rotate180(source),
            3 => imageops::rotate270(source),
            _ => source.clone(),
        });
    }

    let (w, h) = (f64::from(source.width()), f64::from(source.height()));
    let (rw, rh) = rotated_size(w, h, rotation);
    let (ow, oh) = (ceil_px(rw), ceil_px(rh));
    let mut surface = CpuSurface::new(ow, oh)?;
    let center = Point::new(f64::from(ow) / 2.0, f64::from(oh) / 2.0);
    surface.draw_image_transformed(source, canvas_from_source(w, h, rotation, 1.0, center))?;
    Ok(surface.into_image())
}

/// Map a canvas-space crop rectangle into integer pixels of the unscaled
/// rotated source of size `rotated` (as returned by [`render_rotated`]).
///
/// `src = (rect - bounds.origin) / scale`, shifted by the rounding margin of
/// the offscreen surface, then rounded and clamped so the result is never
/// empty and never leaves the surface.
pub fn source_crop_rect(
    rect: &CropRect,
    bounds: &RotatedBounds,
    scale: f64,
    exact_size: (f64, f64),
    rotated: (u32, u32),
) -> PixelRect {
    let margin_x = (f64::from(rotated.0) - exact_size.0) / 2.0;
    let margin_y = (f64::from(rotated.1) - exact_size.1) / 2.0;
    let to_px = |v: f64, max: u32| -> u32 {
        if v.is_finite() {
            v.round().clamp(0.0, f64::from(max)) as u32
        } else {
            0
        }
    };

    let x = to_px((rect.x - bounds.x) / scale + margin_x, rotated.0.saturating_sub(1));
    let y = to_px((rect.y - bounds.y) / scale + margin_y, rotated.1.saturating_sub(1));
    let width = to_px(rect.width / scale, rotated.0 - x).max(1);
    let height = to_px(rect.height / scale, rotated.1 - y).max(1);
    PixelRect {
        x,
        y,
        width,
        height,
    }
}

/// Stateless commit/close operations for crop sessions.
pub struct CropCommitter;

impl CropCommitter {
    /// Produce the cropped bitmap and both persistence records for `state`
    /// against `source` laid out by `layout`.
    #[tracing::instrument(skip_all, fields(rotation = state.rotation))]
    pub fn commit(
        source: &RgbaImage,
        layout: &CanvasLayout,
        state: &CropState,
    ) -> CropResult<CropOutput> {
        let rotation = normalize_degrees(state.rotation);
        let bounds = layout.bounds(rotation);
        let rect = state.crop_rect;

        let rotated = render_rotated(source, rotation)?;
        let exact = rotated_size(
            f64::from(source.width()),
            f64::from(source.height()),
            rotation,
        );
        let src = source_crop_rect(&rect, &bounds, layout.scale, exact, rotated.dimensions());
        let image = imageops::crop_imm(&rotated, src.x, src.y, src.width, src.height).to_image();
        tracing::debug!(
            x = src.x,
            y = src.y,
            width = src.width,
            height = src.height,
            "crop committed"
        );

        Ok(CropOutput {
            image,
            source_rect: src,
            descriptor: Self::close(layout, state),
            settings: CropSettings::from_rect(&rect, &bounds, rotation, layout.scale),
        })
    }

    /// Record the session's last rectangle and rotation without touching
    /// pixels.
    pub fn close(layout: &CanvasLayout, state: &CropState) -> NormalizedCropDescriptor {
        NormalizedCropDescriptor::from_rect(
            &state.crop_rect,
            &layout.bounds(state.rotation),
            state.rotation,
            (layout.source_width, layout.source_height),
            layout.scale,
        )
    }

    /// Re-crop a dependent source to `ratio` non-interactively.
    ///
    /// Uses the dependent's committed `rotation`, starts from `previous` when
    /// it was made against this source at that same rotation (full bounds
    /// otherwise) and re-fits the rectangle to `ratio` around its centre.
    #[tracing::instrument(skip_all, fields(ratio = ratio, rotation = rotation))]
    pub fn recrop(
        source: &RgbaImage,
        layout: &CanvasLayout,
        ratio: f64,
        rotation: f64,
        previous: Option<&NormalizedCropDescriptor>,
        min_size: f64,
    ) -> CropResult<CropOutput> {
        let rotation = normalize_degrees(rotation);
        let previous = previous.filter(|d| {
            d.matches_source(source.width(), source.height())
                && normalize_degrees(d.rotation - rotation).abs() < ROTATION_EPSILON
        });
        let bounds = layout.bounds(rotation);
        let start = previous.map_or_else(|| bounds.as_rect(), |d| d.to_rect(&bounds));

        let mut state = CropState::full(bounds, rotation);
        state.crop_rect = fit_aspect_ratio(start, ratio, &bounds, min_size);
        state.lock_aspect_ratio = true;
        state.aspect_ratio = ratio;
        Self::commit(source, layout, &state)
    }
}

fn ceil_px(v: f64) -> u32 {
    // Trim float noise so exact sizes do not grow a pixel.
    let r = v.round();
    let px = if (v - r).abs() < 1e-9 { r } else { v.ceil() };
    if px.is_finite() { (px as u32).max(1) } else { 1 }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/commit.rs"]
mod tests;
