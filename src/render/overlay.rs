//! Crop session overlay: image, dimmed surround, dashed boundary, guides and
//! the aspect-lock label.

use image::RgbaImage;

use crate::{
    config::CropConfig,
    crop::model::CropState,
    foundation::{
        core::{CropRect, Point},
        error::CropResult,
        math::{clamp_lo_hi, finite_or},
    },
    geometry::bounds::{CanvasLayout, RotatedBounds},
};

use super::{grid::draw_grid, surface::RenderSurface};

const LABEL_INSET: f64 = 6.0;

/// Opaque live-preview capability (typically GPU-backed): renders the source
/// with the current colour adjustments into a rotated, offset viewport.
pub trait AdjustmentPreview {
    /// Draw the adjusted source so its rotated bounding box fills `viewport`.
    fn render_viewport(
        &mut self,
        surface: &mut dyn RenderSurface,
        viewport: RotatedBounds,
        rotation_deg: f64,
    ) -> CropResult<()>;
}

/// What to draw for one frame of a crop session.
pub struct OverlayFrame<'a> {
    /// Original source bitmap.
    pub source: &'a RgbaImage,
    /// Canvas the session runs in.
    pub layout: &'a CanvasLayout,
    /// Crop state to visualise.
    pub state: &'a CropState,
    /// Label shown when the aspect ratio is locked.
    pub locked_label: Option<String>,
}

/// Redraw the whole overlay for `frame`.
pub fn draw_crop_overlay(
    surface: &mut dyn RenderSurface,
    frame: &OverlayFrame<'_>,
    config: &CropConfig,
    preview: Option<&mut dyn AdjustmentPreview>,
) -> CropResult<()> {
    let rotation = frame.state.rotation;
    surface.clear([0, 0, 0, 0]);

    match preview {
        Some(preview) => {
            preview.render_viewport(surface, frame.layout.bounds(rotation), rotation)?;
        }
        None => {
            surface.draw_image_transformed(
                frame.source,
                frame.layout.canvas_from_source(rotation),
            )?;
        }
    }

    let (w, h) = surface.size();
    let rect = frame.state.crop_rect;
    for band in dim_bands(&rect, f64::from(w), f64::from(h)) {
        surface.fill_rect(band, config.overlay_rgba);
    }
    surface.stroke_rect(rect, config.stroke_rgba, Some(config.dash));
    draw_grid(surface, &rect, frame.state.grid_type, config.grid_rgba);

    if let Some(label) = &frame.locked_label {
        surface.draw_text(
            label,
            Point::new(rect.x + LABEL_INSET, rect.y + LABEL_INSET),
            config.label_rgba,
        );
    }
    Ok(())
}

/// The four non-overlapping bands of a `width x height` canvas outside `rect`.
pub fn dim_bands(rect: &CropRect, width: f64, height: f64) -> [CropRect; 4] {
    let top = clamp_lo_hi(finite_or(rect.y, 0.0), 0.0, height);
    let bottom = clamp_lo_hi(finite_or(rect.bottom(), top), top, height);
    let left = clamp_lo_hi(finite_or(rect.x, 0.0), 0.0, width);
    let right = clamp_lo_hi(finite_or(rect.right(), left), left, width);
    [
        CropRect::new(0.0, 0.0, width, top),
        CropRect::new(0.0, bottom, width, height - bottom),
        CropRect::new(0.0, top, left, bottom - top),
        CropRect::new(right, top, width - right, bottom - top),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
