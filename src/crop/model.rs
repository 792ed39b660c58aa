//! The in-progress crop rectangle and the invariants it must satisfy.
//!
//! Invariants after every mutation:
//! - the rectangle lies inside the rotated bounds,
//! - width and height are at least the minimum crop size,
//! - when an aspect ratio is enforced, `width / height` equals it.
//!
//! All clamps are idempotent: applying them to their own output is a no-op.

use crate::{
    foundation::{
        core::CropRect,
        math::{clamp_lo_hi, finite_or, normalize_degrees, ratios_match},
    },
    geometry::bounds::RotatedBounds,
    render::grid::GridType,
};

use super::context::CropSessionContext;

/// Mutable state of one crop session.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropState {
    /// Crop rectangle in canvas space.
    pub crop_rect: CropRect,
    /// Image rotation in degrees, `[-180, 180]`.
    pub rotation: f64,
    /// Whether resizes keep `aspect_ratio`.
    pub lock_aspect_ratio: bool,
    /// Locked `width / height`.
    pub aspect_ratio: f64,
    /// Composition guide shown inside the rectangle.
    pub grid_type: GridType,
}

impl CropState {
    /// Unlocked state covering the whole rotated image.
    pub fn full(bounds: RotatedBounds, rotation: f64) -> Self {
        let aspect_ratio = if bounds.height > 0.0 {
            bounds.width / bounds.height
        } else {
            1.0
        };
        Self {
            crop_rect: bounds.as_rect(),
            rotation: normalize_degrees(rotation),
            lock_aspect_ratio: false,
            aspect_ratio,
            grid_type: GridType::None,
        }
    }
}

/// Replace non-finite fields: position falls back to the bounds origin, sizes
/// to the minimum crop size.
pub fn sanitize_rect(rect: CropRect, bounds: &RotatedBounds, min_size: f64) -> CropRect {
    CropRect::new(
        finite_or(rect.x, bounds.x),
        finite_or(rect.y, bounds.y),
        finite_or(rect.width, min_size),
        finite_or(rect.height, min_size),
    )
}

/// Clamp position, then size, into `bounds` (no aspect handling).
///
/// Sizes are first capped to the bounds dimensions so the position clamp never
/// sees a negative range.
pub fn clamp_to_bounds(rect: CropRect, bounds: &RotatedBounds, min_size: f64) -> CropRect {
    let rect = sanitize_rect(rect, bounds, min_size);

    let width = clamp_lo_hi(rect.width, min_size, bounds.width.max(min_size));
    let height = clamp_lo_hi(rect.height, min_size, bounds.height.max(min_size));

    let x = clamp_lo_hi(rect.x, bounds.x, bounds.right() - width);
    let y = clamp_lo_hi(rect.y, bounds.y, bounds.bottom() - height);

    let width = clamp_lo_hi(width, min_size, bounds.right() - x);
    let height = clamp_lo_hi(height, min_size, bounds.bottom() - y);

    CropRect::new(x, y, width, height)
}

/// Largest `(width, height)` with exactly `ratio` that starts from `width`
/// and fits `max_width x max_height`, never below the minimum size.
pub(crate) fn fit_locked_size(
    width: f64,
    ratio: f64,
    max_width: f64,
    max_height: f64,
    min_size: f64,
) -> (f64, f64) {
    let mut w = width;
    let mut h = w / ratio;
    if h > max_height {
        h = max_height;
        w = h * ratio;
    }
    if w > max_width {
        w = max_width;
        h = w / ratio;
    }
    if h < min_size {
        h = min_size;
        w = h * ratio;
    }
    if w < min_size {
        w = min_size;
        h = w / ratio;
    }
    (w, h)
}

/// Enforce every invariant on `rect`.
///
/// When `ratio` is set and the rectangle does not already match it, height is
/// recomputed from width; if that overflows the bounds, width is derived from
/// the clamped height instead. Then position is clamped, then size.
pub fn enforce_invariants(
    rect: CropRect,
    bounds: &RotatedBounds,
    ratio: Option<f64>,
    min_size: f64,
) -> CropRect {
    let mut rect = sanitize_rect(rect, bounds, min_size);

    if let Some(ratio) = ratio.filter(|r| r.is_finite() && *r > 0.0) {
        let current = rect.width / rect.height;
        let fits = rect.width <= bounds.width && rect.height <= bounds.height;
        if !ratios_match(current, ratio) || !fits {
            let (w, h) =
                fit_locked_size(rect.width, ratio, bounds.width, bounds.height, min_size);
            rect.width = w;
            rect.height = h;
        }
    }

    clamp_to_bounds(rect, bounds, min_size)
}

/// Re-fit `rect` to `ratio` around its own centre, as large as its current
/// width allows inside `bounds`.
pub fn fit_aspect_ratio(
    rect: CropRect,
    ratio: f64,
    bounds: &RotatedBounds,
    min_size: f64,
) -> CropRect {
    let rect = sanitize_rect(rect, bounds, min_size);
    let (w, h) = fit_locked_size(rect.width, ratio, bounds.width, bounds.height, min_size);
    clamp_to_bounds(CropRect::from_center(rect.center(), w, h), bounds, min_size)
}

/// Owner of the in-progress [`CropState`]; every mutation re-establishes the
/// invariants against the session bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct CropRectModel {
    state: CropState,
}

impl CropRectModel {
    /// Wrap `state`, enforcing invariants immediately.
    pub fn new(state: CropState, ctx: &CropSessionContext) -> Self {
        let mut model = Self { state };
        model.enforce(ctx);
        model
    }

    /// Full-bounds, unlocked model.
    pub fn full(ctx: &CropSessionContext, rotation: f64) -> Self {
        Self::new(CropState::full(ctx.bounds(rotation), rotation), ctx)
    }

    /// Current state.
    pub fn state(&self) -> &CropState {
        &self.state
    }

    /// Current crop rectangle.
    pub fn rect(&self) -> CropRect {
        self.state.crop_rect
    }

    /// Bounds for the current rotation.
    pub fn bounds(&self, ctx: &CropSessionContext) -> RotatedBounds {
        ctx.bounds(self.state.rotation)
    }

    /// Replace the rectangle and enforce invariants.
    pub fn set_rect(&mut self, rect: CropRect, ctx: &CropSessionContext) {
        self.state.crop_rect = rect;
        self.enforce(ctx);
    }

    /// Lock to `ratio` and re-fit the rectangle around its centre. Ratios that
    /// are not finite and positive are ignored.
    pub fn set_aspect_ratio(&mut self, ratio: f64, ctx: &CropSessionContext) {
        if !(ratio.is_finite() && ratio > 0.0) {
            tracing::warn!(ratio, "ignoring invalid aspect ratio");
            return;
        }
        self.state.aspect_ratio = ratio;
        self.state.lock_aspect_ratio = true;
        let effective = ctx.effective_ratio(&self.state).unwrap_or(ratio);
        let bounds = self.bounds(ctx);
        self.state.crop_rect =
            fit_aspect_ratio(self.state.crop_rect, effective, &bounds, ctx.min_size);
        self.enforce(ctx);
    }

    /// Toggle the aspect lock. Locking without a ratio adopts the current
    /// rectangle's ratio.
    pub fn set_lock_aspect(&mut self, locked: bool, ctx: &CropSessionContext) {
        if locked && !self.state.lock_aspect_ratio {
            if let Some(r) = self.state.crop_rect.aspect_ratio() {
                self.state.aspect_ratio = r;
            }
        }
        self.state.lock_aspect_ratio = locked;
        self.enforce(ctx);
    }

    /// Change rotation; the rectangle is re-clamped into the new bounds.
    pub fn set_rotation(&mut self, rotation: f64, ctx: &CropSessionContext) {
        self.state.rotation = normalize_degrees(rotation);
        self.enforce(ctx);
    }

    /// Select the composition guide.
    pub fn set_grid_type(&mut self, grid: GridType) {
        self.state.grid_type = grid;
    }

    /// Re-establish every invariant against the current bounds.
    pub fn enforce(&mut self, ctx: &CropSessionContext) {
        let bounds = self.bounds(ctx);
        let ratio = ctx.effective_ratio(&self.state);
        self.state.crop_rect = enforce_invariants(self.state.crop_rect, &bounds, ratio, ctx.min_size);
    }

    /// Position-then-size clamp used when a drag ends.
    pub fn reclamp(&mut self, ctx: &CropSessionContext) {
        let bounds = self.bounds(ctx);
        self.state.crop_rect = clamp_to_bounds(self.state.crop_rect, &bounds, ctx.min_size);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/model.rs"]
mod tests;
