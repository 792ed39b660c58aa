use crate::{
    foundation::core::ImageRole,
    geometry::bounds::{CanvasLayout, RotatedBounds},
};

use super::model::CropState;

/// Everything the crop model and interaction need to know about the session
/// they run in, passed explicitly instead of read from a shared host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropSessionContext {
    /// Which image is being cropped.
    pub role: ImageRole,
    /// Canvas geometry of the source being cropped.
    pub layout: CanvasLayout,
    /// Ratio imposed from outside the session (the primary's committed aspect
    /// ratio when cropping the dependent image).
    pub forced_ratio: Option<f64>,
    /// Minimum crop width/height.
    pub min_size: f64,
    /// Hit-test margin for handles.
    pub hit_margin: f64,
}

impl CropSessionContext {
    /// Rotated bounds of the session source at `rotation_deg`.
    pub fn bounds(&self, rotation_deg: f64) -> RotatedBounds {
        self.layout.bounds(rotation_deg)
    }

    /// Aspect ratio actually enforced for `state`: `None` when unlocked, the
    /// forced ratio for a dependent session, otherwise the session's own ratio.
    pub fn effective_ratio(&self, state: &CropState) -> Option<f64> {
        if !state.lock_aspect_ratio {
            return None;
        }
        let ratio = match (self.role, self.forced_ratio) {
            (ImageRole::Dependent, Some(forced)) => forced,
            _ => state.aspect_ratio,
        };
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }
}
