//! Raster drawing for crop sessions.

/// Composition guide overlays.
pub mod grid;
/// Crop session frame composition.
pub mod overlay;
/// Drawing target trait and the CPU raster surface.
pub mod surface;
