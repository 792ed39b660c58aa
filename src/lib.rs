//! cropframe is the crop/rotate geometry engine of a photo editor.
//!
//! It computes rotated-image bounds, keeps an interactive crop rectangle inside
//! them under an optional aspect lock, and commits crops into new bitmaps plus
//! resolution-independent descriptors that survive reopening the editor.
//!
//! - Create a [`CropEditor`] over an [`ImageSourceProvider`] (e.g. [`ImageStore`])
//! - [`CropEditor::open_session`] for the primary or dependent image
//! - Feed [`PointerEvent`]s, aspect tokens, rotation and grid choices
//! - [`CropEditor::confirm`] to bake the crop, or [`CropEditor::cancel`]
//!
//! Committing the primary image re-crops the dependent image so its aspect ratio
//! always tracks the primary's committed crop.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod crop;
pub(crate) mod geometry;
pub(crate) mod history;
pub(crate) mod persist;
pub(crate) mod render;

pub use crate::foundation::core::{Affine, CropRect, ImageRole, Line, Point, Vec2};
pub use crate::foundation::error::{CropError, CropResult};

pub use crate::assets::decode::{decode_image, encode_png, open_image, save_png};
pub use crate::assets::store::{ImageSourceProvider, ImageStore, SourceStatus};
pub use crate::config::CropConfig;
pub use crate::crop::commit::{
    CropCommitter, CropOutput, PixelRect, render_rotated, source_crop_rect,
};
pub use crate::crop::context::CropSessionContext;
pub use crate::crop::descriptor::{CropSettings, NormalizedCropDescriptor};
pub use crate::crop::interaction::{
    CursorIcon, DragMode, InteractionController, InteractionOutcome, PointerEvent, PointerPhase,
    hit_test, resize_rect,
};
pub use crate::crop::model::{
    CropRectModel, CropState, clamp_to_bounds, enforce_invariants, fit_aspect_ratio,
    sanitize_rect,
};
pub use crate::crop::session::{
    CommitOutcome, CropEditor, CropSession, DependentRecrop, ImageSlot, OpenOutcome,
};
pub use crate::geometry::aspect::{AspectToken, aspect_label, simplify_aspect_ratio};
pub use crate::geometry::bounds::{
    CanvasLayout, RotatedBounds, canvas_from_source, rotated_bounds, rotated_corners_bbox,
    rotated_size, rotation_extent,
};
pub use crate::history::{EditHistory, HistoryEntry};
pub use crate::persist::{PersistedCropState, PersistedRoleState};
pub use crate::render::grid::{GridType, draw_grid, grid_lines};
pub use crate::render::overlay::{AdjustmentPreview, OverlayFrame, dim_bands, draw_crop_overlay};
pub use crate::render::surface::{CpuSurface, RenderSurface, TextRun};
