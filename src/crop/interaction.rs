//! Pointer input -> crop rectangle edits.
//!
//! State machine: `Idle -> Dragging(mode) -> Idle`. The pointer that starts a
//! drag is captured; events from any other pointer are ignored until it is
//! released. Moves are honoured wherever the pointer is, including outside the
//! canvas.

use crate::foundation::{
    core::{CropRect, Point, Vec2},
    math::clamp_lo_hi,
};

use super::{
    context::CropSessionContext,
    model::{CropRectModel, fit_locked_size},
};

/// What a drag does to the rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Translate the whole rectangle.
    Move,
    /// Drag the top edge.
    Top,
    /// Drag the bottom edge.
    Bottom,
    /// Drag the left edge.
    Left,
    /// Drag the right edge.
    Right,
    /// Drag the top-left corner.
    TopLeft,
    /// Drag the top-right corner.
    TopRight,
    /// Drag the bottom-left corner.
    BottomLeft,
    /// Drag the bottom-right corner.
    BottomRight,
}

/// How one axis responds to a resize drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeMotion {
    /// The leading edge (left/top) follows the pointer; the trailing edge is the anchor.
    Leading,
    /// The trailing edge (right/bottom) follows the pointer; the leading edge is the anchor.
    Trailing,
    /// Not dragged; the leading edge stays put.
    Fixed,
}

#[derive(Clone, Copy, Debug)]
struct ResizeSpec {
    horizontal: EdgeMotion,
    vertical: EdgeMotion,
}

impl DragMode {
    /// All resize modes, corners first (hit-test priority).
    pub const RESIZE_MODES: [DragMode; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    fn resize_spec(self) -> Option<ResizeSpec> {
        use EdgeMotion::{Fixed, Leading, Trailing};
        let (horizontal, vertical) = match self {
            Self::Move => return None,
            Self::Top => (Fixed, Leading),
            Self::Bottom => (Fixed, Trailing),
            Self::Left => (Leading, Fixed),
            Self::Right => (Trailing, Fixed),
            Self::TopLeft => (Leading, Leading),
            Self::TopRight => (Trailing, Leading),
            Self::BottomLeft => (Leading, Trailing),
            Self::BottomRight => (Trailing, Trailing),
        };
        Some(ResizeSpec {
            horizontal,
            vertical,
        })
    }

    /// Cursor affordance for this mode.
    pub fn cursor(self) -> CursorIcon {
        match self {
            Self::Move => CursorIcon::Move,
            Self::Top | Self::Bottom => CursorIcon::ResizeNs,
            Self::Left | Self::Right => CursorIcon::ResizeEw,
            Self::TopLeft | Self::BottomRight => CursorIcon::ResizeNwse,
            Self::TopRight | Self::BottomLeft => CursorIcon::ResizeNesw,
        }
    }
}

/// Pointer cursor shapes, named after their CSS equivalents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorIcon {
    /// Plain arrow.
    Default,
    /// Four-way move.
    Move,
    /// Vertical resize.
    ResizeNs,
    /// Horizontal resize.
    ResizeEw,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNwse,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNesw,
}

impl CursorIcon {
    /// CSS `cursor` value.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::ResizeNs => "ns-resize",
            Self::ResizeEw => "ew-resize",
            Self::ResizeNwse => "nwse-resize",
            Self::ResizeNesw => "nesw-resize",
        }
    }
}

/// Hit-test `p` against `rect`: corners, then edges (within the perpendicular
/// span), then the interior.
pub fn hit_test(rect: &CropRect, p: Point, margin: f64) -> Option<DragMode> {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return None;
    }
    let near = |a: f64, b: f64| (a - b).abs() <= margin;

    let corners = [
        (DragMode::TopLeft, rect.x, rect.y),
        (DragMode::TopRight, rect.right(), rect.y),
        (DragMode::BottomLeft, rect.x, rect.bottom()),
        (DragMode::BottomRight, rect.right(), rect.bottom()),
    ];
    for (mode, cx, cy) in corners {
        if near(p.x, cx) && near(p.y, cy) {
            return Some(mode);
        }
    }

    let within_y = p.y >= rect.y && p.y <= rect.bottom();
    let within_x = p.x >= rect.x && p.x <= rect.right();
    if within_y && near(p.x, rect.x) {
        return Some(DragMode::Left);
    }
    if within_y && near(p.x, rect.right()) {
        return Some(DragMode::Right);
    }
    if within_x && near(p.y, rect.y) {
        return Some(DragMode::Top);
    }
    if within_x && near(p.y, rect.bottom()) {
        return Some(DragMode::Bottom);
    }

    rect.contains(p).then_some(DragMode::Move)
}

/// Resize `rect` so the dragged edge(s) of `mode` sit at `p` while the
/// opposite edge(s) stay fixed.
///
/// Each axis is clamped to `[min_size, distance from anchor to bound]`. With a
/// locked ratio the driving axis (width, or height for top/bottom edges)
/// determines the other; if the derived side would overflow its own bound,
/// both are recomputed from that bound instead, so the result always fits.
pub fn resize_rect(
    rect: &CropRect,
    mode: DragMode,
    p: Point,
    bounds: &crate::geometry::bounds::RotatedBounds,
    ratio: Option<f64>,
    min_size: f64,
) -> CropRect {
    let Some(spec) = mode.resize_spec() else {
        return *rect;
    };

    let (left, right) = (rect.x, rect.right());
    let (top, bottom) = (rect.y, rect.bottom());

    let max_w = match spec.horizontal {
        EdgeMotion::Leading => right - bounds.x,
        EdgeMotion::Trailing | EdgeMotion::Fixed => bounds.right() - left,
    };
    let max_h = match spec.vertical {
        EdgeMotion::Leading => bottom - bounds.y,
        EdgeMotion::Trailing | EdgeMotion::Fixed => bounds.bottom() - top,
    };

    let w = match spec.horizontal {
        EdgeMotion::Leading => right - p.x,
        EdgeMotion::Trailing => p.x - left,
        EdgeMotion::Fixed => rect.width,
    };
    let h = match spec.vertical {
        EdgeMotion::Leading => bottom - p.y,
        EdgeMotion::Trailing => p.y - top,
        EdgeMotion::Fixed => rect.height,
    };
    let mut w = clamp_lo_hi(w, min_size, max_w.max(min_size));
    let mut h = clamp_lo_hi(h, min_size, max_h.max(min_size));

    if let Some(ratio) = ratio.filter(|r| r.is_finite() && *r > 0.0) {
        let drive_height = spec.horizontal == EdgeMotion::Fixed;
        (w, h) = if drive_height {
            let (hh, ww) = fit_locked_size(h, 1.0 / ratio, max_h, max_w, min_size);
            (ww, hh)
        } else {
            fit_locked_size(w, ratio, max_w, max_h, min_size)
        };
    }

    let x = match spec.horizontal {
        EdgeMotion::Leading => right - w,
        EdgeMotion::Trailing | EdgeMotion::Fixed => left,
    };
    let y = match spec.vertical {
        EdgeMotion::Leading => bottom - h,
        EdgeMotion::Trailing | EdgeMotion::Fixed => top,
    };
    CropRect::new(x, y, w, h)
}

/// Pointer event phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button pressed / touch started.
    Down,
    /// Pointer moved.
    Move,
    /// Button released / touch ended.
    Up,
    /// Gesture cancelled by the platform.
    Cancel,
}

/// A pointer event in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Platform pointer identifier (mouse = 0, one per touch).
    pub pointer_id: u64,
    /// Event phase.
    pub phase: PointerPhase,
    /// Position in canvas space; may lie outside the canvas.
    pub position: Point,
}

impl PointerEvent {
    /// Convenience constructor.
    pub fn new(pointer_id: u64, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            phase,
            position: Point::new(x, y),
        }
    }
}

/// Result of feeding one event to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    Ignored,
    /// A drag started in the given mode.
    Started(DragMode),
    /// The rectangle was updated by an in-progress drag.
    Updated,
    /// The drag ended and the rectangle was re-clamped.
    Finished,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        pointer_id: u64,
        mode: DragMode,
        grab_offset: Vec2,
    },
}

/// Translates pointer events into [`CropRectModel`] edits.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: DragState,
}

impl InteractionController {
    /// Idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active drag mode, if any.
    pub fn drag_mode(&self) -> Option<DragMode> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { mode, .. } => Some(mode),
        }
    }

    /// Return `true` while a pointer is captured.
    pub fn is_dragging(&self) -> bool {
        self.drag_mode().is_some()
    }

    /// Drop any drag state without touching the model.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Cursor to show for a hovering pointer at `p`.
    pub fn cursor_at(&self, p: Point, model: &CropRectModel, ctx: &CropSessionContext) -> CursorIcon {
        if let Some(mode) = self.drag_mode() {
            return mode.cursor();
        }
        hit_test(&model.rect(), p, ctx.hit_margin).map_or(CursorIcon::Default, DragMode::cursor)
    }

    /// Feed one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        model: &mut CropRectModel,
        ctx: &CropSessionContext,
    ) -> InteractionOutcome {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event, model, ctx),
            PointerPhase::Move => self.pointer_move(event, model, ctx),
            PointerPhase::Up | PointerPhase::Cancel => self.pointer_up(event, model, ctx),
        }
    }

    fn pointer_down(
        &mut self,
        event: PointerEvent,
        model: &CropRectModel,
        ctx: &CropSessionContext,
    ) -> InteractionOutcome {
        if self.is_dragging() {
            return InteractionOutcome::Ignored;
        }
        let rect = model.rect();
        let Some(mode) = hit_test(&rect, event.position, ctx.hit_margin) else {
            return InteractionOutcome::Ignored;
        };
        let grab_offset = event.position - Point::new(rect.x, rect.y);
        self.state = DragState::Dragging {
            pointer_id: event.pointer_id,
            mode,
            grab_offset,
        };
        tracing::debug!(?mode, "crop drag started");
        InteractionOutcome::Started(mode)
    }

    fn pointer_move(
        &mut self,
        event: PointerEvent,
        model: &mut CropRectModel,
        ctx: &CropSessionContext,
    ) -> InteractionOutcome {
        let DragState::Dragging {
            pointer_id,
            mode,
            grab_offset,
        } = self.state
        else {
            return InteractionOutcome::Ignored;
        };
        let p = event.position;
        if pointer_id != event.pointer_id || !(p.x.is_finite() && p.y.is_finite()) {
            return InteractionOutcome::Ignored;
        }

        let rect = model.rect();
        let bounds = model.bounds(ctx);
        let next = if mode == DragMode::Move {
            let origin = p - grab_offset;
            CropRect::new(
                clamp_lo_hi(origin.x, bounds.x, bounds.right() - rect.width),
                clamp_lo_hi(origin.y, bounds.y, bounds.bottom() - rect.height),
                rect.width,
                rect.height,
            )
        } else {
            let ratio = ctx.effective_ratio(model.state());
            resize_rect(&rect, mode, p, &bounds, ratio, ctx.min_size)
        };
        model.set_rect(next, ctx);
        InteractionOutcome::Updated
    }

    fn pointer_up(
        &mut self,
        event: PointerEvent,
        model: &mut CropRectModel,
        ctx: &CropSessionContext,
    ) -> InteractionOutcome {
        match self.state {
            DragState::Dragging { pointer_id, .. } if pointer_id == event.pointer_id => {
                self.state = DragState::Idle;
                model.reclamp(ctx);
                tracing::debug!(rect = ?model.rect(), "crop drag finished");
                InteractionOutcome::Finished
            }
            _ => InteractionOutcome::Ignored,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/interaction.rs"]
mod tests;
