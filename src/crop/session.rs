//! The crop editor façade exposed to the UI layer.
//!
//! [`CropEditor`] owns one [`ImageSlot`] per role, at most one active
//! [`CropSession`], the primary's committed aspect ratio and the edit history.
//! Sessions always run against the original source from the
//! [`ImageSourceProvider`]; committing bakes the rotation into a new bitmap and
//! records descriptors that can be re-applied on the next open.

use std::{collections::BTreeMap, sync::Arc};

use image::RgbaImage;

use crate::{
    assets::store::{ImageSourceProvider, ImageStore, SourceStatus},
    config::CropConfig,
    foundation::{
        core::{ImageRole, Point},
        error::{CropError, CropResult},
        math::ratios_match,
    },
    geometry::{
        aspect::{AspectToken, aspect_label},
        bounds::{CanvasLayout, RotatedBounds},
    },
    history::EditHistory,
    persist::{PersistedCropState, PersistedRoleState},
    render::{
        grid::GridType,
        overlay::{AdjustmentPreview, OverlayFrame, draw_crop_overlay},
        surface::CpuSurface,
    },
};

use super::{
    commit::{CropCommitter, CropOutput},
    context::CropSessionContext,
    descriptor::{CropSettings, NormalizedCropDescriptor},
    interaction::{CursorIcon, InteractionController, InteractionOutcome, PointerEvent},
    model::{CropRectModel, CropState},
};

/// Committed crop results of one image role.
#[derive(Clone, Debug, Default)]
pub struct ImageSlot {
    committed: Option<Arc<RgbaImage>>,
    descriptor: Option<NormalizedCropDescriptor>,
    settings: Option<CropSettings>,
    committed_rotation: f64,
    needs_recrop: bool,
}

impl ImageSlot {
    /// Bitmap produced by the last commit (rotation baked in).
    pub fn committed(&self) -> Option<&Arc<RgbaImage>> {
        self.committed.as_ref()
    }

    /// Last normalized crop, from a commit or a cancelled session.
    pub fn descriptor(&self) -> Option<&NormalizedCropDescriptor> {
        self.descriptor.as_ref()
    }

    /// Legacy pixel record of the last commit.
    pub fn settings(&self) -> Option<&CropSettings> {
        self.settings.as_ref()
    }

    /// Rotation of the last commit.
    pub fn committed_rotation(&self) -> f64 {
        self.committed_rotation
    }

    /// A dependent re-crop was skipped and is still owed.
    pub fn needs_recrop(&self) -> bool {
        self.needs_recrop
    }

    fn apply(&mut self, output: CropOutput) {
        self.committed_rotation = output.descriptor.rotation;
        self.committed = Some(Arc::new(output.image));
        self.descriptor = Some(output.descriptor);
        self.settings = Some(output.settings);
        self.needs_recrop = false;
    }
}

/// Result of [`CropEditor::open_session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The session is active.
    Opened,
    /// The source is still loading; the session opens on
    /// [`CropEditor::notify_loaded`].
    Deferred,
}

/// What happened to the dependent image after a primary commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependentRecrop {
    /// Nothing to do (dependent commit, or no dependent image).
    NotNeeded,
    /// Re-cropped to the new primary aspect ratio.
    Recropped {
        /// New dependent width.
        width: u32,
        /// New dependent height.
        height: u32,
    },
    /// Skipped; retried when the dependent loads or its session opens.
    Deferred,
}

/// Result of [`CropEditor::confirm`].
#[derive(Clone, Debug)]
pub struct CommitOutcome {
    /// Role that was committed.
    pub role: ImageRole,
    /// Width of the new bitmap.
    pub width: u32,
    /// Height of the new bitmap.
    pub height: u32,
    /// The new bitmap, rotation baked in.
    pub image: Arc<RgbaImage>,
    /// Descriptor written for the role.
    pub descriptor: NormalizedCropDescriptor,
    /// Dependent propagation result.
    pub dependent: DependentRecrop,
}

/// One open crop session: model, pointer state and the overlay surface.
///
/// The surface is allocated on the first redraw.
pub struct CropSession {
    ctx: CropSessionContext,
    model: CropRectModel,
    controller: InteractionController,
    source: Arc<RgbaImage>,
    surface: Option<CpuSurface>,
}

impl CropSession {
    /// Role being cropped.
    pub fn role(&self) -> ImageRole {
        self.ctx.role
    }

    /// Geometry context.
    pub fn context(&self) -> &CropSessionContext {
        &self.ctx
    }

    /// Current crop state.
    pub fn state(&self) -> &CropState {
        self.model.state()
    }

    /// Rotated bounds for the current rotation.
    pub fn bounds(&self) -> RotatedBounds {
        self.model.bounds(&self.ctx)
    }

    /// Aspect ratio enforced right now, if any.
    pub fn effective_ratio(&self) -> Option<f64> {
        self.ctx.effective_ratio(self.model.state())
    }

    /// Return `true` while a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Cursor for a hovering pointer.
    pub fn cursor_at(&self, x: f64, y: f64) -> CursorIcon {
        self.controller
            .cursor_at(Point::new(x, y), &self.model, &self.ctx)
    }

    /// Text of the "locked" label, shown while a ratio is enforced.
    pub fn locked_label(&self) -> Option<String> {
        let ratio = self.effective_ratio()?;
        let preset = AspectToken::PRESETS
            .iter()
            .filter_map(|t| t.parse::<AspectToken>().ok())
            .find(|t| t.fixed_ratio().is_some_and(|r| ratios_match(r, ratio)));
        let label = match preset {
            Some(token) => token.to_string(),
            None => {
                let rect = self.model.rect();
                aspect_label(rect.width, rect.height)
            }
        };
        Some(format!("locked {label}"))
    }

    /// Redraw the overlay and return the frame.
    pub fn render(
        &mut self,
        config: &CropConfig,
        preview: Option<&mut dyn AdjustmentPreview>,
    ) -> CropResult<&RgbaImage> {
        let frame = OverlayFrame {
            source: &self.source,
            layout: &self.ctx.layout,
            state: self.model.state(),
            locked_label: self.locked_label(),
        };
        let surface = match self.surface.take() {
            Some(surface) => surface,
            None => CpuSurface::new(self.ctx.layout.width, self.ctx.layout.height)?,
        };
        let surface = self.surface.insert(surface);
        draw_crop_overlay(surface, &frame, config, preview)?;
        Ok(surface.finish())
    }
}

#[derive(Clone, Debug)]
struct EditorSnapshot {
    slots: BTreeMap<ImageRole, ImageSlot>,
    main_crop_aspect_ratio: Option<f64>,
}

/// Crop/rotate editor over a primary and a dependent image.
pub struct CropEditor<P = ImageStore> {
    config: CropConfig,
    provider: P,
    slots: BTreeMap<ImageRole, ImageSlot>,
    main_crop_aspect_ratio: Option<f64>,
    session: Option<CropSession>,
    pending_open: Option<ImageRole>,
    history: EditHistory<EditorSnapshot>,
}

impl<P: ImageSourceProvider> CropEditor<P> {
    /// Build an editor reading sources from `provider`.
    pub fn new(config: CropConfig, provider: P) -> CropResult<Self> {
        config.validate()?;
        let history = EditHistory::new(config.history_depth);
        Ok(Self {
            config,
            provider,
            slots: BTreeMap::new(),
            main_crop_aspect_ratio: None,
            session: None,
            pending_open: None,
            history,
        })
    }

    /// Editor tunables.
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Source provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable source provider; call [`Self::notify_loaded`] after a load
    /// completes.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Committed state of `role`.
    pub fn slot(&self, role: ImageRole) -> Option<&ImageSlot> {
        self.slots.get(&role)
    }

    /// Aspect ratio of the primary's last committed crop.
    pub fn main_crop_aspect_ratio(&self) -> Option<f64> {
        self.main_crop_aspect_ratio
    }

    /// Active session.
    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    /// Role waiting for its source before a session can open.
    pub fn pending_open(&self) -> Option<ImageRole> {
        self.pending_open
    }

    /// Image currently shown for `role`: the last commit, else the source.
    pub fn current_image(&self, role: ImageRole) -> Option<Arc<RgbaImage>> {
        self.slots
            .get(&role)
            .and_then(|s| s.committed.clone())
            .or_else(|| self.provider.source(role).ready().cloned())
    }

    /// Open a crop session for `role`. An already open session for another
    /// role is cancelled first.
    #[tracing::instrument(skip(self))]
    pub fn open_session(&mut self, role: ImageRole) -> CropResult<OpenOutcome> {
        if let Some(session) = &self.session {
            if session.role() == role {
                return Ok(OpenOutcome::Opened);
            }
            self.cancel();
        }

        match self.provider.source(role) {
            SourceStatus::Missing => {
                self.pending_open = None;
                Err(CropError::image(format!("no {role} image is loaded")))
            }
            SourceStatus::Pending => {
                tracing::warn!(%role, "source still loading; session deferred");
                self.pending_open = Some(role);
                Ok(OpenOutcome::Deferred)
            }
            SourceStatus::Ready(source) => {
                self.pending_open = None;
                self.start_session(role, source)?;
                Ok(OpenOutcome::Opened)
            }
        }
    }

    /// Continue work that waited for `role`'s source: an owed dependent
    /// re-crop and a deferred session open. Returns the open outcome when a
    /// session was waiting.
    #[tracing::instrument(skip(self))]
    pub fn notify_loaded(&mut self, role: ImageRole) -> CropResult<Option<OpenOutcome>> {
        if role == ImageRole::Dependent && self.dependent_owes_recrop() {
            self.recrop_dependent();
        }
        if self.pending_open != Some(role) {
            return Ok(None);
        }
        self.pending_open = None;
        self.open_session(role).map(Some)
    }

    fn dependent_owes_recrop(&self) -> bool {
        self.slots
            .get(&ImageRole::Dependent)
            .is_some_and(|s| s.needs_recrop)
    }

    fn start_session(&mut self, role: ImageRole, source: Arc<RgbaImage>) -> CropResult<()> {
        if role == ImageRole::Dependent && self.dependent_owes_recrop() {
            self.recrop_dependent();
        }

        let layout = CanvasLayout::fit(
            source.width(),
            source.height(),
            self.config.max_canvas_side,
        );
        let forced_ratio = match role {
            ImageRole::Primary => None,
            ImageRole::Dependent => self.main_crop_aspect_ratio,
        };
        let ctx = CropSessionContext {
            role,
            layout,
            forced_ratio,
            min_size: self.config.min_crop_size,
            hit_margin: self.config.hit_margin,
        };
        let model = CropRectModel::new(self.initial_state(&ctx), &ctx);
        tracing::debug!(
            %role,
            canvas = layout.width,
            scale = layout.scale,
            rect = ?model.rect(),
            "crop session opened"
        );
        self.session = Some(CropSession {
            ctx,
            model,
            controller: InteractionController::new(),
            source,
            surface: None,
        });
        Ok(())
    }

    /// Descriptor made against this source, then legacy settings, then the
    /// full rotated bounds.
    fn initial_state(&self, ctx: &CropSessionContext) -> CropState {
        let slot = self.slots.get(&ctx.role);
        let (w, h) = (ctx.layout.source_width, ctx.layout.source_height);
        let descriptor = slot
            .and_then(|s| s.descriptor)
            .filter(|d| d.matches_source(w, h));
        let settings = slot.and_then(|s| s.settings);

        let mut state = if let Some(d) = descriptor {
            let bounds = ctx.bounds(d.rotation);
            CropState {
                crop_rect: d.to_rect(&bounds),
                ..CropState::full(bounds, d.rotation)
            }
        } else if let Some(s) = settings {
            let bounds = ctx.bounds(s.rotation);
            CropState {
                crop_rect: s.to_rect(&bounds, ctx.layout.scale),
                ..CropState::full(bounds, s.rotation)
            }
        } else {
            CropState::full(ctx.bounds(0.0), 0.0)
        };

        if let Some(r) = state.crop_rect.aspect_ratio() {
            state.aspect_ratio = r;
        }
        if let Some(forced) = ctx.forced_ratio {
            state.lock_aspect_ratio = true;
            state.aspect_ratio = forced;
        }
        state
    }

    fn session_mut(&mut self) -> Option<&mut CropSession> {
        if self.session.is_none() {
            tracing::warn!("no crop session is open");
        }
        self.session.as_mut()
    }

    /// Feed a pointer event to the active session.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        match self.session.as_mut() {
            Some(s) => s.controller.handle(event, &mut s.model, &s.ctx),
            None => InteractionOutcome::Ignored,
        }
    }

    /// Redraw the active session's overlay.
    pub fn redraw(
        &mut self,
        preview: Option<&mut dyn AdjustmentPreview>,
    ) -> CropResult<Option<&RgbaImage>> {
        let config = &self.config;
        match self.session.as_mut() {
            Some(session) => session.render(config, preview).map(Some),
            None => Ok(None),
        }
    }

    /// Apply an aspect token: `free`, `main`, or `w:h`.
    ///
    /// `main` resolves to the primary's last committed ratio, falling back to
    /// the primary source's dimensions; with neither it is a no-op.
    pub fn set_aspect_ratio(&mut self, token: &str) -> CropResult<()> {
        let token: AspectToken = token.parse()?;
        let main_ratio = self.main_crop_aspect_ratio.or_else(|| {
            self.provider
                .source(ImageRole::Primary)
                .ready()
                .map(|img| f64::from(img.width()) / f64::from(img.height()))
        });
        let Some(session) = self.session_mut() else {
            return Ok(());
        };
        let ctx = session.ctx;
        match token {
            AspectToken::Free => session.model.set_lock_aspect(false, &ctx),
            AspectToken::Main => match main_ratio {
                Some(r) => session.model.set_aspect_ratio(r, &ctx),
                None => tracing::warn!("no primary image to take the main aspect ratio from"),
            },
            AspectToken::Ratio { .. } => {
                if let Some(r) = token.fixed_ratio() {
                    session.model.set_aspect_ratio(r, &ctx);
                }
            }
        }
        Ok(())
    }

    /// Select a composition guide by name.
    pub fn set_grid_type(&mut self, token: &str) -> CropResult<()> {
        let grid: GridType = token.parse()?;
        if let Some(session) = self.session_mut() {
            session.model.set_grid_type(grid);
        }
        Ok(())
    }

    /// Rotate the source; the rectangle is re-clamped into the new bounds.
    pub fn set_rotation(&mut self, degrees: f64) {
        if let Some(session) = self.session_mut() {
            let ctx = session.ctx;
            session.model.set_rotation(degrees, &ctx);
        }
    }

    /// Toggle the aspect lock.
    pub fn set_lock_aspect(&mut self, locked: bool) {
        if let Some(session) = self.session_mut() {
            let ctx = session.ctx;
            session.model.set_lock_aspect(locked, &ctx);
        }
    }

    /// Back to the full rotated bounds at `rotation`, unlocked unless the
    /// session has a forced ratio. The grid choice survives.
    pub fn reset(&mut self, rotation: f64) {
        let Some(session) = self.session_mut() else {
            return;
        };
        let ctx = session.ctx;
        let mut state = CropState {
            grid_type: session.model.state().grid_type,
            ..CropState::full(ctx.bounds(rotation), rotation)
        };
        if let Some(forced) = ctx.forced_ratio {
            state.lock_aspect_ratio = true;
            state.aspect_ratio = forced;
        }
        session.controller.reset();
        session.model = CropRectModel::new(state, &ctx);
    }

    /// Commit the active session: crop the pixels, record descriptors and,
    /// for the primary, propagate the new aspect ratio to the dependent.
    #[tracing::instrument(skip(self))]
    pub fn confirm(&mut self) -> CropResult<CommitOutcome> {
        let Some(mut session) = self.session.take() else {
            return Err(CropError::validation("no crop session is open"));
        };
        session.controller.reset();
        let role = session.role();

        let output =
            match CropCommitter::commit(&session.source, &session.ctx.layout, session.model.state())
            {
                Ok(output) => output,
                Err(err) => {
                    self.session = Some(session);
                    return Err(err);
                }
            };

        let before = self.snapshot();
        let (width, height) = output.image.dimensions();
        let descriptor = output.descriptor;
        let slot = self.slots.entry(role).or_default();
        slot.apply(output);
        let image = slot
            .committed
            .clone()
            .ok_or_else(|| CropError::image("commit produced no image"))?;

        let dependent = match role {
            ImageRole::Primary => {
                self.main_crop_aspect_ratio = Some(f64::from(width) / f64::from(height));
                self.recrop_dependent()
            }
            ImageRole::Dependent => DependentRecrop::NotNeeded,
        };
        let after = self.snapshot();
        self.history.push(format!("crop {role}"), before, after);
        tracing::debug!(%role, width, height, ?dependent, "crop confirmed");

        Ok(CommitOutcome {
            role,
            width,
            height,
            image,
            descriptor,
            dependent,
        })
    }

    /// Re-crop the dependent image to the primary's committed ratio.
    /// A missing dependent is a no-op; a pending or failing one is deferred.
    fn recrop_dependent(&mut self) -> DependentRecrop {
        let Some(ratio) = self.main_crop_aspect_ratio else {
            return DependentRecrop::NotNeeded;
        };
        let source = match self.provider.source(ImageRole::Dependent) {
            SourceStatus::Missing => return DependentRecrop::NotNeeded,
            SourceStatus::Pending => {
                tracing::warn!("dependent image still loading; re-crop deferred");
                self.slots.entry(ImageRole::Dependent).or_default().needs_recrop = true;
                return DependentRecrop::Deferred;
            }
            SourceStatus::Ready(source) => source,
        };

        let layout = CanvasLayout::fit(
            source.width(),
            source.height(),
            self.config.max_canvas_side,
        );
        let min_size = self.config.min_crop_size;
        let slot = self.slots.entry(ImageRole::Dependent).or_default();
        match CropCommitter::recrop(
            &source,
            &layout,
            ratio,
            slot.committed_rotation,
            slot.descriptor.as_ref(),
            min_size,
        ) {
            Ok(output) => {
                let (width, height) = output.image.dimensions();
                slot.apply(output);
                DependentRecrop::Recropped { width, height }
            }
            Err(err) => {
                tracing::warn!(error = %err, "dependent re-crop failed; deferred");
                slot.needs_recrop = true;
                DependentRecrop::Deferred
            }
        }
    }

    /// Close the active session without touching pixels (Escape). The last
    /// rectangle and rotation are kept as the role's descriptor so the next
    /// open starts there.
    #[tracing::instrument(skip(self))]
    pub fn cancel(&mut self) -> Option<NormalizedCropDescriptor> {
        self.pending_open = None;
        let mut session = self.session.take()?;
        session.controller.reset();
        let descriptor = CropCommitter::close(&session.ctx.layout, session.model.state());
        self.slots.entry(session.role()).or_default().descriptor = Some(descriptor);
        tracing::debug!(role = %session.role(), "crop session closed");
        Some(descriptor)
    }

    fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            slots: self.slots.clone(),
            main_crop_aspect_ratio: self.main_crop_aspect_ratio,
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.slots = snapshot.slots;
        self.main_crop_aspect_ratio = snapshot.main_crop_aspect_ratio;
    }

    /// Revert the last commit; returns its description.
    pub fn undo(&mut self) -> Option<String> {
        let (description, snapshot) = self.history.undo()?;
        self.restore(snapshot);
        tracing::debug!(%description, "undo");
        Some(description)
    }

    /// Re-apply the last undone commit; returns its description.
    pub fn redo(&mut self) -> Option<String> {
        let (description, snapshot) = self.history.redo()?;
        self.restore(snapshot);
        tracing::debug!(%description, "redo");
        Some(description)
    }

    /// Whether [`Self::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Self::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Persistable crop records of both roles.
    pub fn export_state(&self) -> PersistedCropState {
        let roles = self
            .slots
            .iter()
            .filter(|(_, s)| s.descriptor.is_some() || s.settings.is_some())
            .map(|(role, s)| {
                (
                    *role,
                    PersistedRoleState {
                        descriptor: s.descriptor,
                        settings: s.settings,
                    },
                )
            })
            .collect();
        PersistedCropState {
            roles,
            main_crop_aspect_ratio: self.main_crop_aspect_ratio,
        }
        .sanitized()
    }

    /// Replace crop records with `state`. Committed bitmaps and history are
    /// dropped; the next session for each role starts from the imported
    /// records.
    pub fn import_state(&mut self, state: PersistedCropState) {
        let state = state.sanitized();
        self.slots = state
            .roles
            .into_iter()
            .map(|(role, r)| {
                let committed_rotation = r
                    .settings
                    .map(|s| s.rotation)
                    .or(r.descriptor.map(|d| d.rotation))
                    .unwrap_or(0.0);
                let slot = ImageSlot {
                    descriptor: r.descriptor,
                    settings: r.settings,
                    committed_rotation,
                    ..ImageSlot::default()
                };
                (role, slot)
            })
            .collect();
        self.main_crop_aspect_ratio = state.main_crop_aspect_ratio;
        self.history.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/session.rs"]
mod tests;
