use std::{collections::BTreeMap, sync::Arc};

use image::RgbaImage;

use crate::foundation::{
    core::ImageRole,
    error::{CropError, CropResult},
};

/// Availability of one role's full-resolution source.
#[derive(Clone, Debug)]
pub enum SourceStatus {
    /// No image is assigned to the role.
    Missing,
    /// A load is in flight; the editor defers work until it is notified.
    Pending,
    /// Decoded and ready.
    Ready(Arc<RgbaImage>),
}

impl SourceStatus {
    /// The decoded image, when ready.
    pub fn ready(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            Self::Ready(img) => Some(img),
            _ => None,
        }
    }
}

/// Supplies original (never cropped) source bitmaps per role.
pub trait ImageSourceProvider {
    /// Current status of `role`'s source.
    fn source(&self, role: ImageRole) -> SourceStatus;
}

/// In-memory provider with explicit load bookkeeping.
#[derive(Default)]
pub struct ImageStore {
    slots: BTreeMap<ImageRole, SourceStatus>,
}

impl ImageStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a decoded image to `role`, replacing anything there.
    pub fn insert(&mut self, role: ImageRole, image: RgbaImage) -> CropResult<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CropError::image(format!("{role} source has zero size")));
        }
        tracing::debug!(%role, width = image.width(), height = image.height(), "source inserted");
        self.slots.insert(role, SourceStatus::Ready(Arc::new(image)));
        Ok(())
    }

    /// Mark `role` as loading.
    pub fn begin_load(&mut self, role: ImageRole) {
        self.slots.insert(role, SourceStatus::Pending);
    }

    /// Complete a load started with [`Self::begin_load`].
    pub fn finish_load(&mut self, role: ImageRole, image: RgbaImage) -> CropResult<()> {
        self.insert(role, image)
    }

    /// Abandon a load; the role becomes missing.
    pub fn fail_load(&mut self, role: ImageRole) {
        tracing::warn!(%role, "source load failed");
        self.slots.remove(&role);
    }

    /// Remove `role`'s source.
    pub fn remove(&mut self, role: ImageRole) -> Option<Arc<RgbaImage>> {
        match self.slots.remove(&role) {
            Some(SourceStatus::Ready(img)) => Some(img),
            _ => None,
        }
    }
}

impl ImageSourceProvider for ImageStore {
    fn source(&self, role: ImageRole) -> SourceStatus {
        self.slots.get(&role).cloned().unwrap_or(SourceStatus::Missing)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
