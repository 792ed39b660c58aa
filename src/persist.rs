//! JSON persistence of per-role crop records.

use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::{
    crop::descriptor::{CropSettings, NormalizedCropDescriptor},
    foundation::{core::ImageRole, error::CropResult},
};

/// Stored crop records of one image role.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistedRoleState {
    /// Last normalized crop, committed or closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<NormalizedCropDescriptor>,
    /// Last committed pixel crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<CropSettings>,
}

/// Everything the editor needs to restore crops across restarts.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedCropState {
    /// Records keyed by role.
    pub roles: BTreeMap<ImageRole, PersistedRoleState>,
    /// Aspect ratio of the primary's last committed crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_crop_aspect_ratio: Option<f64>,
}

impl PersistedCropState {
    /// Clamp every descriptor into the unit square and drop a ratio that is
    /// not finite and positive.
    pub fn sanitized(mut self) -> Self {
        for role in self.roles.values_mut() {
            role.descriptor = role.descriptor.map(NormalizedCropDescriptor::clamped);
        }
        self.main_crop_aspect_ratio = self
            .main_crop_aspect_ratio
            .filter(|r| r.is_finite() && *r > 0.0);
        self
    }

    /// Parse from JSON.
    pub fn from_json_str(s: &str) -> CropResult<Self> {
        let state: Self = serde_json::from_str(s)?;
        Ok(state.sanitized())
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> CropResult<String> {
        Ok(serde_json::to_string_pretty(&self.clone().sanitized())?)
    }

    /// Read from a JSON file.
    pub fn load(path: &Path) -> CropResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read crop state '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Write to a JSON file.
    pub fn save(&self, path: &Path) -> CropResult<()> {
        let text = self.to_json_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("write crop state '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/persist.rs"]
mod tests;
