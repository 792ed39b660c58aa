/// Convenience result type used across cropframe.
pub type CropResult<T> = Result<T, CropError>;

/// Top-level error taxonomy used by editor APIs.
///
/// Geometry and pointer interaction never fail; errors only come from resource
/// acquisition, decoding, persistence parsing and user-supplied tokens.
#[derive(thiserror::Error, Debug)]
pub enum CropError {
    /// Invalid user-provided data (tokens, dimensions, roles).
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be acquired.
    #[error("surface error: {0}")]
    Surface(String),

    /// Source image missing, not decoded, or not encodable.
    #[error("image error: {0}")]
    Image(String),

    /// Errors when serializing or deserializing persisted state.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CropError {
    /// Build a [`CropError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CropError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`CropError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`CropError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CropError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
