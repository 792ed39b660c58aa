//! Pure geometry: rotated bounds, canvas layout and aspect-ratio helpers.

pub(crate) mod aspect;
pub(crate) mod bounds;
