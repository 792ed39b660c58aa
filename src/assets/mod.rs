//! Source bitmaps: decoding and the per-role store sessions read from.

/// Encoded bytes to RGBA8 and back.
pub mod decode;
/// Per-role source provider with load bookkeeping.
pub mod store;
