//! Crop sessions: rectangle model, pointer interaction, commit pipeline and
//! the per-role editor that ties them together.

/// Committing a session into pixels and descriptors.
pub mod commit;
/// Per-session geometry context.
pub mod context;
/// Normalized and legacy crop persistence records.
pub mod descriptor;
/// Pointer hit-testing and drag handling.
pub mod interaction;
/// Crop rectangle state and its invariants.
pub mod model;
/// The editor that owns per-role slots and the active session.
pub mod session;
