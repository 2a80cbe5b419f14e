//! Rendering.

/// Frame type and backend trait.
pub mod backend;
/// `vello_cpu` backend.
pub mod cpu;
/// Backend-agnostic draw operations.
pub mod display;
pub(crate) mod labels;
