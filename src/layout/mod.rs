//! Diagram geometry: node placement, connector curves and the static display list.

/// Static buffer contents.
pub mod diagram;
/// Node placement for a canvas size.
pub mod geometry;
/// Quadratic connector curves.
pub mod paths;
