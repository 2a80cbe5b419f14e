//! Animator configuration and colour parsing.

/// Colour values accepted by the palette.
pub mod color;
/// `AnimatorConfig` and `Palette`.
pub mod model;
