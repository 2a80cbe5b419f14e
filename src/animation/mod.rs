//! Time helpers shared by the simulation and the scene sampler.

/// Easing curves and stage progress.
pub mod ease;
