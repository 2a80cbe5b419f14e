//! The request-flow simulation.
//!
//! [`animator::CacheFlowAnimator`] owns all per-mount state and is driven by explicit
//! `tick(now)` calls and host [`host::Command`]s.

/// The animator: cache flags, active entities, loop state and timers.
pub mod animator;
/// Observable simulation events.
pub mod events;
/// Host contract: surfaces, commands and mounting.
pub mod host;
/// Invalidation signals.
pub mod invalidation;
/// Request lifecycle state machine.
pub mod request;
/// Moving elements sampled for a frame.
pub mod scene;
