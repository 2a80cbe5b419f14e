//! Offline host sessions.
//!
//! A [`scenario::Scenario`] scripts a host (canvas, frame rate, timed commands); a
//! [`player::Player`] plays it frame by frame into a frame sink or an event trace.

/// Frame-by-frame scenario playback.
pub mod player;
/// Scenario JSON model and validation.
pub mod scenario;
