//! Frame sinks.
//!
//! Sinks consume rendered frames in presentation order and are driven by
//! [`crate::session::player::Player`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// PNG files: single frames and numbered sequences.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
