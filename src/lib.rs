//! cacheflow animates requests travelling through a tiered cache (User -> Edge -> Regional ->
//! Origin) and renders the animation offline.
//!
//! - Configure an [`AnimatorConfig`] and [`mount`] a [`CacheFlowAnimator`] on a host surface
//! - Drive it with `tick(now)` and [`Command`]s
//! - Render frames with [`CpuRenderer`], or play a whole [`Scenario`] into a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Easing and stage progress.
pub mod animation;
/// Animator configuration and palette.
pub mod config;
/// Frame sinks (in-memory, PNG, MP4).
pub mod encode;
/// Diagram layout and static display list.
pub mod layout;
/// Rendering backends.
pub mod render;
/// Offline scenario playback.
pub mod session;
/// The request-flow simulation.
pub mod sim;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Millis, Point, QuadBez, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{CacheFlowError, CacheFlowResult};

pub use crate::config::color::Color;
pub use crate::config::model::{AnimatorConfig, Palette};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend};
pub use crate::render::cpu::CpuRenderer;
pub use crate::session::player::{Player, RenderStats, TraceRecord};
pub use crate::session::scenario::Scenario;
pub use crate::sim::animator::{CacheFlowAnimator, FrameDecision, LoopState};
pub use crate::sim::events::SimEvent;
pub use crate::sim::host::{Command, HostSurface, Mounted, mount};
