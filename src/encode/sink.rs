use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::CacheFlowResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Straight RGBA8 colour used by sinks that flatten alpha.
    pub bg_rgba: [u8; 4],
}

/// Sink contract for consuming rendered frames in presentation order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order between `begin` and `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CacheFlowResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CacheFlowResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CacheFlowResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CacheFlowResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CacheFlowResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CacheFlowResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Reject frames that arrive out of order or with the wrong size.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> CacheFlowResult<()> {
    use crate::foundation::error::CacheFlowError;

    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(CacheFlowError::encode(
            "sink received out-of-order frame index",
        ));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(CacheFlowError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(CacheFlowError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
