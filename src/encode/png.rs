use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::backend::FrameRGBA;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// Write one frame as an opaque PNG, flattening premultiplied alpha over `bg_rgba`.
pub fn write_png(path: &Path, frame: &FrameRGBA, bg_rgba: [u8; 4]) -> CacheFlowResult<()> {
    ensure_parent_dir(path)?;
    let mut straight = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        flatten_premul_over_bg(&mut straight, &frame.data, bg_rgba)
            .map_err(CacheFlowError::validation)?;
    } else {
        straight.copy_from_slice(&frame.data);
    }
    image::save_buffer_with_format(
        path,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Sink writing `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// Create a sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Path of the file written for `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }

    /// Number of frames written since `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> CacheFlowResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create png directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CacheFlowResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CacheFlowError::encode("png sink not started"))?;
        check_frame(cfg, self.last_idx, idx, frame)?;
        write_png(&self.frame_path(idx), frame, cfg.bg_rgba)?;
        self.last_idx = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> CacheFlowResult<()> {
        if self.cfg.take().is_none() {
            return Err(CacheFlowError::encode("png sink not started"));
        }
        tracing::info!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
