use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::backend::FrameRGBA;
use anyhow::Context as _;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Where and how [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file instead of failing in `begin`.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// H.264 MP4 output through the system `ffmpeg`, fed opaque RGBA over stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoding: Option<Encoding>,
}

/// A running `ffmpeg` child between `begin` and `end`.
struct Encoding {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<String>,
    opaque: Vec<u8>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoding: None,
        }
    }

    /// Whether an encoder process is currently attached.
    pub fn is_encoding(&self) -> bool {
        self.encoding.is_some()
    }
}

/// yuv420p needs even dimensions, and rawvideo needs a non-zero rate.
fn check_mp4_config(cfg: &SinkConfig) -> CacheFlowResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(CacheFlowError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(CacheFlowError::validation("mp4 width/height must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(CacheFlowError::validation(format!(
            "mp4 width/height must be even, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for a rawvideo RGBA stdin stream encoded to `out`.
pub(crate) fn encoder_args(cfg: &SinkConfig, out: &Path, overwrite: bool) -> Vec<String> {
    let mut args = vec![
        if overwrite { "-y" } else { "-n" }.to_owned(),
        "-loglevel".to_owned(),
        "error".to_owned(),
        "-f".to_owned(),
        "rawvideo".to_owned(),
        "-pix_fmt".to_owned(),
        "rgba".to_owned(),
        "-s".to_owned(),
        format!("{}x{}", cfg.width, cfg.height),
        "-r".to_owned(),
        format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i".to_owned(),
        "pipe:0".to_owned(),
    ];
    args.extend(
        ["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"]
            .map(String::from),
    );
    args.push(out.display().to_string());
    args
}

impl Encoding {
    fn spawn(cfg: SinkConfig, opts: &FfmpegSinkOpts) -> CacheFlowResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&cfg, &opts.out_path, opts.overwrite))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("spawn ffmpeg")?;

        let (Some(stdin), Some(mut pipe)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(CacheFlowError::encode("ffmpeg pipes unavailable"));
        };
        // Drained concurrently with frame writes.
        let stderr = std::thread::spawn(move || {
            let mut text = String::new();
            let _ = pipe.read_to_string(&mut text);
            text
        });

        let opaque = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        Ok(Self {
            cfg,
            child,
            stdin,
            stderr,
            opaque,
            last_idx: None,
        })
    }

    fn write(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CacheFlowResult<()> {
        check_frame(&self.cfg, self.last_idx, idx, frame)?;
        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.opaque, &frame.data, self.cfg.bg_rgba)
                .map_err(CacheFlowError::validation)?;
        } else {
            self.opaque.copy_from_slice(&frame.data);
        }
        self.stdin
            .write_all(&self.opaque)
            .with_context(|| format!("pipe frame {} to ffmpeg", idx.0))?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn finish(self) -> CacheFlowResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);
        let status = child.wait().context("wait for ffmpeg")?;
        let log = stderr
            .join()
            .map_err(|_| CacheFlowError::encode("ffmpeg stderr reader panicked"))?;
        if !status.success() {
            return Err(CacheFlowError::encode(format!(
                "ffmpeg exited with {status}: {}",
                log.trim()
            )));
        }
        Ok(())
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CacheFlowResult<()> {
        check_mp4_config(&cfg)?;
        if self.encoding.is_some() {
            return Err(CacheFlowError::encode("mp4 sink already started"));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(CacheFlowError::validation(format!(
                "'{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(CacheFlowError::encode("ffmpeg not found on PATH"));
        }

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.encoding = Some(Encoding::spawn(cfg, &self.opts)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CacheFlowResult<()> {
        self.encoding
            .as_mut()
            .ok_or_else(|| CacheFlowError::encode("mp4 sink not started"))?
            .write(idx, frame)
    }

    fn end(&mut self) -> CacheFlowResult<()> {
        self.encoding
            .take()
            .ok_or_else(|| CacheFlowError::encode("mp4 sink not started"))?
            .finish()?;
        tracing::info!(out = %self.opts.out_path.display(), "mp4 written");
        Ok(())
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> CacheFlowResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Whether `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
