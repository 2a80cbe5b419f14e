use crate::config::model::Palette;
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::layout::diagram::CacheView;
use crate::layout::geometry::Layout;
use crate::sim::animator::CacheFlowAnimator;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// This frame scaled uniformly to fit `width`x`height` and centred; uncovered pixels are
    /// transparent. Returns a copy when the size already matches.
    pub fn fit_into(&self, width: u32, height: u32) -> CacheFlowResult<FrameRGBA> {
        if (self.width, self.height) == (width, height) {
            return Ok(self.clone());
        }
        if self.width == 0 || self.height == 0 || width == 0 || height == 0 {
            return Err(CacheFlowError::render("cannot fit an empty frame"));
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CacheFlowError::render("frame byte len mismatch"))?;

        let scale = (f64::from(width) / f64::from(self.width))
            .min(f64::from(height) / f64::from(self.height));
        let w = ((f64::from(self.width) * scale).round() as u32).clamp(1, width);
        let h = ((f64::from(self.height) * scale).round() as u32).clamp(1, height);
        let scaled = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);

        let mut out = image::RgbaImage::new(width, height);
        image::imageops::replace(
            &mut out,
            &scaled,
            i64::from((width - w) / 2),
            i64::from((height - h) / 2),
        );
        Ok(FrameRGBA {
            width,
            height,
            data: out.into_raw(),
            premultiplied: self.premultiplied,
        })
    }
}

/// A renderer that turns animator state into frames.
///
/// The static buffer (connectors, boxes, labels, cache dots) is rasterized once per
/// [`CacheFlowAnimator::static_generation`] and blitted under the moving elements every frame.
pub trait RenderBackend {
    /// Compose the current frame: background, static buffer, then the sampled scene.
    fn render_frame(&mut self, anim: &CacheFlowAnimator) -> CacheFlowResult<FrameRGBA>;

    /// Render only the static diagram, as shown when motion is disabled.
    fn render_static(
        &mut self,
        layout: &Layout,
        cache: CacheView<'_>,
        palette: &Palette,
    ) -> CacheFlowResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuRenderer::new()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
