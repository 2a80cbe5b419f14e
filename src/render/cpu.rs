use crate::config::model::Palette;
use crate::foundation::core::{BezPath, Canvas, Rgba8Premul};
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::layout::diagram::{CacheView, build_static_diagram};
use crate::layout::geometry::Layout;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::display::{DisplayList, DrawOp};
use crate::render::labels::LabelRasterizer;
use crate::sim::animator::CacheFlowAnimator;
use std::sync::Arc;

/// Static buffer identity: it is reused while neither the generation nor the canvas changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StaticKey {
    generation: u64,
    canvas: Canvas,
}

/// CPU renderer powered by `vello_cpu` for shapes and `resvg` for labels.
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    labels: LabelRasterizer,
    static_layer: Option<(StaticKey, vello_cpu::Image)>,
    static_rasterizations: u64,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    /// Create a renderer with an empty static-buffer cache.
    pub fn new() -> Self {
        Self {
            ctx: None,
            labels: LabelRasterizer::new(),
            static_layer: None,
            static_rasterizations: 0,
        }
    }

    /// How many times the static buffer has been rasterized so far.
    pub fn static_rasterizations(&self) -> u64 {
        self.static_rasterizations
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CacheFlowResult<R>,
    ) -> CacheFlowResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Rasterize the static diagram (transparent background) into an image paint.
    fn rasterize_static(
        &mut self,
        list: &DisplayList,
        canvas: Canvas,
    ) -> CacheFlowResult<vello_cpu::Image> {
        let (w, h) = canvas_dims(canvas)?;
        let labels = match self.labels.rasterize(list, canvas)? {
            Some(bytes) => Some(image_from_premul(&bytes, w, h)?),
            None => None,
        };

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |_, ctx| {
            draw_ops(ctx, list);
            if let Some(labels) = labels {
                blit(ctx, labels, canvas);
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        self.static_rasterizations += 1;
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            ops = list.len(),
            "static buffer rasterized"
        );
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    fn compose(
        &mut self,
        canvas: Canvas,
        background: Rgba8Premul,
        static_layer: vello_cpu::Image,
        scene: &DisplayList,
    ) -> CacheFlowResult<FrameRGBA> {
        let (w, h) = canvas_dims(canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |_, ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(background));
            ctx.fill_rect(&full_rect(canvas));
            blit(ctx, static_layer, canvas);
            draw_ops(ctx, scene);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl RenderBackend for CpuRenderer {
    #[tracing::instrument(level = "debug", skip_all, fields(at = anim.last_frame_at()))]
    fn render_frame(&mut self, anim: &CacheFlowAnimator) -> CacheFlowResult<FrameRGBA> {
        let canvas = anim.layout().canvas;
        let palette = &anim.config().colors;
        let key = StaticKey {
            generation: anim.static_generation(),
            canvas,
        };

        let static_layer = match &self.static_layer {
            Some((k, img)) if *k == key => img.clone(),
            _ => {
                let list = build_static_diagram(anim.layout(), anim.cache_view(), palette);
                let img = self.rasterize_static(&list, canvas)?;
                self.static_layer = Some((key, img.clone()));
                img
            }
        };

        let scene = anim.scene();
        self.compose(
            canvas,
            palette.background.to_rgba8_premul(),
            static_layer,
            &scene,
        )
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn render_static(
        &mut self,
        layout: &Layout,
        cache: CacheView<'_>,
        palette: &Palette,
    ) -> CacheFlowResult<FrameRGBA> {
        let list = build_static_diagram(layout, cache, palette);
        let static_layer = self.rasterize_static(&list, layout.canvas)?;
        self.compose(
            layout.canvas,
            palette.background.to_rgba8_premul(),
            static_layer,
            &DisplayList::new(),
        )
    }
}

fn draw_ops(ctx: &mut vello_cpu::RenderContext, list: &DisplayList) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for op in &list.ops {
        match op {
            DrawOp::Fill { path, color } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::Stroke { path, width, color } => {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.set_paint(color_to_cpu(*color));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            // Rasterized separately into the label layer.
            DrawOp::Text { .. } => {}
        }
    }
}

fn blit(ctx: &mut vello_cpu::RenderContext, image: vello_cpu::Image, canvas: Canvas) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(image);
    ctx.fill_rect(&full_rect(canvas));
}

fn full_rect(canvas: Canvas) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(0.0, 0.0, canvas.w(), canvas.h())
}

fn canvas_dims(canvas: Canvas) -> CacheFlowResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| CacheFlowError::render("frame width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| CacheFlowError::render("frame height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CacheFlowError::render("frame width/height must be > 0"));
    }
    Ok((w, h))
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_from_premul(bytes: &[u8], w: u16, h: u16) -> CacheFlowResult<vello_cpu::Image> {
    if bytes.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(CacheFlowError::render("label layer byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
