use crate::foundation::core::{Canvas, Point, Rgba8Premul};
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::render::display::{DisplayList, DrawOp};
use std::fmt::Write as _;
use std::sync::Arc;

const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

/// Rasterizes the text operations of a display list through an SVG overlay.
///
/// Glyph shaping and font fallback are delegated to `usvg`; the system font database is loaded
/// on first use and shared afterwards.
#[derive(Default)]
pub(crate) struct LabelRasterizer {
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl LabelRasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn fontdb(&mut self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "loaded system fonts");
                Arc::new(db)
            })
            .clone()
    }

    /// Premultiplied RGBA8 layer of every text op in `list`, or `None` when there is no text.
    pub(crate) fn rasterize(
        &mut self,
        list: &DisplayList,
        canvas: Canvas,
    ) -> CacheFlowResult<Option<Vec<u8>>> {
        let doc = match svg_document(list, canvas) {
            Some(doc) => doc,
            None => return Ok(None),
        };

        let opts = usvg::Options {
            fontdb: self.fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| CacheFlowError::render(format!("label overlay: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| CacheFlowError::render("failed to allocate label pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(Some(pixmap.data().to_vec()))
    }
}

impl std::fmt::Debug for LabelRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelRasterizer")
            .field("fonts_loaded", &self.fontdb.is_some())
            .finish()
    }
}

/// SVG document with one centred `<text>` element per text op.
pub(crate) fn svg_document(list: &DisplayList, canvas: Canvas) -> Option<String> {
    let mut body = String::new();
    for op in list.texts() {
        let DrawOp::Text {
            text,
            anchor,
            size,
            color,
            bold,
        } = op
        else {
            continue;
        };
        text_element(&mut body, text, *anchor, *size, *color, *bold);
    }
    if body.is_empty() {
        return None;
    }
    Some(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
        w = canvas.width,
        h = canvas.height,
    ))
}

fn text_element(
    out: &mut String,
    text: &str,
    at: Point,
    size: f64,
    color: Rgba8Premul,
    bold: bool,
) {
    let [r, g, b, a] = color.to_straight();
    let weight = if bold { "bold" } else { "normal" };
    let _ = write!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{:.2}" font-weight="{weight}" text-anchor="middle" fill="rgb({r},{g},{b})" fill-opacity="{:.3}">{}</text>"#,
        at.x,
        at.y,
        size,
        f64::from(a) / 255.0,
        escape_xml(text),
    );
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/labels.rs"]
mod tests;
