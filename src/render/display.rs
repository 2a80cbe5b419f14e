use crate::foundation::core::{BezPath, Point, Rgba8Premul};
use kurbo::Shape;

/// Curve flattening tolerance used when converting shapes to paths.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

/// Backend-agnostic drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill {
        path: BezPath,
        color: Rgba8Premul,
    },
    Stroke {
        path: BezPath,
        width: f64,
        color: Rgba8Premul,
    },
    /// Horizontally centred text whose baseline passes through `anchor`.
    Text {
        text: String,
        anchor: Point,
        size: f64,
        color: Rgba8Premul,
        bold: bool,
    },
}

/// Ordered list of draw operations, painted back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn fill(&mut self, shape: &impl Shape, color: Rgba8Premul) {
        self.ops.push(DrawOp::Fill {
            path: shape.to_path(PATH_TOLERANCE),
            color,
        });
    }

    pub fn stroke(&mut self, shape: &impl Shape, width: f64, color: Rgba8Premul) {
        self.ops.push(DrawOp::Stroke {
            path: shape.to_path(PATH_TOLERANCE),
            width,
            color,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        anchor: Point,
        size: f64,
        color: Rgba8Premul,
        bold: bool,
    ) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            anchor,
            size,
            color,
            bold,
        });
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { .. }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/display.rs"]
mod tests;
