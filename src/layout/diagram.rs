use crate::config::model::Palette;
use crate::foundation::core::{BezPath, Point};
use crate::layout::geometry::{Layout, NodeBox, Tier};
use crate::layout::paths::curve_path;
use crate::render::display::{DisplayList, DrawOp, PATH_TOLERANCE};
use kurbo::{Circle, RoundedRect, Shape};

const DASH: [f64; 2] = [6.0, 5.0];

/// Cache flags the static buffer reflects.
#[derive(Clone, Copy, Debug)]
pub struct CacheView<'a> {
    pub edges: &'a [bool],
    pub regionals: &'a [bool],
}

/// Display list of the static buffer: dashed connectors, node boxes, labels and cache
/// indicator dots. Rebuilt whenever layout or a cache flag changes.
pub fn build_static_diagram(
    layout: &Layout,
    cache: CacheView<'_>,
    palette: &Palette,
) -> DisplayList {
    let mut list = DisplayList::new();
    let scale = layout.canvas.w().min(layout.canvas.h());
    let line_w = (scale / 360.0).clamp(1.0, 3.0);
    let label_size = (scale * 0.032).clamp(9.0, 22.0);

    let connector = palette.connector.to_rgba8_premul();
    for curve in layout.connectors.iter() {
        list.ops.push(DrawOp::Stroke {
            path: dashed(&curve_path(curve), line_w),
            width: line_w,
            color: connector,
        });
    }

    let text = palette.text.to_rgba8_premul();
    for (tier, at) in layout.headings() {
        list.text(tier.heading(), at, label_size * 1.1, text, true);
    }

    let fill = palette.node.to_rgba8_premul();
    let stroke = palette.node_stroke.to_rgba8_premul();
    for user in &layout.users {
        let n = &user.node;
        let circle = Circle::new(n.center, n.radius());
        list.fill(&circle, fill);
        list.stroke(&circle, line_w, stroke);
        let below = Point::new(n.center.x, n.center.y + n.radius() + label_size * 1.1);
        list.text(&n.label, below, label_size * 0.85, text, false);
    }

    let tiers = [(&layout.edges, cache.edges), (&layout.regionals, cache.regionals)];
    for (nodes, flags) in tiers {
        for (i, n) in nodes.iter().enumerate() {
            let cached = flags.get(i).copied().unwrap_or(false);
            cache_box(&mut list, n, cached, palette, line_w, label_size);
        }
    }

    let o = &layout.origin;
    let shape = RoundedRect::from_rect(o.rect(), corner(o));
    list.fill(&shape, palette.origin.to_rgba8_premul());
    list.stroke(&shape, line_w, stroke);
    list.text(&o.label, baseline(o, label_size), label_size, text, true);

    list
}

fn cache_box(
    list: &mut DisplayList,
    n: &NodeBox,
    cached: bool,
    palette: &Palette,
    line_w: f64,
    label_size: f64,
) {
    debug_assert!(matches!(n.id.tier, Tier::Edge | Tier::Regional));
    let shape = RoundedRect::from_rect(n.rect(), corner(n));
    list.fill(&shape, palette.node.to_rgba8_premul());
    list.stroke(&shape, line_w, palette.node_stroke.to_rgba8_premul());
    list.text(
        &n.label,
        baseline(n, label_size),
        label_size,
        palette.text.to_rgba8_premul(),
        false,
    );

    let r = indicator_radius(n);
    let rect = n.rect();
    let dot = Circle::new((rect.x1 - r * 2.0, rect.y0 + r * 2.0), r);
    let color = if cached {
        palette.cached
    } else {
        palette.uncached
    };
    list.fill(&dot, color.to_rgba8_premul());
}

pub(crate) fn indicator_radius(n: &NodeBox) -> f64 {
    (n.size.y * 0.09).clamp(2.5, 6.0)
}

fn corner(n: &NodeBox) -> f64 {
    (n.size.y * 0.18).min(10.0)
}

fn baseline(n: &NodeBox, size: f64) -> Point {
    Point::new(n.center.x, n.center.y + size * 0.35)
}

/// Dash a path into separate open segments, scaled by stroke width.
fn dashed(path: &BezPath, line_w: f64) -> BezPath {
    let pattern = [DASH[0] * line_w, DASH[1] * line_w];
    kurbo::dash(path.path_elements(PATH_TOLERANCE), 0.0, &pattern).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/diagram.rs"]
mod tests;
