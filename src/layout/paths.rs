use crate::foundation::core::{BezPath, Canvas, Point, QuadBez};
use crate::layout::geometry::{NodeBox, UserNode};
use kurbo::ParamCurve;

/// Horizontal control-point offset, as a fraction of canvas width.
pub const ARC_STRENGTH: f64 = 0.025;
/// Vertical spacing between paths converging on one node, as a fraction of canvas height.
pub const FAN_SPACING: f64 = 0.045;

/// Connector curves between adjacent tiers, indexed by their upstream node.
#[derive(Clone, Debug, PartialEq)]
pub struct Connectors {
    /// `user_edge[u]`: user `u` -> its assigned edge.
    pub user_edge: Vec<QuadBez>,
    /// `edge_regional[e]`: edge `e` -> its regional.
    pub edge_regional: Vec<QuadBez>,
    /// `regional_origin[r]`: regional `r` -> origin.
    pub regional_origin: Vec<QuadBez>,
}

impl Connectors {
    pub fn iter(&self) -> impl Iterator<Item = &QuadBez> {
        self.user_edge
            .iter()
            .chain(&self.edge_regional)
            .chain(&self.regional_origin)
    }
}

/// Quadratic connector from `from` to `to`.
///
/// The control point sits at the chord midpoint, shifted vertically by `fan` and horizontally by
/// `arc`; the horizontal shift flips sign for right-to-left paths.
pub fn connector_curve(from: Point, to: Point, fan: f64, arc: f64) -> QuadBez {
    let mid = from.midpoint(to);
    let dir = if to.x >= from.x { 1.0 } else { -1.0 };
    QuadBez::new(from, Point::new(mid.x + dir * arc, mid.y + fan), to)
}

/// Vertical fan offsets (in spacing units) for sources converging on shared targets.
///
/// `targets[i]` is the downstream node of source `i`. Sources sharing a target are spread
/// symmetrically around zero in source order; a lone source gets `0.0`.
pub fn fan_offsets(targets: &[usize]) -> Vec<f64> {
    targets
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let group = targets.iter().filter(|&&o| o == t).count();
            let rank = targets[..i].iter().filter(|&&o| o == t).count();
            rank as f64 - (group as f64 - 1.0) / 2.0
        })
        .collect()
}

/// Sample `curve` at eased progress `t`; `reverse` walks it from `p2` back to `p0`.
pub fn point_on(curve: &QuadBez, t: f64, reverse: bool) -> Point {
    let t = t.clamp(0.0, 1.0);
    curve.eval(if reverse { 1.0 - t } else { t })
}

pub fn curve_path(curve: &QuadBez) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(curve.p0);
    path.quad_to(curve.p1, curve.p2);
    path
}

pub(crate) fn build_connectors(
    canvas: Canvas,
    users: &[UserNode],
    edges: &[NodeBox],
    regionals: &[NodeBox],
    origin: &NodeBox,
    edge_regional: &[usize],
) -> Connectors {
    let arc = ARC_STRENGTH * canvas.w();
    let spacing = FAN_SPACING * canvas.h();

    let link = |from: &NodeBox, to: &NodeBox, fan_units: f64| {
        connector_curve(
            from.anchor_toward(to.center),
            to.anchor_toward(from.center),
            fan_units * spacing,
            arc,
        )
    };

    let user_targets = users.iter().map(|u| u.assigned_edge).collect::<Vec<_>>();
    let user_edge = users
        .iter()
        .zip(fan_offsets(&user_targets))
        .map(|(u, fan)| link(&u.node, &edges[u.assigned_edge], fan))
        .collect();

    let edge_regional_links = edges
        .iter()
        .zip(edge_regional)
        .zip(fan_offsets(edge_regional))
        .map(|((e, &r), fan)| link(e, &regionals[r], fan))
        .collect();

    let origin_targets = vec![0; regionals.len()];
    let regional_origin = regionals
        .iter()
        .zip(fan_offsets(&origin_targets))
        .map(|(r, fan)| link(r, origin, fan))
        .collect();

    Connectors {
        user_edge,
        edge_regional: edge_regional_links,
        regional_origin,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/paths.rs"]
mod tests;
