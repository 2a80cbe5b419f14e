use crate::config::model::AnimatorConfig;
use crate::foundation::core::{Millis, Point, QuadBez, Rgba8Premul};
use crate::layout::geometry::{Layout, NodeId, Tier};
use crate::layout::paths::point_on;
use crate::render::display::DisplayList;
use crate::sim::animator::CacheFlowAnimator;
use crate::sim::invalidation::{Invalidation, InvalidationState};
use crate::sim::request::{Request, RequestState};
use kurbo::Circle;

/// Store ring radius at the start and end of a store stage, in dot radii.
const STORE_RING: (f64, f64) = (1.5, 3.5);
/// Invalidation pulse ring radius at start and end, in dot radii.
const PULSE_RING: (f64, f64) = (1.0, 5.0);

impl CacheFlowAnimator {
    /// Moving elements at the last processed frame, painted over the static buffer.
    pub fn scene(&self) -> DisplayList {
        sample(
            self.layout(),
            self.config(),
            self.requests(),
            self.invalidations(),
            self.last_frame_at(),
        )
    }
}

/// Moving elements for `now`: requests first, invalidations on top.
pub fn sample(
    layout: &Layout,
    cfg: &AnimatorConfig,
    requests: &[Request],
    invalidations: &[Invalidation],
    now: Millis,
) -> DisplayList {
    let mut list = DisplayList::new();
    let palette = &cfg.colors;
    let r = cfg.dot_radius;
    let ring_w = (r * 0.35).max(1.0);

    for req in requests {
        let t = req.progress(now, cfg);
        let color = match req.served_by {
            Some(Tier::Edge | Tier::Regional) => palette.hit,
            _ => palette.request,
        }
        .to_rgba8_premul();

        if let Some(node) = storing_at(req) {
            let Some(center) = layout.node(node).map(|n| n.center) else {
                continue;
            };
            let eased = cfg.ease.apply(t);
            let radius = r * (STORE_RING.0 + (STORE_RING.1 - STORE_RING.0) * eased);
            let store = palette.store.to_rgba8_premul().with_opacity(1.0 - eased * 0.6);
            list.stroke(&Circle::new(center, radius), ring_w, store);
            list.fill(&Circle::new(center, r), color);
            continue;
        }

        if let Some(p) = request_position(layout, req, cfg.ease.apply(t)) {
            list.fill(&Circle::new(p, r), color);
        }
    }

    let invalidate = palette.invalidate.to_rgba8_premul();
    for ev in invalidations {
        let t = ev.progress(now);
        match ev.state {
            InvalidationState::Traveling => {
                if let Some(p) = invalidation_position(layout, ev.target, cfg.ease.apply(t)) {
                    list.fill(&Circle::new(p, r), invalidate);
                }
            }
            InvalidationState::Pulsing => {
                if let Some(n) = layout.node(ev.target) {
                    pulse(&mut list, n.center, r, ring_w, t, invalidate);
                }
            }
            InvalidationState::Done => {}
        }
    }

    list
}

fn pulse(list: &mut DisplayList, center: Point, r: f64, w: f64, t: f64, color: Rgba8Premul) {
    let radius = r * (PULSE_RING.0 + (PULSE_RING.1 - PULSE_RING.0) * t);
    list.stroke(&Circle::new(center, radius), w * 1.5, color.with_opacity(1.0 - t));
}

fn storing_at(req: &Request) -> Option<NodeId> {
    match req.state {
        RequestState::StoringRegional => Some(NodeId::new(Tier::Regional, req.regional)),
        RequestState::StoringEdge => Some(NodeId::new(Tier::Edge, req.edge)),
        _ => None,
    }
}

/// Dot position of a travelling request at eased progress `t`; `None` while pending, storing
/// or done.
pub fn request_position(layout: &Layout, req: &Request, t: f64) -> Option<Point> {
    let c = &layout.connectors;
    let user_edge = c.user_edge.get(req.user)?;
    let edge_regional = c.edge_regional.get(req.edge)?;
    let regional_origin = c.regional_origin.get(req.regional)?;
    let p = match req.state {
        RequestState::TravelingToEdge => point_on(user_edge, t, false),
        RequestState::TravelingToRegional => point_on(edge_regional, t, false),
        RequestState::FetchingOrigin => out_and_back(regional_origin, t),
        RequestState::RegionalHitReturn | RequestState::ReturningToEdgeFromRegional => {
            point_on(edge_regional, t, true)
        }
        RequestState::EdgeHitReturn | RequestState::ReturningToUser => {
            point_on(user_edge, t, true)
        }
        RequestState::Pending
        | RequestState::StoringRegional
        | RequestState::StoringEdge
        | RequestState::Done => return None,
    };
    Some(p)
}

/// First half travels the curve forward, second half back.
fn out_and_back(curve: &QuadBez, t: f64) -> Point {
    if t < 0.5 {
        point_on(curve, t * 2.0, false)
    } else {
        point_on(curve, (t - 0.5) * 2.0, true)
    }
}

/// Position of an invalidation signal travelling from the origin to `target`.
///
/// Signals bound for an edge pass through its regional: the first half of the travel covers
/// regional -> origin in reverse, the second half edge -> regional in reverse.
pub fn invalidation_position(layout: &Layout, target: NodeId, t: f64) -> Option<Point> {
    let c = &layout.connectors;
    match target.tier {
        Tier::Regional => Some(point_on(c.regional_origin.get(target.index)?, t, true)),
        Tier::Edge => {
            let regional = *layout.edge_regional.get(target.index)?;
            if t < 0.5 {
                Some(point_on(c.regional_origin.get(regional)?, t * 2.0, true))
            } else {
                Some(point_on(c.edge_regional.get(target.index)?, (t - 0.5) * 2.0, true))
            }
        }
        Tier::User | Tier::Origin => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/scene.rs"]
mod tests;
