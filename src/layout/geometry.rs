use crate::config::model::AnimatorConfig;
use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::layout::paths::{Connectors, build_connectors};

/// Column centres as fractions of canvas width.
const USER_COLUMN: f64 = 0.09;
const EDGE_COLUMN: f64 = 0.36;
const REGIONAL_COLUMN: f64 = 0.63;
const ORIGIN_COLUMN: f64 = 0.88;

/// Vertical band (fractions of canvas height) that nodes are distributed in; the strip above
/// it holds the tier headings.
const BAND_TOP: f64 = 0.14;
const BAND_HEIGHT: f64 = 0.80;

/// One layer of the simulated cache hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    User,
    Edge,
    Regional,
    Origin,
}

impl Tier {
    pub fn heading(self) -> &'static str {
        match self {
            Self::User => "Users",
            Self::Edge => "Edge",
            Self::Regional => "Regional",
            Self::Origin => "Origin",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId {
    pub tier: Tier,
    pub index: usize,
}

impl NodeId {
    pub fn new(tier: Tier, index: usize) -> Self {
        Self { tier, index }
    }
}

/// A node's absolute placement. Users are circles of radius `size.x / 2`; every other tier is
/// a rounded box.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
    pub id: NodeId,
    pub center: Point,
    pub size: Vec2,
    pub label: String,
}

impl NodeBox {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.size.x, self.size.y))
    }

    pub fn radius(&self) -> f64 {
        self.size.x.min(self.size.y) / 2.0
    }

    /// Where a connector toward `other` attaches: the middle of the facing side.
    pub fn anchor_toward(&self, other: Point) -> Point {
        let half = self.size.x / 2.0;
        if other.x >= self.center.x {
            Point::new(self.center.x + half, self.center.y)
        } else {
            Point::new(self.center.x - half, self.center.y)
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self.id.tier {
            Tier::User => self.center.distance(p) <= self.radius(),
            _ => self.rect().contains(p),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserNode {
    pub node: NodeBox,
    /// Fixed at layout time, immutable thereafter.
    pub assigned_edge: usize,
}

/// Absolute geometry of the whole diagram for one canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub canvas: Canvas,
    pub users: Vec<UserNode>,
    pub edges: Vec<NodeBox>,
    pub regionals: Vec<NodeBox>,
    pub origin: NodeBox,
    /// Regional tier each edge forwards misses to.
    pub edge_regional: Vec<usize>,
    pub connectors: Connectors,
}

impl Layout {
    pub fn node(&self, id: NodeId) -> Option<&NodeBox> {
        match id.tier {
            Tier::User => self.users.get(id.index).map(|u| &u.node),
            Tier::Edge => self.edges.get(id.index),
            Tier::Regional => self.regionals.get(id.index),
            Tier::Origin => (id.index == 0).then_some(&self.origin),
        }
    }

    /// First user whose circle contains `p`.
    pub fn user_at(&self, p: Point) -> Option<usize> {
        self.users.iter().position(|u| u.node.contains(p))
    }

    /// Heading positions (tier, baseline centre) above each column.
    pub fn headings(&self) -> [(Tier, Point); 4] {
        let y = self.canvas.h() * BAND_TOP * 0.55;
        let w = self.canvas.w();
        [
            (Tier::User, Point::new(w * USER_COLUMN, y)),
            (Tier::Edge, Point::new(w * EDGE_COLUMN, y)),
            (Tier::Regional, Point::new(w * REGIONAL_COLUMN, y)),
            (Tier::Origin, Point::new(w * ORIGIN_COLUMN, y)),
        ]
    }
}

/// Lay out the diagram proportionally to `canvas`. Pure: equal inputs give equal layouts.
pub fn compute_layout(canvas: Canvas, cfg: &AnimatorConfig) -> Layout {
    let (w, h) = (canvas.w(), canvas.h());
    let band_h = h * BAND_HEIGHT;

    let user_r = (w.min(h) * 0.04).clamp(8.0, 28.0).min(slot(band_h, cfg.users_count) * 0.4);
    let users = (0..cfg.users_count)
        .map(|i| UserNode {
            node: NodeBox {
                id: NodeId::new(Tier::User, i),
                center: Point::new(w * USER_COLUMN, column_y(h, cfg.users_count, i)),
                size: Vec2::new(user_r * 2.0, user_r * 2.0),
                label: format!("User {}", i + 1),
            },
            assigned_edge: cfg.assigned_edge(i),
        })
        .collect::<Vec<_>>();

    let box_w = (w * 0.13).clamp(40.0, 180.0);
    let box_h_for = |n: usize| (h * 0.11).clamp(24.0, 80.0).min(slot(band_h, n) * 0.8);

    let edges = boxes(
        Tier::Edge,
        cfg.edges_count,
        w * EDGE_COLUMN,
        h,
        Vec2::new(box_w, box_h_for(cfg.edges_count)),
    );
    let regionals = boxes(
        Tier::Regional,
        cfg.regionals_count,
        w * REGIONAL_COLUMN,
        h,
        Vec2::new(box_w, box_h_for(cfg.regionals_count)),
    );
    let origin = NodeBox {
        id: NodeId::new(Tier::Origin, 0),
        center: Point::new(w * ORIGIN_COLUMN, column_y(h, 1, 0)),
        size: Vec2::new(box_w, (box_h_for(1) * 1.6).min(band_h * 0.8)),
        label: "Origin".to_owned(),
    };

    let edge_regional = (0..cfg.edges_count)
        .map(|e| cfg.regional_for_edge(e))
        .collect::<Vec<_>>();
    let connectors = build_connectors(canvas, &users, &edges, &regionals, &origin, &edge_regional);

    Layout {
        canvas,
        users,
        edges,
        regionals,
        origin,
        edge_regional,
        connectors,
    }
}

fn slot(band_h: f64, n: usize) -> f64 {
    band_h / (n.max(1) as f64)
}

fn column_y(h: f64, n: usize, i: usize) -> f64 {
    h * BAND_TOP + (i as f64 + 0.5) * slot(h * BAND_HEIGHT, n)
}

fn boxes(tier: Tier, n: usize, x: f64, h: f64, size: Vec2) -> Vec<NodeBox> {
    (0..n)
        .map(|i| NodeBox {
            id: NodeId::new(tier, i),
            center: Point::new(x, column_y(h, n, i)),
            size,
            label: format!("{} {}", tier.heading(), i + 1),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
