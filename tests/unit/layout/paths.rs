use super::*;
use crate::config::model::AnimatorConfig;
use crate::layout::geometry::compute_layout;

#[test]
fn fan_offsets_are_symmetric_per_target() {
    assert_eq!(fan_offsets(&[0, 1, 2, 2]), vec![0.0, 0.0, -0.5, 0.5]);
    assert_eq!(fan_offsets(&[0, 0, 0]), vec![-1.0, 0.0, 1.0]);
    assert_eq!(fan_offsets(&[]), Vec::<f64>::new());
}

#[test]
fn control_point_arc_flips_with_direction() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(100.0, 0.0);
    let ltr = connector_curve(a, b, 10.0, 5.0);
    let rtl = connector_curve(b, a, 10.0, 5.0);
    assert_eq!(ltr.p1, Point::new(55.0, 10.0));
    assert_eq!(rtl.p1, Point::new(45.0, 10.0));
}

#[test]
fn point_on_hits_endpoints_both_ways() {
    let q = connector_curve(Point::new(10.0, 20.0), Point::new(90.0, 60.0), -8.0, 3.0);
    assert_eq!(point_on(&q, 0.0, false), q.p0);
    assert_eq!(point_on(&q, 1.0, false), q.p2);
    assert_eq!(point_on(&q, 0.0, true), q.p2);
    assert_eq!(point_on(&q, 1.0, true), q.p0);
    assert_eq!(point_on(&q, 7.0, false), q.p2);
}

#[test]
fn converging_user_links_are_distinguishable() {
    let l = compute_layout(
        Canvas::new(960, 540).unwrap(),
        &AnimatorConfig::default(),
    );
    let c = &l.connectors;
    assert_eq!(c.user_edge.len(), 4);
    assert_eq!(c.edge_regional.len(), 3);
    assert_eq!(c.regional_origin.len(), 2);
    // Users 2 and 3 share edge 2: same endpoint, different control points.
    assert_eq!(c.user_edge[2].p2, c.user_edge[3].p2);
    assert!(c.user_edge[2].p1.y < c.user_edge[3].p1.y);
    assert_eq!(c.iter().count(), 9);
}

#[test]
fn curve_path_starts_and_ends_on_curve() {
    let q = connector_curve(Point::new(0.0, 0.0), Point::new(50.0, 50.0), 0.0, 0.0);
    let path = curve_path(&q);
    let els = path.elements();
    assert_eq!(els.len(), 2);
    assert_eq!(els[0], kurbo::PathEl::MoveTo(q.p0));
    assert_eq!(els[1], kurbo::PathEl::QuadTo(q.p1, q.p2));
}
