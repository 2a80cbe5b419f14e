use super::*;

fn layout(w: u32, h: u32) -> Layout {
    compute_layout(Canvas::new(w, h).unwrap(), &AnimatorConfig::default())
}

#[test]
fn node_counts_follow_config() {
    let l = layout(960, 540);
    assert_eq!(l.users.len(), 4);
    assert_eq!(l.edges.len(), 3);
    assert_eq!(l.regionals.len(), 2);
    assert_eq!(l.origin.id, NodeId::new(Tier::Origin, 0));
    assert_eq!(l.edge_regional, vec![0, 0, 1]);
}

#[test]
fn assigned_edges_are_fixed_at_layout_time() {
    let cfg = AnimatorConfig {
        user_edge_map: vec![0, 9, 2, 2],
        ..AnimatorConfig::default()
    };
    let l = compute_layout(Canvas::new(800, 450).unwrap(), &cfg);
    let edges = l.users.iter().map(|u| u.assigned_edge).collect::<Vec<_>>();
    assert_eq!(edges, vec![0, 2, 2, 2]);
}

#[test]
fn columns_run_left_to_right_and_stay_on_canvas() {
    let l = layout(960, 540);
    let ux = l.users[0].node.center.x;
    let ex = l.edges[0].center.x;
    let rx = l.regionals[0].center.x;
    let ox = l.origin.center.x;
    assert!(ux < ex && ex < rx && rx < ox);

    let bounds = Rect::new(0.0, 0.0, 960.0, 540.0);
    for n in l
        .users
        .iter()
        .map(|u| &u.node)
        .chain(&l.edges)
        .chain(&l.regionals)
        .chain(std::iter::once(&l.origin))
    {
        let r = n.rect();
        assert!(bounds.contains(Point::new(r.x0, r.y0)), "{:?}", n.id);
        assert!(bounds.contains(Point::new(r.x1, r.y1)), "{:?}", n.id);
    }
}

#[test]
fn nodes_in_a_column_do_not_overlap() {
    let l = layout(640, 360);
    for pair in l.edges.windows(2) {
        assert!(pair[0].rect().y1 < pair[1].rect().y0);
    }
    for pair in l.users.windows(2) {
        assert!(pair[0].node.rect().y1 < pair[1].node.rect().y0);
    }
}

#[test]
fn layout_scales_with_canvas() {
    let small = layout(480, 270);
    let big = layout(960, 540);
    let a = small.edges[1].center;
    let b = big.edges[1].center;
    assert!((b.x - 2.0 * a.x).abs() < 1e-9);
    assert!((b.y - 2.0 * a.y).abs() < 1e-9);
    assert_eq!(layout(960, 540), big);
}

#[test]
fn user_hit_test_uses_radius() {
    let l = layout(960, 540);
    let u = &l.users[2].node;
    assert_eq!(l.user_at(u.center), Some(2));
    let inside = Point::new(u.center.x + u.radius() * 0.9, u.center.y);
    assert_eq!(l.user_at(inside), Some(2));
    let outside = Point::new(u.center.x + u.radius() * 1.1, u.center.y);
    assert_eq!(l.user_at(outside), None);
}

#[test]
fn node_lookup_by_id() {
    let l = layout(960, 540);
    assert_eq!(
        l.node(NodeId::new(Tier::Regional, 1)).map(|n| n.label.as_str()),
        Some("Regional 2")
    );
    assert!(l.node(NodeId::new(Tier::Edge, 3)).is_none());
    assert!(l.node(NodeId::new(Tier::Origin, 1)).is_none());
}

#[test]
fn anchors_face_each_other() {
    let l = layout(960, 540);
    let e = &l.edges[0];
    let right = e.anchor_toward(l.origin.center);
    let left = e.anchor_toward(l.users[0].node.center);
    assert!(right.x > e.center.x);
    assert!(left.x < e.center.x);
}
