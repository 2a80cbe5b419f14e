use super::*;
use crate::config::model::AnimatorConfig;
use crate::foundation::core::Canvas;
use crate::layout::geometry::compute_layout;
use crate::render::display::DrawOp;

fn diagram(edges: &[bool], regionals: &[bool]) -> DisplayList {
    let cfg = AnimatorConfig::default();
    let layout = compute_layout(Canvas::new(960, 540).unwrap(), &cfg);
    build_static_diagram(&layout, CacheView { edges, regionals }, &cfg.colors)
}

fn fills_of(list: &DisplayList, color: crate::foundation::core::Rgba8Premul) -> usize {
    list.ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Fill { color: c, .. } if *c == color))
        .count()
}

#[test]
fn every_node_gets_a_label_plus_tier_headings() {
    let list = diagram(&[false; 3], &[false; 2]);
    // 4 headings + 4 users + 3 edges + 2 regionals + origin.
    assert_eq!(list.texts().count(), 14);
    let labels = list
        .texts()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(labels.contains(&"Edge 3"));
    assert!(labels.contains(&"Regional 2"));
    assert!(labels.contains(&"Origin"));
}

#[test]
fn cache_indicators_reflect_flags() {
    let palette = AnimatorConfig::default().colors;
    let cold = diagram(&[false; 3], &[false; 2]);
    assert_eq!(fills_of(&cold, palette.cached.to_rgba8_premul()), 0);

    let warm = diagram(&[true, false, true], &[false, true]);
    assert_eq!(fills_of(&warm, palette.cached.to_rgba8_premul()), 3);
    assert_ne!(cold, warm);
}

#[test]
fn connectors_are_dashed_into_several_segments() {
    let list = diagram(&[false; 3], &[false; 2]);
    let DrawOp::Stroke { path, .. } = &list.ops[0] else {
        panic!("first op should be a connector stroke");
    };
    let moves = path
        .elements()
        .iter()
        .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
        .count();
    assert!(moves > 1);
}
