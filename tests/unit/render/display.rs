use super::*;
use kurbo::{Circle, Rect};

#[test]
fn ops_keep_insertion_order() {
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    let mut list = DisplayList::new();
    assert!(list.is_empty());
    list.fill(&Rect::new(0.0, 0.0, 4.0, 4.0), red);
    list.stroke(&Circle::new((2.0, 2.0), 1.0), 1.5, red);
    list.text("Edge 1", Point::new(2.0, 2.0), 12.0, red, false);
    assert_eq!(list.len(), 3);
    assert!(matches!(list.ops[0], DrawOp::Fill { .. }));
    assert!(matches!(list.ops[1], DrawOp::Stroke { width, .. } if width == 1.5));
    assert_eq!(list.texts().count(), 1);
}
