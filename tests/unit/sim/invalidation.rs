use super::*;
use crate::layout::geometry::Tier;

fn event(now: Millis) -> Invalidation {
    Invalidation::new(
        InvalidationId(7),
        NodeId::new(Tier::Edge, 1),
        now,
        300.0,
        100.0,
    )
}

#[test]
fn starts_traveling() {
    let e = event(10.0);
    assert_eq!(e.state, InvalidationState::Traveling);
    assert_eq!(e.start, 10.0);
    assert!(!e.is_done());
}

#[test]
fn travels_then_pulses_then_completes() {
    let mut e = event(0.0);
    assert_eq!(e.step(299.0), None);
    assert_eq!(e.step(300.0), Some(InvalidationState::Pulsing));
    assert_eq!(e.progress(350.0), 0.5);
    assert_eq!(e.step(399.0), None);
    assert_eq!(e.step(400.0), Some(InvalidationState::Done));
    assert!(e.is_done());
    assert_eq!(e.step(10_000.0), None);
}

#[test]
fn shift_preserves_relative_progress() {
    let mut e = event(0.0);
    let before = e.progress(150.0);
    e.shift(1_000.0);
    assert_eq!(e.progress(1_150.0), before);
}
