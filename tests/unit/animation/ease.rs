use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn in_out_is_symmetric_around_midpoint() {
    assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < 1e-12);
    let lo = Ease::InOutQuad.apply(0.2);
    let hi = Ease::InOutQuad.apply(0.8);
    assert!((lo + hi - 1.0).abs() < 1e-12);
}

#[test]
fn progress_never_exceeds_one() {
    assert_eq!(progress(10_000.0, 0.0, 500.0), 1.0);
    assert_eq!(progress(250.0, 0.0, 500.0), 0.5);
    assert_eq!(progress(-5.0, 0.0, 500.0), 0.0);
    assert_eq!(progress(0.0, 0.0, 0.0), 1.0);
}
