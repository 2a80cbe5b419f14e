use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn pixel_is_bounds_checked() {
    let f = solid(2, 2, [1, 2, 3, 4]);
    assert_eq!(f.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(2, 0), None);
}

#[test]
fn fit_into_same_size_is_a_copy() {
    let f = solid(4, 2, [9, 9, 9, 255]);
    let g = f.fit_into(4, 2).unwrap();
    assert_eq!(g.data, f.data);
}

#[test]
fn fit_into_scales_matching_aspect() {
    let f = solid(320, 180, [10, 20, 30, 255]);
    let g = f.fit_into(160, 90).unwrap();
    assert_eq!((g.width, g.height), (160, 90));
    assert_eq!(g.data.len(), 160 * 90 * 4);
    assert_eq!(g.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(g.pixel(159, 89), Some([10, 20, 30, 255]));
}

#[test]
fn fit_into_letterboxes_other_aspect() {
    // A square source in a wide target: 90x90 centred, columns 35..125 covered.
    let f = solid(200, 200, [40, 40, 40, 255]);
    let g = f.fit_into(160, 90).unwrap();
    assert_eq!(g.pixel(0, 45), Some([0, 0, 0, 0]));
    assert_eq!(g.pixel(80, 45), Some([40, 40, 40, 255]));
    assert_eq!(g.pixel(159, 45), Some([0, 0, 0, 0]));
}

#[test]
fn fit_into_rejects_empty_target() {
    let f = solid(2, 2, [0; 4]);
    assert!(f.fit_into(0, 4).is_err());
}
