use super::*;
use crate::config::model::AnimatorConfig;

fn animator(w: u32, h: u32) -> CacheFlowAnimator {
    CacheFlowAnimator::start(AnimatorConfig::default(), Canvas::new(w, h).unwrap(), 0.0).unwrap()
}

#[test]
fn frame_has_canvas_size_and_background_corner() {
    let anim = animator(320, 180);
    let mut r = CpuRenderer::new();
    let frame = r.render_frame(&anim).unwrap();
    assert_eq!((frame.width, frame.height), (320, 180));
    assert_eq!(frame.data.len(), 320 * 180 * 4);
    assert!(frame.premultiplied);

    let bg = anim.config().colors.background.to_rgba8_premul();
    assert_eq!(frame.pixel(0, 0), Some([bg.r, bg.g, bg.b, bg.a]));
    assert_eq!(frame.pixel(320, 0), None);
}

#[test]
fn static_buffer_is_reused_until_generation_changes() {
    let mut anim = animator(320, 180);
    let mut r = CpuRenderer::new();
    r.render_frame(&anim).unwrap();
    anim.tick(0.0);
    anim.tick(100.0);
    r.render_frame(&anim).unwrap();
    assert_eq!(r.static_rasterizations(), 1);

    anim.clear_cache(120.0);
    r.render_frame(&anim).unwrap();
    assert_eq!(r.static_rasterizations(), 2);
    r.render_frame(&anim).unwrap();
    assert_eq!(r.static_rasterizations(), 2);
}

#[test]
fn moving_dot_changes_pixels() {
    let mut anim = animator(320, 180);
    let mut r = CpuRenderer::new();
    let still = r.render_frame(&anim).unwrap();
    anim.tick(0.0);
    anim.tick(450.0);
    let moving = r.render_frame(&anim).unwrap();
    assert_ne!(still.data, moving.data);
}

#[test]
fn static_render_matches_size_and_draws_nodes() {
    let cfg = AnimatorConfig::default();
    let canvas = Canvas::new(240, 160).unwrap();
    let layout = crate::layout::geometry::compute_layout(canvas, &cfg);
    let cache = CacheView {
        edges: &[false; 3],
        regionals: &[false; 2],
    };
    let mut r = CpuRenderer::new();
    let frame = r.render_static(&layout, cache, &cfg.colors).unwrap();
    assert_eq!((frame.width, frame.height), (240, 160));

    let bg = cfg.colors.background.to_rgba8_premul();
    let c = layout.origin.center;
    let px = frame.pixel(c.x as u32, c.y as u32).unwrap();
    assert_ne!(px, [bg.r, bg.g, bg.b, bg.a]);
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let err = canvas_dims(Canvas {
        width: 70_000,
        height: 10,
    })
    .unwrap_err();
    assert!(matches!(err, CacheFlowError::Render(_)));
}

#[test]
fn path_conversion_keeps_segments() {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    p.quad_to((5.0, 5.0), (10.0, 0.0));
    p.close_path();
    assert_eq!(bezpath_to_cpu(&p).elements().len(), 3);
}
