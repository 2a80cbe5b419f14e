use super::*;
use crate::sim::animator::LoopState;
use serde_json::json;

fn canvas() -> Canvas {
    Canvas::new(640, 360).unwrap()
}

#[test]
fn mount_animates_with_canvas_and_context() {
    let m = mount(AnimatorConfig::default(), HostSurface::with_canvas(canvas()), 0.0).unwrap();
    let anim = m.animator().expect("animator mounted");
    assert_eq!(anim.loop_state(), LoopState::Running);
    assert_eq!(anim.run(), 1);
    assert_eq!(anim.listeners().len(), Listener::ALL.len());
}

#[test]
fn missing_canvas_or_context_is_silently_absent() {
    let m = mount(AnimatorConfig::default(), HostSurface::default(), 0.0).unwrap();
    assert!(matches!(m, Mounted::Absent));

    let host = HostSurface {
        context_available: false,
        ..HostSurface::with_canvas(canvas())
    };
    let m = mount(AnimatorConfig::default(), host, 0.0).unwrap();
    assert!(matches!(m, Mounted::Absent));

    let host = HostSurface::with_canvas(Canvas {
        width: 0,
        height: 10,
    });
    let m = mount(AnimatorConfig::default(), host, 0.0).unwrap();
    assert!(m.animator().is_none());
}

#[test]
fn reduced_motion_keeps_fallback() {
    let host = HostSurface {
        reduced_motion: true,
        ..HostSurface::with_canvas(canvas())
    };
    let m = mount(AnimatorConfig::default(), host, 0.0).unwrap();
    assert!(matches!(m, Mounted::Fallback));
}

#[test]
fn invalid_config_is_an_error() {
    let cfg = AnimatorConfig {
        users_count: 0,
        ..AnimatorConfig::default()
    };
    assert!(mount(cfg, HostSurface::with_canvas(canvas()), 0.0).is_err());
}

#[test]
fn commands_parse_from_tagged_json() {
    let cmds: Vec<Command> = serde_json::from_value(json!([
        { "type": "toggle" },
        { "type": "clearCache" },
        { "type": "click", "x": 10.0, "y": 20.0 },
        { "type": "clickUser", "user": 2 },
        { "type": "resize", "width": 800, "height": 600 }
    ]))
    .unwrap();
    assert_eq!(cmds[0], Command::Toggle);
    assert_eq!(cmds[1], Command::ClearCache);
    assert_eq!(cmds[2], Command::Click { x: 10.0, y: 20.0 });
    assert_eq!(cmds[3], Command::ClickUser { user: 2 });
    assert_eq!(cmds[4].listener(), Listener::Resize);
}

#[test]
fn host_surface_defaults_from_json() {
    let host: HostSurface =
        serde_json::from_value(json!({ "canvas": { "width": 320, "height": 180 } })).unwrap();
    assert!(host.context_available);
    assert!(!host.reduced_motion);
    assert_eq!(host.canvas, Some(Canvas::new(320, 180).unwrap()));
}
