use super::*;
use crate::encode::png::PngSequenceSink;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Fps;
use crate::sim::animator::LoopState;
use serde_json::json;

fn scenario(extra: serde_json::Value) -> Scenario {
    let mut v = json!({
        "canvas": { "width": 160, "height": 90 },
        "fps": { "num": 20, "den": 1 },
        "durationMs": 1000,
        "config": {
            "requestTravelMs": 100,
            "fetchFromOriginMs": 200,
            "cacheStoreMs": 50,
            "hitTravelMs": 80,
            "gapMs": 300
        }
    });
    if let (Some(base), Some(extra)) = (v.as_object_mut(), extra.as_object()) {
        for (k, val) in extra {
            base.insert(k.clone(), val.clone());
        }
    }
    Scenario::from_reader(v.to_string().as_bytes()).unwrap()
}

#[test]
fn render_pushes_every_frame_in_order() {
    let mut player = Player::new(scenario(json!({}))).unwrap();
    let mut sink = InMemorySink::new();
    let stats = player.render_to(&mut sink).unwrap();

    assert_eq!(stats.frames, 20);
    assert_eq!(sink.frames().len(), 20);
    assert!(sink.is_ended());
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (160, 90));
    }
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.fps, Fps { num: 20, den: 1 });
    assert_eq!(cfg.bg_rgba[3], 255);
    assert!(stats.active_frames > 0);
    assert!(stats.events > 0);
}

#[test]
fn events_apply_before_the_frame_they_are_due_in() {
    let mut player = Player::new(scenario(json!({
        "events": [{ "atMs": 120, "command": { "type": "pause" } }]
    })))
    .unwrap();

    // Frame 2 is at 100 ms, frame 3 at 150 ms.
    assert!(player.step(FrameIndex(0)).unwrap());
    assert!(player.step(FrameIndex(1)).unwrap());
    assert!(player.step(FrameIndex(2)).unwrap());
    assert!(!player.step(FrameIndex(3)).unwrap());

    let anim = player.mounted().get().unwrap();
    assert_eq!(anim.loop_state(), LoopState::Paused);
    let paused = player
        .trace()
        .iter()
        .find(|r| matches!(r.event, SimEvent::Paused { .. }))
        .unwrap();
    assert_eq!(paused.frame, 3);
    assert_eq!(paused.event, SimEvent::Paused { at: 120.0 });
}

#[test]
fn trace_covers_full_cold_run() {
    let mut player = Player::new(scenario(json!({ "durationMs": 3000 }))).unwrap();
    let trace = player.run_trace().unwrap();
    assert!(player.trace().is_empty());
    let commits = trace
        .iter()
        .filter(|r| matches!(r.event, SimEvent::CacheCommitted { cached: true, .. }))
        .count();
    // Two regionals and three edges warm up during the first run.
    assert_eq!(commits, 5);
    assert!(trace
        .iter()
        .any(|r| matches!(r.event, SimEvent::ReplayScheduled { .. })));

    let line = serde_json::to_value(&trace[0]).unwrap();
    assert_eq!(line["frame"], json!(0));
    assert_eq!(line["kind"], json!("run_started"));
}

#[test]
fn render_at_lands_on_exact_time() {
    let mut player = Player::new(scenario(json!({}))).unwrap();
    let frame = player.render_at(125.0).unwrap();
    assert_eq!(frame.width, 160);
    assert_eq!(player.clock(), Some(125.0));
    assert!(player.render_at(-1.0).is_err());
    assert!(player.advance_to(FrameIndex(0), 0.0).is_err());
}

#[test]
fn reduced_motion_renders_static_fallback() {
    let mut player = Player::new(scenario(json!({ "host": { "reducedMotion": true } }))).unwrap();
    assert!(matches!(player.mounted(), Mounted::Fallback));
    assert!(!player.step(FrameIndex(0)).unwrap());
    let a = player.render_current().unwrap();
    let b = player.fallback().unwrap();
    assert_eq!(a.data, b.data);
    assert!(player.run_trace().unwrap().is_empty());
}

#[test]
fn absent_host_cannot_render() {
    let mut player =
        Player::new(scenario(json!({ "host": { "contextAvailable": false } }))).unwrap();
    assert!(matches!(player.mounted(), Mounted::Absent));
    assert!(player.render_current().is_err());
    // The fallback image only needs the scenario canvas.
    assert!(player.fallback().is_ok());
}

#[test]
fn click_commands_reach_the_animator() {
    let mut player = Player::new(scenario(json!({
        "durationMs": 3000,
        "events": [
            { "atMs": 2950, "command": { "type": "clickUser", "user": 0 } },
            { "atMs": 2950, "command": { "type": "clickUser", "user": 0 } }
        ]
    })))
    .unwrap();
    player.run_trace().unwrap();
    let anim = player.mounted().get().unwrap();
    assert_eq!(anim.requests().iter().filter(|r| r.user == 0).count(), 1);
}

#[test]
fn resized_scenario_still_renders_at_the_scenario_canvas() {
    let events = json!({
        "events": [{ "atMs": 100, "command": { "type": "resize", "width": 320, "height": 200 } }]
    });
    let dir = std::env::temp_dir().join(format!("cacheflow-resize-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut player = Player::new(scenario(events.clone())).unwrap();
    let mut png = PngSequenceSink::new(&dir);
    let stats = player.render_to(&mut png).unwrap();
    assert_eq!(stats.frames, 20);
    assert_eq!(png.written(), 20);
    let anim = player.mounted().get().unwrap();
    assert_eq!(anim.layout().canvas, Canvas { width: 320, height: 200 });

    let mut player = Player::new(scenario(events)).unwrap();
    let mut mem = InMemorySink::new();
    player.render_to(&mut mem).unwrap();
    assert!(
        mem.frames()
            .iter()
            .all(|(_, f)| (f.width, f.height) == (160, 90))
    );
}
