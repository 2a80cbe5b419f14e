use super::*;
use serde_json::json;

#[test]
fn empty_object_yields_defaults() {
    let cfg: AnimatorConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(cfg, AnimatorConfig::default());
    assert_eq!(cfg.users_count, 4);
    assert_eq!(cfg.edges_count, 3);
    assert_eq!(cfg.regionals_count, 2);
    assert_eq!(cfg.user_edge_map, vec![0, 1, 2, 2]);
    cfg.validate().unwrap();
}

#[test]
fn camel_case_keys_are_recognized() {
    let cfg = AnimatorConfig::from_reader(
        json!({
            "usersCount": 2,
            "edgesCount": 2,
            "userEdgeMap": [1, 0],
            "sequential": false,
            "userStaggerMs": 100,
            "requestTravelMs": 200,
            "fetchFromOriginMs": 300,
            "cacheStoreMs": 50,
            "hitTravelMs": 150,
            "gapMs": 900,
            "dotRadius": 4,
            "colors": { "request": "#ff0000" }
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.users_count, 2);
    assert!(!cfg.sequential);
    assert_eq!(cfg.request_travel_ms, 200.0);
    assert_eq!(cfg.colors.request, Color::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(cfg.colors.hit, Palette::default().hit);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = AnimatorConfig::from_reader(json!({"userCount": 3}).to_string().as_bytes())
        .unwrap_err();
    assert!(err.to_string().contains("serialization error"));
}

#[test]
fn validation_catches_bad_values() {
    let cfg = AnimatorConfig {
        edges_count: 0,
        ..AnimatorConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = AnimatorConfig {
        hit_travel_ms: -1.0,
        ..AnimatorConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = AnimatorConfig {
        dot_radius: 0.0,
        ..AnimatorConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn assigned_edge_is_clamped_and_falls_back() {
    let cfg = AnimatorConfig {
        users_count: 6,
        user_edge_map: vec![0, 7, 1],
        ..AnimatorConfig::default()
    };
    assert_eq!(cfg.assigned_edge(0), 0);
    assert_eq!(cfg.assigned_edge(1), 2);
    assert_eq!(cfg.assigned_edge(2), 1);
    assert_eq!(cfg.assigned_edge(3), 0);
    assert_eq!(cfg.assigned_edge(5), 2);
}

#[test]
fn edges_map_onto_regionals_in_order() {
    let cfg = AnimatorConfig::default();
    assert_eq!(cfg.regional_for_edge(0), 0);
    assert_eq!(cfg.regional_for_edge(1), 0);
    assert_eq!(cfg.regional_for_edge(2), 1);
}
