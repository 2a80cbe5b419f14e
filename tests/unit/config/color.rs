use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));
}

#[test]
fn rejects_malformed_hex() {
    assert!(serde_json::from_value::<Color>(json!("#fff")).is_err());
    assert!(serde_json::from_value::<Color>(json!("#gg0000")).is_err());
    assert!(serde_json::from_value::<Color>(json!([1.0, 0.0])).is_err());
}

#[test]
fn serializes_as_hex() {
    let v = serde_json::to_value(Color::from_rgb8(0x12, 0xab, 0xff)).unwrap();
    assert_eq!(v, json!("#12abffff"));
}

#[test]
fn premul_conversion_scales_by_alpha() {
    let p = Color::rgba(1.0, 0.5, 0.0, 0.5).to_rgba8_premul();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 64);
    assert_eq!(p.b, 0);
}
