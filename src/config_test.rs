#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_match_deck_defaults() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.design_width, 1920.0);
    assert_eq!(cfg.design_height, 1080.0);
    assert_eq!(cfg.view_transition_ms, 4000.0);
    assert_eq!(cfg.pixelate_steps, 20);
    assert_eq!(cfg.handle_radius_px, 20.0);
    assert_eq!(cfg.anchor_point_radius_px, 6.0);
    assert_eq!(cfg.rotate_snap_deg, 15.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_json_fills_missing_keys() {
    let cfg = EngineConfig::from_json(r#"{"viewTransitionMs": 1500, "designWidth": 1280, "defaultTextColor": "white"}"#)
        .unwrap();
    assert_eq!(cfg.view_transition_ms, 1500.0);
    assert_eq!(cfg.design_width, 1280.0);
    assert_eq!(cfg.design_height, 1080.0);
}

#[test]
fn from_json_rejects_bad_values() {
    assert!(matches!(EngineConfig::from_json("nope"), Err(ConfigError::Json(_))));
    let err = EngineConfig::from_json(r#"{"zoomOutRatio": 1.5}"#).unwrap_err();
    assert!(err.to_string().contains("zoomOutRatio"));
    assert!(matches!(
        EngineConfig::from_json(r#"{"minWorldSize": 0}"#),
        Err(ConfigError::OutOfRange { key: "minWorldSize", .. })
    ));
    assert!(EngineConfig::from_json(r#"{"pixelateSteps": 0}"#).is_err());
}

#[test]
fn lookup_without_keys_is_default() {
    let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn lookup_parses_overrides() {
    let cfg = EngineConfig::from_lookup(lookup(&[
        ("CUEDECK_VIEW_TRANSITION_MS", "250"),
        ("CUEDECK_PIXELATE_STEPS", " 8 "),
        ("CUEDECK_ZOOM_OUT_RATIO", "1"),
        ("CUEDECK_SCREEN_GRID", "0.05"),
    ]))
    .unwrap();
    assert_eq!(cfg.view_transition_ms, 250.0);
    assert_eq!(cfg.pixelate_steps, 8);
    assert_eq!(cfg.zoom_out_ratio, 1.0);
    assert_eq!(cfg.screen_grid, 0.05);
}

#[test]
fn lookup_reports_unparseable_value() {
    let err = EngineConfig::from_lookup(lookup(&[("CUEDECK_GRID_BASE", "wide")])).unwrap_err();
    assert!(matches!(&err, ConfigError::Parse { key, value } if key == "CUEDECK_GRID_BASE" && value == "wide"));
}

#[test]
fn lookup_rejects_nan() {
    let err = EngineConfig::from_lookup(lookup(&[("CUEDECK_DESIGN_WIDTH", "NaN")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { key: "designWidth", .. }));
}

#[test]
fn derived_settings() {
    let cfg = EngineConfig { handle_radius_px: 12.0, anchor_point_radius_px: 3.0, ..EngineConfig::default() };
    assert_eq!(cfg.design_viewport(), Viewport::new(1920.0, 1080.0));
    assert_eq!(cfg.tuning(), TransitionTuning::default());
    let tol = cfg.tolerances();
    assert_eq!((tol.corner_px, tol.edge_px, tol.anchor_px), (12.0, 12.0, 3.0));
}
