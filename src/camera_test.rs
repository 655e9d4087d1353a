#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Anchor;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn vp() -> Viewport {
    Viewport::new(1000.0, 500.0)
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.cx, 0.0);
    assert_eq!(cam.cy, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn viewport_sanitized_floors_degenerate_sizes() {
    let v = Viewport::new(0.0, f64::NAN).sanitized();
    assert_eq!(v, Viewport::new(1.0, 1.0));
}

// --- visible_rect ---

#[test]
fn visible_rect_at_zoom_one() {
    let r = Camera::new(0.0, 0.0, 1.0).visible_rect(vp());
    assert_eq!(r, Rect::new(-500.0, -250.0, 1000.0, 500.0));
}

#[test]
fn visible_rect_shrinks_with_zoom() {
    let r = Camera::new(100.0, 50.0, 2.0).visible_rect(vp());
    assert_eq!(r, Rect::new(-150.0, -75.0, 500.0, 250.0));
}

#[test]
fn zero_zoom_does_not_divide_by_zero() {
    let r = Camera::new(0.0, 0.0, 0.0).visible_rect(vp());
    assert!(r.w.is_finite());
}

// --- screen/world conversion ---

#[test]
fn viewport_center_maps_to_camera_center() {
    let cam = Camera::new(40.0, -10.0, 3.0);
    let world = cam.screen_to_world(Point::new(500.0, 250.0), vp());
    assert!(point_approx_eq(world, Point::new(40.0, -10.0)));
}

#[test]
fn screen_world_roundtrip() {
    let cam = Camera::new(12.5, 99.0, 0.37);
    let screen = Point::new(123.0, 456.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen, vp()), vp());
    assert!(point_approx_eq(back, screen));
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let cam = Camera::new(0.0, 0.0, 4.0);
    assert!(approx_eq(cam.screen_dist_to_world(20.0), 5.0));
}

// --- Projection ---

#[test]
fn projection_maps_world_through_camera() {
    let proj = Projection::new(Camera::new(100.0, 0.0, 2.0), vp());
    assert!(point_approx_eq(proj.to_screen(Space::World, Point::new(100.0, 0.0)), Point::new(500.0, 250.0)));
    assert!(point_approx_eq(proj.delta_from_screen(Space::World, Point::new(10.0, 4.0)), Point::new(5.0, 2.0)));
}

#[test]
fn projection_maps_screen_fractions_to_pixels() {
    let proj = Projection::new(Camera::new(9999.0, 9999.0, 7.0), vp());
    assert_eq!(proj.to_screen(Space::Screen, Point::new(0.5, 0.5)), Point::new(500.0, 250.0));
    assert_eq!(proj.from_screen(Space::Screen, Point::new(250.0, 50.0)), Point::new(0.25, 0.1));
    assert_eq!(proj.delta_from_screen(Space::Screen, Point::new(100.0, 100.0)), Point::new(0.1, 0.2));
}

#[test]
fn projection_transform_keeps_anchor_and_rotation() {
    let proj = Projection::new(Camera::new(0.0, 0.0, 2.0), vp());
    let t = Transform::new(10.0, 10.0, 30.0, 20.0, Anchor::Center).with_rotation(45.0);
    let s = proj.transform_to_screen(Space::World, &t);
    assert_eq!((s.x, s.y, s.w, s.h), (520.0, 270.0, 60.0, 40.0));
    assert_eq!(s.anchor, Anchor::Center);
    assert_eq!(s.rotation_deg, 45.0);
    let back = proj.transform_from_screen(Space::World, &s);
    assert!(approx_eq(back.x, t.x) && approx_eq(back.w, t.w) && approx_eq(back.h, t.h));
}

// --- zoom_to_fit ---

#[test]
fn zoom_to_fit_uses_tighter_axis() {
    assert!(approx_eq(zoom_to_fit(&Rect::new(0.0, 0.0, 2000.0, 500.0), vp()), 0.5));
    assert!(approx_eq(zoom_to_fit(&Rect::new(0.0, 0.0, 1000.0, 2000.0), vp()), 0.25));
}

// --- plan_transition ---

#[test]
fn heavily_overlapping_views_tween_directly() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(300.0, 0.0, 1.0);
    let plan = plan_transition(&from, &to, vp(), 4000.0, TransitionTuning::default());
    assert_eq!(plan, TransitionPlan::Direct { to, duration_ms: 4000.0 });
    assert!(!plan.is_two_stage());
}

#[test]
fn diagonal_overlap_above_half_is_direct() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(200.0, 100.0, 1.0);
    let overlap = from.visible_rect(vp()).intersection_area(&to.visible_rect(vp()));
    assert!(overlap > 0.5 * 1000.0 * 500.0);
    let plan = plan_transition(&from, &to, vp(), 1000.0, TransitionTuning::default());
    assert!(!plan.is_two_stage());
}

#[test]
fn disjoint_views_zoom_out_through_midpoint() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(1000.0, 0.0, 1.0);
    let plan = plan_transition(&from, &to, vp(), 4000.0, TransitionTuning::default());
    let TransitionPlan::TwoStage { mid, to: dest, first_ms, second_ms } = plan else {
        panic!("expected two-stage plan, got {plan:?}");
    };
    let union = from.visible_rect(vp()).union(&to.visible_rect(vp()));
    let expected_zoom = (1000.0 / union.w).min(500.0 / union.h);
    assert!(approx_eq(mid.zoom, expected_zoom));
    assert!(approx_eq(mid.zoom, 0.5));
    assert!(approx_eq(mid.cx, 500.0));
    assert!(approx_eq(mid.cy, 0.0));
    assert_eq!(dest, to);
    assert_eq!(first_ms + second_ms, 4000.0);
    assert_eq!(first_ms, 2000.0);
}

#[test]
fn identical_views_never_zoom_out() {
    let cam = Camera::new(5.0, 5.0, 2.0);
    let tuning = TransitionTuning { zoom_out_ratio: 1.0, epsilon: 1e-6 };
    let plan = plan_transition(&cam, &cam, vp(), 500.0, tuning);
    assert!(!plan.is_two_stage());
}

#[test]
fn strict_ratio_zooms_out_for_any_spill() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(300.0, 0.0, 1.0);
    let tuning = TransitionTuning { zoom_out_ratio: 1.0, epsilon: 1e-6 };
    assert!(plan_transition(&from, &to, vp(), 1000.0, tuning).is_two_stage());
}

#[test]
fn zooming_into_a_detail_is_direct() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(100.0, 50.0, 10.0);
    let plan = plan_transition(&from, &to, vp(), 1000.0, TransitionTuning::default());
    assert!(!plan.is_two_stage());
}

#[test]
fn negative_duration_clamps_to_zero() {
    let from = Camera::default();
    let plan = plan_transition(&from, &from, vp(), -5.0, TransitionTuning::default());
    assert_eq!(plan.stages(), vec![(from, 0.0)]);
}

#[test]
fn stages_list_midpoint_first() {
    let from = Camera::new(0.0, 0.0, 1.0);
    let to = Camera::new(5000.0, 0.0, 1.0);
    let plan = plan_transition(&from, &to, vp(), 1000.0, TransitionTuning::default());
    let stages = plan.stages();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[1].0, to);
    assert_eq!(plan.destination(), to);
}

// --- placement tokens ---

#[test]
fn view_location_parses_variants() {
    assert_eq!("right".parse::<ViewLocation>().unwrap(), ViewLocation::Right);
    assert_eq!("bottom_left".parse::<ViewLocation>().unwrap(), ViewLocation::BottomLeft);
    assert_eq!("upperRight".parse::<ViewLocation>().unwrap(), ViewLocation::TopRight);
    assert_eq!("origin".parse::<ViewLocation>().unwrap(), ViewLocation::Center);
    assert!("sideways".parse::<ViewLocation>().is_err());
}

#[test]
fn relative_camera_moves_one_frame() {
    let design = Viewport::new(1920.0, 1080.0);
    let base = Camera::new(0.0, 0.0, 1.0);
    let right = relative_camera(&base, ViewLocation::Right, design);
    assert_eq!(right, Camera::new(1920.0, 0.0, 1.0));
    let diag = relative_camera(&Camera::new(0.0, 0.0, 2.0), ViewLocation::TopLeft, design);
    assert_eq!(diag, Camera::new(-960.0, -540.0, 2.0));
}

#[test]
fn zoom_token_plain_in_and_out() {
    let design = Viewport::new(1920.0, 1080.0);
    let base = Camera::new(10.0, 20.0, 1.0);
    assert_eq!(apply_zoom_token(&base, "in", design).unwrap(), Camera::new(10.0, 20.0, 10.0));
    assert_eq!(apply_zoom_token(&base, "out2", design).unwrap(), Camera::new(10.0, 20.0, 0.01));
}

#[test]
fn zoom_token_pins_corner() {
    let design = Viewport::new(1920.0, 1080.0);
    let base = Camera::new(0.0, 0.0, 1.0);
    let cam = apply_zoom_token(&base, "in1BottomRight", design).unwrap();
    assert!(approx_eq(cam.zoom, 10.0));
    // The bottom-right corner of both frames coincides.
    let base_corner = base.visible_rect(design);
    let cam_corner = cam.visible_rect(design);
    assert!(approx_eq(base_corner.right(), cam_corner.right()));
    assert!(approx_eq(base_corner.bottom(), cam_corner.bottom()));
}

#[test]
fn zoom_token_accepts_lower_alias() {
    let design = Viewport::new(1920.0, 1080.0);
    let cam = apply_zoom_token(&Camera::default(), "in2LowerLeft", design).unwrap();
    assert!(cam.cx < 0.0);
    assert!(cam.cy > 0.0);
}

#[test]
fn zoom_token_rejects_garbage() {
    let design = Viewport::default();
    assert!(apply_zoom_token(&Camera::default(), "sideways", design).is_err());
    assert!(apply_zoom_token(&Camera::default(), "inSomewhere", design).is_err());
}

#[test]
fn camera_serde_shape() {
    let cam: Camera = serde_json::from_str(r#"{"cx":1,"cy":2,"zoom":3}"#).unwrap();
    assert_eq!(cam, Camera::new(1.0, 2.0, 3.0));
}
