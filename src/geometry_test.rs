#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_ops() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(a + b, Point::new(4.0, 7.0));
    assert_eq!(b - a, Point::new(2.0, 3.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    assert_eq!(Point::new(3.0, 4.0).length(), 5.0);
}

#[test]
fn rotation_is_clockwise_in_screen_space() {
    let p = Point::new(1.0, 0.0).rotated(90.0);
    assert!(point_approx_eq(p, Point::new(0.0, 1.0)));
}

#[test]
fn rotation_matches_matrix_form() {
    let p = Point::new(3.0, -2.0);
    let r: f64 = 33.0;
    let (s, c) = r.to_radians().sin_cos();
    let expected = Point::new(3.0 * c - (-2.0) * s, 3.0 * s + (-2.0) * c);
    assert!(point_approx_eq(p.rotated(r), expected));
}

#[test]
fn rotated_about_keeps_pivot_fixed() {
    let pivot = Point::new(10.0, 10.0);
    assert!(point_approx_eq(pivot.rotated_about(pivot, 123.0), pivot));
    let p = Point::new(20.0, 10.0).rotated_about(pivot, 180.0);
    assert!(point_approx_eq(p, Point::new(0.0, 10.0)));
}

#[test]
fn angle_deg_measures_clockwise_from_x() {
    assert!(approx_eq(Point::new(0.0, 1.0).angle_deg(), 90.0));
    assert!(approx_eq(Point::new(-1.0, 0.0).angle_deg(), 180.0));
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_union_covers_both() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, -5.0, 5.0, 5.0);
    let u = a.union(&b);
    assert_eq!(u, Rect::new(0.0, -5.0, 25.0, 15.0));
}

#[test]
fn rect_intersection_area() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(a.intersection_area(&Rect::new(5.0, 5.0, 10.0, 10.0)), 25.0);
    assert_eq!(a.intersection_area(&Rect::new(10.0, 0.0, 10.0, 10.0)), 0.0);
}

#[test]
fn rect_contains_edges() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(0.0, 10.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
}

#[test]
fn rect_from_center() {
    let r = Rect::from_center(Point::new(50.0, 50.0), 20.0, 10.0);
    assert_eq!(r, Rect::new(40.0, 45.0, 20.0, 10.0));
    assert_eq!(r.center(), Point::new(50.0, 50.0));
}

// =============================================================
// Anchor
// =============================================================

#[test]
fn anchor_round_trip_identity_for_all_anchors() {
    let sizes = [(100.0, 50.0), (0.1, 0.1), (3.0, 1234.5)];
    for anchor in Anchor::ALL {
        for (w, h) in sizes {
            let t = Transform::new(17.5, -42.25, w, h, anchor);
            let tl = anchor_to_top_left(&t);
            let rect = Rect::new(tl.x, tl.y, w, h);
            let back = top_left_to_anchor(&rect, anchor);
            assert!(point_approx_eq(back, t.anchor_point()), "{anchor:?} {w}x{h}");
        }
    }
}

#[test]
fn anchor_fractions_cover_grid() {
    assert_eq!(Anchor::TopLeft.fractions(), (0.0, 0.0));
    assert_eq!(Anchor::Center.fractions(), (0.5, 0.5));
    assert_eq!(Anchor::BottomRight.fractions(), (1.0, 1.0));
    assert_eq!(Anchor::CenterLeft.fractions(), (0.0, 0.5));
}

#[test]
fn anchor_serde_names() {
    assert_eq!(serde_json::to_string(&Anchor::TopCenter).unwrap(), "\"topCenter\"");
    assert_eq!(serde_json::to_string(&Anchor::Center).unwrap(), "\"center\"");
    let alias: Anchor = serde_json::from_str("\"centerCenter\"").unwrap();
    assert_eq!(alias, Anchor::Center);
    let right: Anchor = serde_json::from_str("\"centerRight\"").unwrap();
    assert_eq!(right, Anchor::CenterRight);
}

// =============================================================
// Transform
// =============================================================

#[test]
fn top_left_for_center_anchor() {
    let t = Transform::new(100.0, 100.0, 40.0, 20.0, Anchor::Center);
    assert_eq!(t.top_left(), Point::new(80.0, 90.0));
}

#[test]
fn point_at_anchor_is_anchor_point() {
    let t = Transform::new(5.0, 6.0, 40.0, 20.0, Anchor::BottomCenter).with_rotation(77.0);
    let (fx, fy) = t.anchor.fractions();
    assert!(point_approx_eq(t.point_at(fx, fy), t.anchor_point()));
}

#[test]
fn point_at_rotates_about_anchor() {
    let t = Transform::new(0.0, 0.0, 100.0, 50.0, Anchor::TopLeft).with_rotation(90.0);
    // The top-right corner swings to below the pivot.
    assert!(point_approx_eq(t.point_at(1.0, 0.0), Point::new(0.0, 100.0)));
}

#[test]
fn reanchored_preserves_every_corner() {
    let t = Transform::new(10.0, 20.0, 80.0, 30.0, Anchor::TopLeft).with_rotation(30.0);
    for anchor in Anchor::ALL {
        let r = t.reanchored(anchor);
        assert_eq!(r.anchor, anchor);
        for (fx, fy) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            assert!(point_approx_eq(r.point_at(fx, fy), t.point_at(fx, fy)));
        }
    }
}

#[test]
fn sanitized_clamps_degenerate_values() {
    let t = Transform {
        x: f64::NAN,
        y: 3.0,
        w: -5.0,
        h: f64::INFINITY,
        anchor: Anchor::Center,
        rotation_deg: f64::NAN,
    };
    let s = t.sanitized(1.0);
    assert_eq!(s.x, 0.0);
    assert_eq!(s.y, 3.0);
    assert_eq!(s.w, 1.0);
    assert_eq!(s.h, 1.0);
    assert_eq!(s.rotation_deg, 0.0);
}

#[test]
fn transform_serde_uses_camel_case() {
    let t: Transform = serde_json::from_str(r#"{"x":1,"y":2,"w":3,"h":4,"rotationDeg":15}"#).unwrap();
    assert_eq!(t.anchor, Anchor::TopLeft);
    assert_eq!(t.rotation_deg, 15.0);
}

// =============================================================
// Rotation helpers
// =============================================================

#[test]
fn rotation_composition_is_associative() {
    let deltas = [0.0, 15.0, -90.0, 359.0, 725.5, -1080.25];
    for d1 in deltas {
        for d2 in deltas {
            let stepwise = compose_rotation(compose_rotation(10.0, d1), d2);
            let direct = compose_rotation(10.0, d1 + d2);
            assert!(approx_eq(stepwise, direct));
            let p = Point::new(4.0, 1.0);
            assert!((p.rotated(d1).rotated(d2) - p.rotated(d1 + d2)).length() < 1e-9);
        }
    }
}

#[test]
fn normalize_degrees_wraps_for_display() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(370.0), 10.0);
    assert_eq!(normalize_degrees(-10.0), 350.0);
    assert_eq!(normalize_degrees(f64::NAN), 0.0);
}

#[test]
fn signed_delta_picks_shortest_direction() {
    assert_eq!(signed_angle_delta_deg(10.0, 350.0), 20.0);
    assert_eq!(signed_angle_delta_deg(350.0, 10.0), -20.0);
    assert_eq!(signed_angle_delta_deg(f64::NAN, 0.0), 0.0);
}

#[test]
fn sanitize_size_floors() {
    assert_eq!(sanitize_size(0.0, 1.0), 1.0);
    assert_eq!(sanitize_size(5.0, 1.0), 5.0);
    assert_eq!(sanitize_size(f64::NAN, 0.5), 0.5);
}

#[test]
fn smoothstep_endpoints_and_midpoint() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!(approx_eq(smoothstep(0.0, 1.0, 0.5), 0.5));
}
