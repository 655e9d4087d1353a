use super::*;
use crate::camera::{Camera, Viewport};
use crate::doc::Placement;

fn frame(id: &str, z: usize, rect: Transform) -> NodeFrame {
    NodeFrame { id: NodeId::new(id), space: Space::World, z, rect, segment: None }
}

fn boxed(id: &str, z: usize) -> NodeFrame {
    frame(id, z, Transform::new(100.0, 100.0, 200.0, 100.0, Anchor::TopLeft))
}

fn region_at(pt: Point, frames: &[NodeFrame], selected: Option<&str>) -> Option<HitRegion> {
    let selected = selected.map(NodeId::new);
    hit_test(pt, frames, selected.as_ref(), &HitTolerances::default()).map(|h| h.region)
}

// =============================================================
// Handle
// =============================================================

#[test]
fn handle_opposites_pair_up() {
    for h in Handle::ALL {
        assert_eq!(h.opposite().opposite(), h);
        let (fx, fy) = h.fractions();
        let (ox, oy) = h.opposite().fractions();
        assert!(((fx + ox) - 1.0).abs() < 1e-12 && ((fy + oy) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn handle_axes() {
    assert_eq!(Handle::N.axes(), (false, true));
    assert_eq!(Handle::E.axes(), (true, false));
    assert_eq!(Handle::Se.axes(), (true, true));
    assert!(Handle::Sw.is_corner());
    assert!(!Handle::W.is_corner());
}

// =============================================================
// Regions on a single box
// =============================================================

#[test]
fn interior_is_move() {
    let frames = [boxed("a", 0)];
    assert_eq!(region_at(Point::new(200.0, 150.0), &frames, None), Some(HitRegion::Move));
}

#[test]
fn outside_is_none() {
    let frames = [boxed("a", 0)];
    assert_eq!(region_at(Point::new(500.0, 500.0), &frames, None), None);
}

#[test]
fn top_corners_rotate_bottom_corners_resize() {
    let frames = [boxed("a", 0)];
    assert_eq!(region_at(Point::new(102.0, 102.0), &frames, None), Some(HitRegion::Rotate(Handle::Nw)));
    assert_eq!(region_at(Point::new(298.0, 98.0), &frames, None), Some(HitRegion::Rotate(Handle::Ne)));
    assert_eq!(region_at(Point::new(300.0, 200.0), &frames, None), Some(HitRegion::Resize(Handle::Se)));
    assert_eq!(region_at(Point::new(95.0, 205.0), &frames, None), Some(HitRegion::Resize(Handle::Sw)));
}

#[test]
fn edge_bands_resize_one_axis() {
    let frames = [boxed("a", 0)];
    assert_eq!(region_at(Point::new(200.0, 95.0), &frames, None), Some(HitRegion::Resize(Handle::N)));
    assert_eq!(region_at(Point::new(200.0, 210.0), &frames, None), Some(HitRegion::Resize(Handle::S)));
    assert_eq!(region_at(Point::new(90.0, 150.0), &frames, None), Some(HitRegion::Resize(Handle::W)));
    assert_eq!(region_at(Point::new(315.0, 150.0), &frames, None), Some(HitRegion::Resize(Handle::E)));
}

#[test]
fn regions_rotate_with_the_box() {
    // Center-anchored square turned 90°: the unrotated top edge now faces +x.
    let frames = [frame("a", 0, Transform::new(0.0, 0.0, 100.0, 100.0, Anchor::Center).with_rotation(90.0))];
    assert_eq!(region_at(Point::new(52.0, 0.0), &frames, None), Some(HitRegion::Resize(Handle::N)));
    // Unrotated top-left corner (-50,-50) maps to (50,-50).
    assert_eq!(region_at(Point::new(50.0, -50.0), &frames, None), Some(HitRegion::Rotate(Handle::Nw)));
}

#[test]
fn anchor_points_only_on_selected_node() {
    let frames = [boxed("a", 0)];
    let center = Point::new(200.0, 150.0);
    assert_eq!(region_at(center, &frames, None), Some(HitRegion::Move));
    assert_eq!(region_at(center, &frames, Some("a")), Some(HitRegion::Anchor(Anchor::Center)));
    assert_eq!(region_at(center, &frames, Some("b")), Some(HitRegion::Move));
}

#[test]
fn anchor_point_beats_corner() {
    let frames = [boxed("a", 0)];
    assert_eq!(region_at(Point::new(101.0, 101.0), &frames, Some("a")), Some(HitRegion::Anchor(Anchor::TopLeft)));
    assert_eq!(region_at(Point::new(112.0, 112.0), &frames, Some("a")), Some(HitRegion::Rotate(Handle::Nw)));
}

// =============================================================
// Priority across nodes
// =============================================================

#[test]
fn corner_of_lower_node_beats_interior_of_upper() {
    let lower = boxed("lower", 0);
    let upper = frame("upper", 1, Transform::new(250.0, 150.0, 200.0, 200.0, Anchor::TopLeft));
    let hit = hit_test(Point::new(298.0, 198.0), &[lower, upper], None, &HitTolerances::default()).unwrap();
    assert_eq!(hit.node_id.as_str(), "lower");
    assert_eq!(hit.region, HitRegion::Resize(Handle::Se));
}

#[test]
fn closest_corner_wins_within_class() {
    let a = frame("a", 1, Transform::new(0.0, 0.0, 100.0, 100.0, Anchor::TopLeft));
    let b = frame("b", 0, Transform::new(110.0, 110.0, 100.0, 100.0, Anchor::TopLeft));
    // (108,108) is 11.3px from a's se and 2.8px from b's nw.
    let hit = hit_test(Point::new(108.0, 108.0), &[a, b], None, &HitTolerances::default()).unwrap();
    assert_eq!(hit.node_id.as_str(), "b");
}

#[test]
fn topmost_wins_interior_ties() {
    let frames = [boxed("below", 0), boxed("above", 1)];
    let hit = hit_test(Point::new(200.0, 150.0), &frames, None, &HitTolerances::default()).unwrap();
    assert_eq!(hit.node_id.as_str(), "above");
}

// =============================================================
// Segments
// =============================================================

fn segment_frame() -> NodeFrame {
    NodeFrame {
        id: NodeId::new("line"),
        space: Space::World,
        z: 0,
        rect: Transform::default(),
        segment: Some((Point::new(0.0, 0.0), Point::new(100.0, 0.0))),
    }
}

#[test]
fn segment_endpoints_and_body() {
    let frames = [segment_frame()];
    assert_eq!(region_at(Point::new(3.0, 2.0), &frames, None), Some(HitRegion::SegmentEndpoint(SegmentEnd::A)));
    assert_eq!(region_at(Point::new(97.0, -2.0), &frames, None), Some(HitRegion::SegmentEndpoint(SegmentEnd::B)));
    assert_eq!(region_at(Point::new(50.0, 5.0), &frames, None), Some(HitRegion::SegmentBody));
    assert_eq!(region_at(Point::new(50.0, 30.0), &frames, None), None);
}

#[test]
fn tolerances_are_configurable() {
    let frames = [boxed("a", 0)];
    let tight = HitTolerances { corner_px: 2.0, edge_px: 2.0, ..HitTolerances::default() };
    let hit = hit_test(Point::new(95.0, 205.0), &frames, None, &tight);
    assert!(hit.is_none());
}

#[test]
fn distance_to_degenerate_segment() {
    let p = Point::new(3.0, 4.0);
    assert!((distance_to_segment(p, Point::default(), Point::default()) - 5.0).abs() < 1e-12);
}

// =============================================================
// Cursors
// =============================================================

#[test]
fn unrotated_resize_cursors() {
    assert_eq!(resize_cursor(Handle::N, 0.0), Cursor::NsResize);
    assert_eq!(resize_cursor(Handle::S, 0.0), Cursor::NsResize);
    assert_eq!(resize_cursor(Handle::E, 0.0), Cursor::EwResize);
    assert_eq!(resize_cursor(Handle::Se, 0.0), Cursor::NwseResize);
    assert_eq!(resize_cursor(Handle::Sw, 0.0), Cursor::NeswResize);
}

#[test]
fn resize_cursor_follows_rotation() {
    assert_eq!(resize_cursor(Handle::E, 90.0), Cursor::NsResize);
    assert_eq!(resize_cursor(Handle::E, 45.0), Cursor::NwseResize);
    assert_eq!(resize_cursor(Handle::N, -90.0), Cursor::EwResize);
    assert_eq!(resize_cursor(Handle::Se, 450.0), Cursor::NeswResize);
}

#[test]
fn region_cursors() {
    assert_eq!(cursor_for(None, 0.0, false), Cursor::Default);
    assert_eq!(cursor_for(Some(HitRegion::Move), 30.0, false), Cursor::Move);
    assert_eq!(cursor_for(Some(HitRegion::Rotate(Handle::Ne)), 0.0, false), Cursor::Grab);
    assert_eq!(cursor_for(Some(HitRegion::Rotate(Handle::Ne)), 0.0, true), Cursor::Grabbing);
    assert_eq!(Cursor::NwseResize.to_string(), "nwse-resize");
}

// =============================================================
// screen_frames
// =============================================================

#[test]
fn screen_frames_skip_hidden_and_project_spaces() {
    let mut hidden = Node::new("hidden", Placement::world(Transform::default()));
    hidden.visible = false;
    let model = PresentationModel {
        nodes: vec![
            Node::new("hud", Placement::screen(Transform::new(0.5, 0.5, 0.1, 0.1, Anchor::Center))),
            Node::new("w", Placement::world(Transform::new(10.0, 0.0, 20.0, 10.0, Anchor::TopLeft))),
            hidden,
        ],
        ..Default::default()
    };
    let proj = Projection::new(Camera::new(0.0, 0.0, 2.0), Viewport::new(1000.0, 500.0));
    let frames = screen_frames(&model, &proj);
    let ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["w", "hud"]);
    assert_eq!((frames[0].rect.x, frames[0].rect.y, frames[0].rect.w), (520.0, 250.0, 40.0));
    assert_eq!((frames[1].rect.x, frames[1].rect.w, frames[1].rect.h), (500.0, 100.0, 50.0));
    assert!(frames[1].z > frames[0].z);
}

#[test]
fn screen_frames_resolve_parented_segment() {
    let mut line = Node::new("line", Placement::child_of(NodeId::new("g"), Transform::default()));
    line.shape = Shape::Segment { a: Point::new(0.0, 0.0), b: Point::new(1.0, 0.0) };
    let model = PresentationModel {
        nodes: vec![Node::new("g", Placement::world(Transform::new(0.0, 0.0, 100.0, 50.0, Anchor::TopLeft))), line],
        ..Default::default()
    };
    let proj = Projection::new(Camera::new(500.0, 250.0, 1.0), Viewport::new(1000.0, 500.0));
    let frames = screen_frames(&model, &proj);
    let (a, b) = frames[1].segment.unwrap();
    assert_eq!(a, Point::new(0.0, 0.0));
    assert_eq!(b, Point::new(100.0, 0.0));
}
