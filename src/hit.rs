//! Rotation-aware hit testing in screen space.
//!
//! Every visible node is projected to a [`NodeFrame`] in screen pixels, and
//! the pointer is tested against the regions each frame exposes. Regions fall
//! into priority classes: the selected node's anchor-retarget points, then
//! corners and segment endpoints, then edge bands and segment bodies, then
//! interiors. The best class wins; within a class the closest region wins and
//! ties go to the topmost node.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::cmp::Ordering;
use std::fmt;

use crate::camera::Projection;
use crate::consts::{ANCHOR_POINT_RADIUS_PX, CORNER_RADIUS_PX, EDGE_BAND_PX, SEGMENT_BAND_PX, SEGMENT_ENDPOINT_RADIUS_PX};
use crate::doc::{Node, NodeId, PresentationModel, SegmentEnd, Shape, Space};
use crate::geometry::{Anchor, Point, Transform, normalize_degrees};
use crate::transform::{Resolver, local_point_to_world};

/// Box handle positions, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Handle {
    pub const ALL: [Handle; 8] =
        [Handle::N, Handle::Ne, Handle::E, Handle::Se, Handle::S, Handle::Sw, Handle::W, Handle::Nw];

    /// Fractional position of the handle on the box.
    #[must_use]
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Self::N => (0.5, 0.0),
            Self::Ne => (1.0, 0.0),
            Self::E => (1.0, 0.5),
            Self::Se => (1.0, 1.0),
            Self::S => (0.5, 1.0),
            Self::Sw => (0.0, 1.0),
            Self::W => (0.0, 0.5),
            Self::Nw => (0.0, 0.0),
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Which axes a drag of this handle changes: `(x, y)`.
    #[must_use]
    pub fn axes(self) -> (bool, bool) {
        match self {
            Self::N | Self::S => (false, true),
            Self::E | Self::W => (true, false),
            _ => (true, true),
        }
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Move,
    Resize(Handle),
    Rotate(Handle),
    Anchor(Anchor),
    SegmentEndpoint(SegmentEnd),
    SegmentBody,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub node_id: NodeId,
    pub region: HitRegion,
}

/// CSS cursor names the engine asks the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Move,
    Grab,
    Grabbing,
    Crosshair,
    Pointer,
    NsResize,
    EwResize,
    NeswResize,
    NwseResize,
}

impl Cursor {
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Crosshair => "crosshair",
            Self::Pointer => "pointer",
            Self::NsResize => "ns-resize",
            Self::EwResize => "ew-resize",
            Self::NeswResize => "nesw-resize",
            Self::NwseResize => "nwse-resize",
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Resize cursor for `handle` on a box turned by `rotation_deg`.
#[must_use]
pub fn resize_cursor(handle: Handle, rotation_deg: f64) -> Cursor {
    let (fx, fy) = handle.fractions();
    let dir = Point::new(fx - 0.5, fy - 0.5).angle_deg() + rotation_deg;
    let folded = normalize_degrees(dir) % 180.0;
    // Each cursor covers a 45° sector centered on its axis.
    let sector = ((folded + 22.5) / 45.0).floor();
    match sector {
        s if s < 1.0 || s >= 4.0 => Cursor::EwResize,
        s if s < 2.0 => Cursor::NwseResize,
        s if s < 3.0 => Cursor::NsResize,
        _ => Cursor::NeswResize,
    }
}

/// Cursor for hovering or dragging `region` on a box turned by `rotation_deg`.
#[must_use]
pub fn cursor_for(region: Option<HitRegion>, rotation_deg: f64, dragging: bool) -> Cursor {
    match region {
        None => Cursor::Default,
        Some(HitRegion::Move | HitRegion::SegmentBody) => Cursor::Move,
        Some(HitRegion::Rotate(_)) => {
            if dragging {
                Cursor::Grabbing
            } else {
                Cursor::Grab
            }
        }
        Some(HitRegion::Resize(handle)) => resize_cursor(handle, rotation_deg),
        Some(HitRegion::Anchor(_)) => Cursor::Pointer,
        Some(HitRegion::SegmentEndpoint(_)) => Cursor::Crosshair,
    }
}

/// Pixel radii and band half-widths used to grab each kind of region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerances {
    pub corner_px: f64,
    pub edge_px: f64,
    pub anchor_px: f64,
    pub endpoint_px: f64,
    pub segment_px: f64,
}

impl Default for HitTolerances {
    fn default() -> Self {
        Self {
            corner_px: CORNER_RADIUS_PX,
            edge_px: EDGE_BAND_PX,
            anchor_px: ANCHOR_POINT_RADIUS_PX,
            endpoint_px: SEGMENT_ENDPOINT_RADIUS_PX,
            segment_px: SEGMENT_BAND_PX,
        }
    }
}

/// A visible node projected into screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFrame {
    pub id: NodeId,
    pub space: Space,
    /// Stacking position; higher is drawn later.
    pub z: usize,
    /// The node's box in screen pixels, rotation included.
    pub rect: Transform,
    /// Segment endpoints in screen pixels, for segment nodes.
    pub segment: Option<(Point, Point)>,
}

/// Segment endpoints of `node` in its owning space (parent fractions resolved).
#[must_use]
pub fn segment_in_owning_space(node: &Node, resolver: &mut Resolver<'_>) -> Option<(Point, Point)> {
    let Shape::Segment { a, b } = node.shape else {
        return None;
    };
    match resolver.parent_world(&node.id) {
        Some(parent) => Some((local_point_to_world(a, &parent), local_point_to_world(b, &parent))),
        None => Some((a, b)),
    }
}

/// Project every visible node of `model` into screen space, bottom to top.
#[must_use]
pub fn screen_frames(model: &PresentationModel, projection: &Projection) -> Vec<NodeFrame> {
    let mut resolver = Resolver::new(model);
    let mut frames = Vec::new();
    for (z, node) in model.stacking().into_iter().enumerate() {
        if !node.visible {
            continue;
        }
        let Some(owning) = resolver.world_transform(&node.id) else {
            continue;
        };
        let space = node.space();
        let segment = segment_in_owning_space(node, &mut resolver)
            .map(|(a, b)| (projection.to_screen(space, a), projection.to_screen(space, b)));
        frames.push(NodeFrame {
            id: node.id.clone(),
            space,
            z,
            rect: projection.transform_to_screen(space, &owning),
            segment,
        });
    }
    frames
}

struct Candidate<'f> {
    class: u8,
    dist: f64,
    z: usize,
    id: &'f NodeId,
    region: HitRegion,
}

fn better(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.class.cmp(&b.class).then(a.dist.total_cmp(&b.dist)).then(b.z.cmp(&a.z))
}

const CLASS_ANCHOR: u8 = 0;
const CLASS_CORNER: u8 = 1;
const CLASS_EDGE: u8 = 2;
const CLASS_INTERIOR: u8 = 3;

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn segment_candidates<'f>(
    frame: &'f NodeFrame,
    (a, b): (Point, Point),
    pt: Point,
    tol: &HitTolerances,
    out: &mut Vec<Candidate<'f>>,
) {
    let da = pt.distance(a);
    let db = pt.distance(b);
    let (end, dist) = if da <= db { (SegmentEnd::A, da) } else { (SegmentEnd::B, db) };
    if dist <= tol.endpoint_px {
        out.push(Candidate { class: CLASS_CORNER, dist, z: frame.z, id: &frame.id, region: HitRegion::SegmentEndpoint(end) });
        return;
    }
    let dist = distance_to_segment(pt, a, b);
    if dist <= tol.segment_px {
        out.push(Candidate { class: CLASS_EDGE, dist, z: frame.z, id: &frame.id, region: HitRegion::SegmentBody });
    }
}

fn box_candidates<'f>(frame: &'f NodeFrame, pt: Point, tol: &HitTolerances, out: &mut Vec<Candidate<'f>>) {
    let rect = &frame.rect;
    let push = |out: &mut Vec<Candidate<'f>>, class, dist, region| {
        out.push(Candidate { class, dist, z: frame.z, id: &frame.id, region });
    };

    for handle in [Handle::Nw, Handle::Ne, Handle::Se, Handle::Sw] {
        let (fx, fy) = handle.fractions();
        let dist = pt.distance(rect.point_at(fx, fy));
        if dist <= tol.corner_px {
            let region = if matches!(handle, Handle::Nw | Handle::Ne) {
                HitRegion::Rotate(handle)
            } else {
                HitRegion::Resize(handle)
            };
            push(out, CLASS_CORNER, dist, region);
        }
    }

    let u = rect.unrotate_point(pt);
    let r = rect.unrotated_rect();
    let within_x = u.x >= r.x && u.x <= r.right();
    let within_y = u.y >= r.y && u.y <= r.bottom();
    let edges = [
        (Handle::N, (u.y - r.y).abs(), within_x),
        (Handle::S, (u.y - r.bottom()).abs(), within_x),
        (Handle::W, (u.x - r.x).abs(), within_y),
        (Handle::E, (u.x - r.right()).abs(), within_y),
    ];
    for (handle, dist, along) in edges {
        if along && dist <= tol.edge_px {
            push(out, CLASS_EDGE, dist, HitRegion::Resize(handle));
        }
    }

    if r.contains(u) {
        push(out, CLASS_INTERIOR, 0.0, HitRegion::Move);
    }
}

fn anchor_candidates<'f>(frame: &'f NodeFrame, pt: Point, tol: &HitTolerances, out: &mut Vec<Candidate<'f>>) {
    for anchor in Anchor::ALL {
        let (fx, fy) = anchor.fractions();
        let dist = pt.distance(frame.rect.point_at(fx, fy));
        if dist <= tol.anchor_px {
            out.push(Candidate { class: CLASS_ANCHOR, dist, z: frame.z, id: &frame.id, region: HitRegion::Anchor(anchor) });
        }
    }
}

/// Resolve what lies under the screen-space point `pt`.
///
/// `selected` is the single node whose anchor-retarget points are live.
#[must_use]
pub fn hit_test(pt: Point, frames: &[NodeFrame], selected: Option<&NodeId>, tol: &HitTolerances) -> Option<Hit> {
    let mut candidates = Vec::new();
    for frame in frames {
        match frame.segment {
            Some(ends) => segment_candidates(frame, ends, pt, tol, &mut candidates),
            None => {
                if selected == Some(&frame.id) {
                    anchor_candidates(frame, pt, tol, &mut candidates);
                }
                box_candidates(frame, pt, tol, &mut candidates);
            }
        }
    }
    candidates
        .into_iter()
        .min_by(better)
        .map(|c| Hit { node_id: c.id.clone(), region: c.region })
}
