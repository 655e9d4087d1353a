//! Move, resize, rotate, and anchor-retarget math.
//!
//! All gestures are computed on the node's frame in screen pixels, where both
//! spaces share a uniform metric, and converted back to the node's stored
//! (possibly parent-relative) transform only when a patch is produced. Every
//! result is derived from the drag-start frame plus the total pointer delta,
//! never accumulated from the previous event.

#[cfg(test)]
#[path = "manipulate_test.rs"]
mod manipulate_test;

use crate::camera::Projection;
use crate::consts::ROTATE_PIVOT_MIN_PX;
use crate::doc::Space;
use crate::geometry::{Anchor, Point, Transform, sanitize_size, signed_angle_delta_deg, top_left_to_anchor};
use crate::hit::Handle;
use crate::snap::{snap_angle, snap_spacing, snap_value};
use crate::transform::{to_local_from_world, world_point_to_local};

/// Translate a frame by a screen delta.
#[must_use]
pub fn moved(start: &Transform, delta: Point) -> Transform {
    Transform { x: start.x + delta.x, y: start.y + delta.y, ..*start }
}

/// Outcome of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resized {
    pub frame: Transform,
    /// Uniform scale applied by a corner resize; `1.0` for edges.
    pub factor: f64,
}

/// Resize `start` by dragging `handle` through `delta`, keeping the opposite
/// edge or corner fixed on screen.
///
/// Edges change one axis. Corners scale both axes by a single factor taken
/// from whichever axis the pointer moved further along. Sizes never drop below
/// `min_w`/`min_h`.
#[must_use]
pub fn resized(start: &Transform, handle: Handle, delta: Point, min_w: f64, min_h: f64) -> Resized {
    let (hx, hy) = handle.fractions();
    let (ox, oy) = handle.opposite().fractions();
    let fixed = start.point_at(ox, oy);
    let grabbed = start.point_at(hx, hy) + delta;
    let along = (grabbed - fixed).rotated(-start.rotation_deg);
    let raw_w = along.x * (hx - ox);
    let raw_h = along.y * (hy - oy);
    let start_w = start.w.max(f64::MIN_POSITIVE);
    let start_h = start.h.max(f64::MIN_POSITIVE);

    let (w, h, factor) = if handle.is_corner() {
        let by_width = (raw_w - start_w).abs() >= (raw_h - start_h).abs();
        let f = if by_width { raw_w / start_w } else { raw_h / start_h };
        let floor = (min_w / start_w).max(min_h / start_h);
        let f = sanitize_size(f, floor);
        (start_w * f, start_h * f, f)
    } else {
        let (moves_x, moves_y) = handle.axes();
        let w = if moves_x { sanitize_size(raw_w, min_w) } else { start.w };
        let h = if moves_y { sanitize_size(raw_h, min_h) } else { start.h };
        (w, h, 1.0)
    };

    let (ax, ay) = start.anchor.fractions();
    let anchor = fixed + Point::new((ax - ox) * w, (ay - oy) * h).rotated(start.rotation_deg);
    Resized { frame: Transform { x: anchor.x, y: anchor.y, w, h, ..*start }, factor }
}

/// Font size after a resize by `factor`.
#[must_use]
pub fn scaled_font(font_px: Option<f64>, factor: f64) -> Option<f64> {
    font_px.map(|f| f * factor)
}

/// Tracks one rotate drag.
///
/// The pointer angle is measured about the anchor point captured at drag
/// start, which is also where the rotation is applied, so the grabbed handle
/// stays under the pointer. The angle is added to the starting rotation. The delta is unwrapped against the
/// previous event so a drag that circles past ±180° keeps turning instead of
/// jumping back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateGesture {
    pivot: Point,
    start_angle: f64,
    start_rotation: f64,
    delta: f64,
}

impl RotateGesture {
    #[must_use]
    pub fn new(start: &Transform, pointer: Point) -> Self {
        let anchor = start.anchor_point();
        let pivot = if pointer.distance(anchor) < ROTATE_PIVOT_MIN_PX { start.point_at(0.5, 0.5) } else { anchor };
        Self { pivot, start_angle: (pointer - pivot).angle_deg(), start_rotation: start.rotation_deg, delta: 0.0 }
    }

    /// Rotation for the pointer at `pointer`, snapped to `snap_deg` when given.
    pub fn update(&mut self, pointer: Point, snap_deg: Option<f64>) -> f64 {
        let v = pointer - self.pivot;
        if v.length() > f64::EPSILON {
            let raw = v.angle_deg() - self.start_angle;
            self.delta += signed_angle_delta_deg(raw, self.delta);
        }
        let rotation = self.start_rotation + self.delta;
        match snap_deg {
            Some(step) => snap_angle(rotation, step),
            None => rotation,
        }
    }
}

/// Switch `t` to `anchor`, keeping its unrotated top-left corner in place.
#[must_use]
pub fn retarget_anchor(t: &Transform, anchor: Anchor) -> Transform {
    let p = top_left_to_anchor(&t.unrotated_rect(), anchor);
    Transform { x: p.x, y: p.y, anchor, ..*t }
}

/// Where a dragged node lives, captured at drag start. Converts pixel-space
/// results back into the node's stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub projection: Projection,
    pub space: Space,
    /// World transform of the node's parent, for grouped nodes.
    pub parent_world: Option<Transform>,
}

impl DragFrame {
    /// Snapping spacing in owning-space units: the zoom-dependent world grid,
    /// or a fixed fraction of the viewport for screen nodes.
    #[must_use]
    pub fn grid_spacing(&self, world_base: f64, screen_grid: f64) -> f64 {
        match self.space {
            Space::World => snap_spacing(self.projection.camera.zoom, world_base),
            Space::Screen => screen_grid,
        }
    }

    /// Smallest on-screen width and height a resize may produce.
    #[must_use]
    pub fn min_size_px(&self, min_world: f64, min_screen: f64) -> (f64, f64) {
        let (sx, sy) = self.projection.scale(self.space);
        match self.space {
            Space::World => (min_world * sx, min_world * sy),
            Space::Screen => (min_screen * sx, min_screen * sy),
        }
    }

    /// Stored transform for a pixel-space frame, re-expressed against
    /// `anchor`. With `grid`, the owning-space anchor point is snapped first.
    #[must_use]
    pub fn local_from_screen(&self, frame: &Transform, anchor: Anchor, grid: Option<f64>) -> Transform {
        let mut owning = self.projection.transform_from_screen(self.space, frame);
        if let Some(spacing) = grid {
            owning.x = snap_value(owning.x, spacing);
            owning.y = snap_value(owning.y, spacing);
        }
        to_local_from_world(&owning, self.parent_world.as_ref(), anchor)
    }

    /// Stored coordinates for a pixel-space point (segment endpoints).
    #[must_use]
    pub fn local_point_from_screen(&self, p: Point, grid: Option<f64>) -> Point {
        let mut owning = self.projection.from_screen(self.space, p);
        if let Some(spacing) = grid {
            owning = Point::new(snap_value(owning.x, spacing), snap_value(owning.y, spacing));
        }
        match &self.parent_world {
            Some(parent) => world_point_to_local(owning, parent),
            None => owning,
        }
    }
}
