//! Pure geometry: points, rectangles, nine-point anchors, and the anchored
//! transform record.
//!
//! Everything here is stateless. Rotation follows screen conventions: y grows
//! downward and positive angles turn clockwise, so rotating `(1, 0)` by 90°
//! yields `(0, 1)`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point (or vector) in world, screen, or local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Rotate this vector about the origin by `deg` degrees (clockwise-positive).
    #[must_use]
    pub fn rotated(self, deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self { x: self.x * cos - self.y * sin, y: self.x * sin + self.y * cos }
    }

    /// Rotate this point about `pivot` by `deg` degrees.
    #[must_use]
    pub fn rotated_about(self, pivot: Point, deg: f64) -> Self {
        pivot + (self - pivot).rotated(deg)
    }

    /// Angle of this vector in degrees, measured clockwise from +x.
    #[must_use]
    pub fn angle_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn from_center(center: Point, w: f64, h: f64) -> Self {
        Self { x: center.x - w / 2.0, y: center.y - h / 2.0, w, h }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.point_at(0.5, 0.5)
    }

    /// Point at fractional position `(fx, fy)` inside the rectangle.
    #[must_use]
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + fx * self.w, self.y + fy * self.h)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect { x, y, w: right - x, h: bottom - y }
    }

    /// Area shared with `other`; zero when they do not overlap.
    #[must_use]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }
}

/// One of nine named reference points of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[serde(alias = "centerCenter")]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Fractional position `(fx, fy)` of this anchor within a rectangle.
    #[must_use]
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::CenterLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Anchored transform of a node in its owning coordinate space.
///
/// `(x, y)` is where the anchor point sits. `w`/`h` describe the unrotated
/// box, and `rotation_deg` turns that box about the anchor point. Degrees are
/// stored unwrapped so that interactive rotation stays continuous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default)]
    pub rotation_deg: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, w: 100.0, h: 50.0, anchor: Anchor::TopLeft, rotation_deg: 0.0 }
    }
}

impl Transform {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64, anchor: Anchor) -> Self {
        Self { x, y, w, h, anchor, rotation_deg: 0.0 }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    /// The anchor point, i.e. the rotation pivot.
    #[must_use]
    pub fn anchor_point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Top-left corner of the box before rotation is applied.
    #[must_use]
    pub fn top_left(&self) -> Point {
        anchor_to_top_left(self)
    }

    /// The box before rotation is applied.
    #[must_use]
    pub fn unrotated_rect(&self) -> Rect {
        let tl = self.top_left();
        Rect::new(tl.x, tl.y, self.w, self.h)
    }

    /// Position of the fractional box point `(fx, fy)` after rotation.
    #[must_use]
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        let (ax, ay) = self.anchor.fractions();
        let offset = Point::new((fx - ax) * self.w, (fy - ay) * self.h);
        self.anchor_point() + offset.rotated(self.rotation_deg)
    }

    /// The same visual placement expressed against a different anchor.
    #[must_use]
    pub fn reanchored(&self, anchor: Anchor) -> Transform {
        let (fx, fy) = anchor.fractions();
        let p = self.point_at(fx, fy);
        Transform { x: p.x, y: p.y, anchor, ..*self }
    }

    /// Convert a point from this box's rotated frame into the box's unrotated frame.
    #[must_use]
    pub fn unrotate_point(&self, p: Point) -> Point {
        p.rotated_about(self.anchor_point(), -self.rotation_deg)
    }

    /// Clamp degenerate values: non-finite coordinates become zero and sizes
    /// below `min_size` are raised to it.
    #[must_use]
    pub fn sanitized(&self, min_size: f64) -> Transform {
        Transform {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
            w: sanitize_size(self.w, min_size),
            h: sanitize_size(self.h, min_size),
            anchor: self.anchor,
            rotation_deg: finite_or_zero(self.rotation_deg),
        }
    }
}

/// Top-left corner of the unrotated box for an anchored transform.
#[must_use]
pub fn anchor_to_top_left(t: &Transform) -> Point {
    let (fx, fy) = t.anchor.fractions();
    Point::new(t.x - fx * t.w, t.y - fy * t.h)
}

/// Anchor position for a top-left rectangle. Exact inverse of [`anchor_to_top_left`].
#[must_use]
pub fn top_left_to_anchor(rect: &Rect, anchor: Anchor) -> Point {
    let (fx, fy) = anchor.fractions();
    rect.point_at(fx, fy)
}

/// Compose two rotations. Degrees are summed without wrapping.
#[must_use]
pub fn compose_rotation(outer_deg: f64, inner_deg: f64) -> f64 {
    outer_deg + inner_deg
}

/// Map degrees into `[0, 360)`. For display only.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest difference `current - start` in `(-180, 180]`.
#[must_use]
pub fn signed_angle_delta_deg(current: f64, start: f64) -> f64 {
    let delta = current - start;
    if !delta.is_finite() {
        return 0.0;
    }
    let mut wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Clamp a size to `floor`, also replacing NaN and infinities.
#[must_use]
pub fn sanitize_size(value: f64, floor: f64) -> f64 {
    if value.is_finite() && value >= floor { value } else { floor }
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`.
#[must_use]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
