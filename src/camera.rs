//! View cameras, coordinate conversions, and camera transition planning.
//!
//! A camera is a world-space center plus a zoom factor. At a given viewport it
//! frames the rectangle `cx ± vw/2/zoom`, `cy ± vh/2/zoom`. Moving between two
//! authored views either tweens directly or, when the views are far apart,
//! zooms out to a midpoint framing first so the audience never loses its
//! bearings.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ZOOM;
use crate::doc::Space;
use crate::geometry::{Point, Rect, Transform};

/// Size of the on-screen viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height with degenerate values raised to one pixel.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        Self { width: clean(self.width), height: clean(self.height) }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1920.0, height: 1080.0 }
    }
}

/// Camera state: world-space center and zoom (1.0 = one world unit per pixel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub cx: f64,
    pub cy: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { cx: 0.0, cy: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(cx: f64, cy: f64, zoom: f64) -> Self {
        Self { cx, cy, zoom }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Zoom with degenerate values replaced by a tiny positive floor.
    #[must_use]
    pub fn safe_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > MIN_ZOOM { self.zoom } else { MIN_ZOOM }
    }

    /// World rectangle this camera frames at `viewport`.
    #[must_use]
    pub fn visible_rect(&self, viewport: Viewport) -> Rect {
        let vp = viewport.sanitized();
        let zoom = self.safe_zoom();
        Rect::from_center(self.center(), vp.width / zoom, vp.height / zoom)
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point, viewport: Viewport) -> Point {
        let zoom = self.safe_zoom();
        Point {
            x: self.cx + (screen.x - viewport.width / 2.0) / zoom,
            y: self.cy + (screen.y - viewport.height / 2.0) / zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point, viewport: Viewport) -> Point {
        let zoom = self.safe_zoom();
        Point {
            x: (world.x - self.cx) * zoom + viewport.width / 2.0,
            y: (world.y - self.cy) * zoom + viewport.height / 2.0,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.safe_zoom()
    }
}

/// Maps owning-space coordinates (world units or viewport fractions) to
/// screen pixels for one camera and viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub camera: Camera,
    pub viewport: Viewport,
}

impl Projection {
    #[must_use]
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self { camera, viewport: viewport.sanitized() }
    }

    /// Pixels per owning-space unit along each axis.
    #[must_use]
    pub fn scale(&self, space: Space) -> (f64, f64) {
        match space {
            Space::World => {
                let z = self.camera.safe_zoom();
                (z, z)
            }
            Space::Screen => (self.viewport.width, self.viewport.height),
        }
    }

    #[must_use]
    pub fn to_screen(&self, space: Space, p: Point) -> Point {
        match space {
            Space::World => self.camera.world_to_screen(p, self.viewport),
            Space::Screen => Point::new(p.x * self.viewport.width, p.y * self.viewport.height),
        }
    }

    #[must_use]
    pub fn from_screen(&self, space: Space, p: Point) -> Point {
        match space {
            Space::World => self.camera.screen_to_world(p, self.viewport),
            Space::Screen => Point::new(p.x / self.viewport.width, p.y / self.viewport.height),
        }
    }

    /// Screen-space delta expressed in owning-space units.
    #[must_use]
    pub fn delta_from_screen(&self, space: Space, delta: Point) -> Point {
        let (sx, sy) = self.scale(space);
        Point::new(delta.x / sx, delta.y / sy)
    }

    /// An owning-space transform expressed in screen pixels.
    #[must_use]
    pub fn transform_to_screen(&self, space: Space, t: &Transform) -> Transform {
        let (sx, sy) = self.scale(space);
        let p = self.to_screen(space, t.anchor_point());
        Transform { x: p.x, y: p.y, w: t.w * sx, h: t.h * sy, ..*t }
    }

    /// Inverse of [`Projection::transform_to_screen`].
    #[must_use]
    pub fn transform_from_screen(&self, space: Space, t: &Transform) -> Transform {
        let (sx, sy) = self.scale(space);
        let p = self.from_screen(space, t.anchor_point());
        Transform { x: p.x, y: p.y, w: t.w / sx, h: t.h / sy, ..*t }
    }
}

/// Largest zoom at which `rect` fits inside `viewport`.
#[must_use]
pub fn zoom_to_fit(rect: &Rect, viewport: Viewport) -> f64 {
    let vp = viewport.sanitized();
    let w = rect.w.max(f64::MIN_POSITIVE);
    let h = rect.h.max(f64::MIN_POSITIVE);
    (vp.width / w).min(vp.height / h)
}

/// Tunables for the zoom-out decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTuning {
    /// A two-stage tween happens only when the zoom needed to frame both views
    /// drops below `min(from.zoom, to.zoom) * zoom_out_ratio`.
    pub zoom_out_ratio: f64,
    pub epsilon: f64,
}

impl Default for TransitionTuning {
    fn default() -> Self {
        Self { zoom_out_ratio: 2.0 / 3.0, epsilon: 1e-6 }
    }
}

/// How to get from one camera to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPlan {
    /// One tween straight to the destination.
    Direct { to: Camera, duration_ms: f64 },
    /// Zoom out to `mid`, then in to `to`.
    TwoStage { mid: Camera, to: Camera, first_ms: f64, second_ms: f64 },
}

impl TransitionPlan {
    #[must_use]
    pub fn destination(&self) -> Camera {
        match self {
            Self::Direct { to, .. } | Self::TwoStage { to, .. } => *to,
        }
    }

    #[must_use]
    pub fn is_two_stage(&self) -> bool {
        matches!(self, Self::TwoStage { .. })
    }

    /// Camera targets in order, each with its tween duration.
    #[must_use]
    pub fn stages(&self) -> Vec<(Camera, f64)> {
        match *self {
            Self::Direct { to, duration_ms } => vec![(to, duration_ms)],
            Self::TwoStage { mid, to, first_ms, second_ms } => vec![(mid, first_ms), (to, second_ms)],
        }
    }
}

/// Decide between a direct tween and a zoom-out/zoom-in pair.
///
/// The union of both framings is measured; if it can be seen at a zoom that
/// is not meaningfully below both endpoint zooms, a direct tween keeps both in
/// view anyway. Otherwise the camera first backs out to a midpoint framing at
/// the fit zoom over half the duration.
#[must_use]
pub fn plan_transition(
    from: &Camera,
    to: &Camera,
    viewport: Viewport,
    duration_ms: f64,
    tuning: TransitionTuning,
) -> TransitionPlan {
    let duration_ms = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
    let union = from.visible_rect(viewport).union(&to.visible_rect(viewport));
    let fit = zoom_to_fit(&union, viewport);
    let threshold = from.safe_zoom().min(to.safe_zoom()) * tuning.zoom_out_ratio - tuning.epsilon;

    if fit < threshold {
        let mid = Camera { cx: (from.cx + to.cx) / 2.0, cy: (from.cy + to.cy) / 2.0, zoom: fit };
        let first_ms = duration_ms / 2.0;
        TransitionPlan::TwoStage { mid, to: *to, first_ms, second_ms: duration_ms - first_ms }
    } else {
        TransitionPlan::Direct { to: *to, duration_ms }
    }
}

/// Error returned when parsing view placement tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("unknown view location: {0}")]
    UnknownLocation(String),
    #[error("invalid zoom token: {0}")]
    InvalidZoomToken(String),
}

/// Where a view sits relative to a reference view, one full frame away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLocation {
    Center,
    Left,
    Right,
    Up,
    Down,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ViewLocation {
    /// Horizontal and vertical direction signs.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::Center => (0.0, 0.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    fn from_signs(sx: i8, sy: i8) -> Self {
        match (sx, sy) {
            (-1, 0) => Self::Left,
            (1, 0) => Self::Right,
            (0, -1) => Self::Up,
            (0, 1) => Self::Down,
            (-1, -1) => Self::TopLeft,
            (1, -1) => Self::TopRight,
            (-1, 1) => Self::BottomLeft,
            (1, 1) => Self::BottomRight,
            _ => Self::Center,
        }
    }
}

/// Direction signs read from a free-form location word such as `bottom_right`,
/// `upperLeft`, or `down`. Returns `None` when no direction word is present.
fn direction_signs(raw: &str) -> Option<(i8, i8)> {
    let norm = raw.replace(['_', '-', ' '], "").to_ascii_lowercase();
    let mut sx = 0;
    let mut sy = 0;
    if norm.contains("right") {
        sx += 1;
    }
    if norm.contains("left") {
        sx -= 1;
    }
    if norm.contains("bottom") || norm.contains("down") || norm.contains("lower") {
        sy += 1;
    }
    if norm.contains("top") || norm.contains("up") {
        sy -= 1;
    }
    if sx == 0 && sy == 0 { None } else { Some((sx, sy)) }
}

impl FromStr for ViewLocation {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().replace(['_', '-'], "").to_ascii_lowercase();
        if norm == "center" || norm == "origin" {
            return Ok(Self::Center);
        }
        direction_signs(&norm)
            .map(|(sx, sy)| Self::from_signs(sx, sy))
            .ok_or_else(|| PlacementError::UnknownLocation(s.to_string()))
    }
}

/// Half of the design frame's extents at `camera`'s zoom.
fn half_extents(camera: &Camera, design: Viewport) -> (f64, f64) {
    let zoom = camera.safe_zoom();
    (design.width / 2.0 / zoom, design.height / 2.0 / zoom)
}

/// Camera one design frame away from `base` in direction `location`, keeping
/// `base`'s zoom.
#[must_use]
pub fn relative_camera(base: &Camera, location: ViewLocation, design: Viewport) -> Camera {
    let (hw, hh) = half_extents(base, design);
    let (sx, sy) = location.signs();
    Camera { cx: base.cx + sx * 2.0 * hw, cy: base.cy + sy * 2.0 * hh, zoom: base.zoom }
}

/// Apply a zoom token such as `in`, `out2`, or `in2BottomRight` to `base`.
///
/// `in`/`out` multiply or divide zoom by `10^n` (default `n = 1`). An
/// optional corner keeps that corner of `base`'s frame pinned in place.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidZoomToken`] when the token is malformed.
pub fn apply_zoom_token(base: &Camera, token: &str, design: Viewport) -> Result<Camera, PlacementError> {
    let invalid = || PlacementError::InvalidZoomToken(token.to_string());
    let tok = token.trim();
    let lower = tok.to_ascii_lowercase();
    let (inward, rest) = if lower.starts_with("in") {
        (true, &tok[2..])
    } else if lower.starts_with("out") {
        (false, &tok[3..])
    } else {
        return Err(invalid());
    };
    let digits_len = rest.chars().take_while(char::is_ascii_digit).count();
    let (digits, corner) = rest.split_at(digits_len);
    let power: i32 = if digits.is_empty() { 1 } else { digits.parse().map_err(|_| invalid())? };
    let factor = 10f64.powi(power);
    let zoom = if inward { base.zoom * factor } else { base.zoom / factor };
    let mut camera = Camera { cx: base.cx, cy: base.cy, zoom };

    if corner.is_empty() {
        return Ok(camera);
    }
    let (sx, sy) = direction_signs(corner).ok_or_else(invalid)?;
    let (hw0, hh0) = half_extents(base, design);
    let (hw1, hh1) = half_extents(&camera, design);
    camera.cx += f64::from(sx) * (hw0 - hw1);
    camera.cy += f64::from(sy) * (hh0 - hh1);
    Ok(camera)
}
