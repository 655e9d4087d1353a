//! Shared numeric constants for the engine.
//!
//! Values that a deck may want to tune live in [`crate::config::EngineConfig`];
//! the ones here are fixed properties of the interaction model.

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels around each corner that counts as a corner hit.
pub const CORNER_RADIUS_PX: f64 = 20.0;

/// Half-width in pixels of the band straddling each edge that counts as an edge hit.
pub const EDGE_BAND_PX: f64 = 20.0;

/// Radius in pixels of each of the nine anchor-retarget points.
pub const ANCHOR_POINT_RADIUS_PX: f64 = 6.0;

/// Radius in pixels around a segment endpoint that grabs the endpoint.
pub const SEGMENT_ENDPOINT_RADIUS_PX: f64 = 10.0;

/// Half-width in pixels of the band around a segment body that grabs the whole segment.
pub const SEGMENT_BAND_PX: f64 = 8.0;

// ── Manipulation ────────────────────────────────────────────────

/// Angle snap increment in degrees while Shift is held during a rotate drag.
pub const ROTATE_SNAP_DEG: f64 = 15.0;

/// A rotate drag grabbed closer than this to the anchor (in pixels) pivots
/// on the box center, since the pointer angle about the anchor is undefined.
pub const ROTATE_PIVOT_MIN_PX: f64 = 1.0;

/// Pointer travel in screen pixels below which a press is still treated as a click.
pub const DRAG_THRESHOLD_PX: f64 = 0.5;

/// Smallest parent scale used when dividing by a group's height.
pub const MIN_PARENT_SCALE: f64 = 1e-9;

// ── Camera ──────────────────────────────────────────────────────

/// Zoom floor applied to degenerate camera input.
pub const MIN_ZOOM: f64 = 1e-6;
