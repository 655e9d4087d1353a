//! Grid and angle snapping.
//!
//! World grids are decimal: at zoom `z` the coarse spacing is
//! `base / 10^floor(log10 z)` and the fine spacing a tenth of that. The
//! fractional part of `log10 z` is run through a smoothstep to fade the fine
//! level in; once it passes one half the fine level is the one snapped to.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::MIN_ZOOM;
use crate::geometry::{Point, smoothstep};

/// The two decimal grid levels visible at a zoom, plus the fade between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLevels {
    /// Spacing of the coarse lines in world units.
    pub coarse: f64,
    /// Spacing of the fine lines in world units (`coarse / 10`).
    pub fine: f64,
    /// Opacity of the fine level in `[0, 1]`.
    pub fine_weight: f64,
}

impl GridLevels {
    /// Spacing that snapping uses at this zoom.
    #[must_use]
    pub fn active_spacing(&self) -> f64 {
        if self.fine_weight >= 0.5 { self.fine } else { self.coarse }
    }
}

/// Grid levels for `zoom` with a coarse base spacing of `base` at zoom 1.
#[must_use]
pub fn grid_levels(zoom: f64, base: f64) -> GridLevels {
    let zoom = if zoom.is_finite() && zoom > MIN_ZOOM { zoom } else { MIN_ZOOM };
    let log = zoom.log10();
    let n = log.floor();
    let coarse = base / 10f64.powf(n);
    GridLevels { coarse, fine: coarse / 10.0, fine_weight: smoothstep(0.0, 1.0, log - n) }
}

/// Snapping spacing for `zoom`.
#[must_use]
pub fn snap_spacing(zoom: f64, base: f64) -> f64 {
    grid_levels(zoom, base).active_spacing()
}

/// Round `value` to the nearest multiple of `spacing`.
#[must_use]
pub fn snap_value(value: f64, spacing: f64) -> f64 {
    if !(spacing.is_finite() && spacing > 0.0) {
        return value;
    }
    (value / spacing).round() * spacing
}

#[must_use]
pub fn snap_point(p: Point, spacing: f64) -> Point {
    Point::new(snap_value(p.x, spacing), snap_value(p.y, spacing))
}

/// Round an unwrapped angle to the nearest multiple of `step_deg`.
#[must_use]
pub fn snap_angle(deg: f64, step_deg: f64) -> f64 {
    snap_value(deg, step_deg)
}
