//! Engine configuration from deck defaults JSON or environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::{TransitionTuning, Viewport};
use crate::consts::{ANCHOR_POINT_RADIUS_PX, CORNER_RADIUS_PX, ROTATE_SNAP_DEG};
use crate::hit::HitTolerances;

pub const DEFAULT_DESIGN_WIDTH: f64 = 1920.0;
pub const DEFAULT_DESIGN_HEIGHT: f64 = 1080.0;
pub const DEFAULT_VIEW_TRANSITION_MS: f64 = 4000.0;
pub const DEFAULT_PIXELATE_STEPS: u32 = 20;
pub const DEFAULT_GRID_BASE: f64 = 100.0;
pub const DEFAULT_MIN_WORLD_SIZE: f64 = 1.0;
pub const DEFAULT_MIN_SCREEN_SIZE: f64 = 0.005;
pub const DEFAULT_SCREEN_GRID: f64 = 0.025;
pub const DEFAULT_ZOOM_OUT_RATIO: f64 = 2.0 / 3.0;
pub const DEFAULT_TRANSITION_EPSILON: f64 = 1e-6;

/// Error returned when configuration is malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{key} has unparseable value '{value}'")]
    Parse { key: String, value: String },
    #[error("{key} is out of range: {value}")]
    OutOfRange { key: &'static str, value: f64 },
}

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Design frame the authored views are laid out against.
    pub design_width: f64,
    pub design_height: f64,
    /// Camera transition duration for views that don't set their own.
    pub view_transition_ms: f64,
    /// Pixelation steps for animations that don't set their own.
    pub pixelate_steps: u32,
    /// Coarse world grid spacing at zoom 1.
    pub grid_base: f64,
    /// Corner radius and edge half-band for resize and rotate handles.
    pub handle_radius_px: f64,
    pub anchor_point_radius_px: f64,
    /// Smallest width/height of a world node, in world units.
    pub min_world_size: f64,
    /// Smallest width/height of a screen node, as a viewport fraction.
    pub min_screen_size: f64,
    /// Snapping grid for screen nodes, as a viewport fraction.
    pub screen_grid: f64,
    pub rotate_snap_deg: f64,
    pub zoom_out_ratio: f64,
    pub transition_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            design_width: DEFAULT_DESIGN_WIDTH,
            design_height: DEFAULT_DESIGN_HEIGHT,
            view_transition_ms: DEFAULT_VIEW_TRANSITION_MS,
            pixelate_steps: DEFAULT_PIXELATE_STEPS,
            grid_base: DEFAULT_GRID_BASE,
            handle_radius_px: CORNER_RADIUS_PX,
            anchor_point_radius_px: ANCHOR_POINT_RADIUS_PX,
            min_world_size: DEFAULT_MIN_WORLD_SIZE,
            min_screen_size: DEFAULT_MIN_SCREEN_SIZE,
            screen_grid: DEFAULT_SCREEN_GRID,
            rotate_snap_deg: ROTATE_SNAP_DEG,
            zoom_out_ratio: DEFAULT_ZOOM_OUT_RATIO,
            transition_epsilon: DEFAULT_TRANSITION_EPSILON,
        }
    }
}

impl EngineConfig {
    /// Parse a defaults document. Missing keys keep their defaults and unknown
    /// keys are ignored, so a deck's whole `defaults.json` can be passed in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from environment variables, keeping defaults for unset keys.
    ///
    /// Optional:
    /// - `CUEDECK_DESIGN_WIDTH`, `CUEDECK_DESIGN_HEIGHT`: default 1920×1080
    /// - `CUEDECK_VIEW_TRANSITION_MS`: default 4000
    /// - `CUEDECK_PIXELATE_STEPS`: default 20
    /// - `CUEDECK_GRID_BASE`: default 100
    /// - `CUEDECK_HANDLE_RADIUS_PX`: default 20
    /// - `CUEDECK_ANCHOR_POINT_RADIUS_PX`: default 6
    /// - `CUEDECK_MIN_WORLD_SIZE`, `CUEDECK_MIN_SCREEN_SIZE`: default 1.0 and 0.005
    /// - `CUEDECK_SCREEN_GRID`: default 0.025
    /// - `CUEDECK_ROTATE_SNAP_DEG`: default 15
    /// - `CUEDECK_ZOOM_OUT_RATIO`: default 2/3
    /// - `CUEDECK_TRANSITION_EPSILON`: default 1e-6
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable doesn't parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value doesn't parse or is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let f = |key: &str, default: f64| parse_or(&lookup, key, default);
        let config = Self {
            design_width: f("CUEDECK_DESIGN_WIDTH", d.design_width)?,
            design_height: f("CUEDECK_DESIGN_HEIGHT", d.design_height)?,
            view_transition_ms: f("CUEDECK_VIEW_TRANSITION_MS", d.view_transition_ms)?,
            pixelate_steps: parse_or(&lookup, "CUEDECK_PIXELATE_STEPS", d.pixelate_steps)?,
            grid_base: f("CUEDECK_GRID_BASE", d.grid_base)?,
            handle_radius_px: f("CUEDECK_HANDLE_RADIUS_PX", d.handle_radius_px)?,
            anchor_point_radius_px: f("CUEDECK_ANCHOR_POINT_RADIUS_PX", d.anchor_point_radius_px)?,
            min_world_size: f("CUEDECK_MIN_WORLD_SIZE", d.min_world_size)?,
            min_screen_size: f("CUEDECK_MIN_SCREEN_SIZE", d.min_screen_size)?,
            screen_grid: f("CUEDECK_SCREEN_GRID", d.screen_grid)?,
            rotate_snap_deg: f("CUEDECK_ROTATE_SNAP_DEG", d.rotate_snap_deg)?,
            zoom_out_ratio: f("CUEDECK_ZOOM_OUT_RATIO", d.zoom_out_ratio)?,
            transition_epsilon: f("CUEDECK_TRANSITION_EPSILON", d.transition_epsilon)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every value is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("designWidth", self.design_width),
            ("designHeight", self.design_height),
            ("gridBase", self.grid_base),
            ("handleRadiusPx", self.handle_radius_px),
            ("anchorPointRadiusPx", self.anchor_point_radius_px),
            ("minWorldSize", self.min_world_size),
            ("minScreenSize", self.min_screen_size),
            ("screenGrid", self.screen_grid),
            ("rotateSnapDeg", self.rotate_snap_deg),
            ("zoomOutRatio", self.zoom_out_ratio),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }
        let non_negative = [("viewTransitionMs", self.view_transition_ms), ("transitionEpsilon", self.transition_epsilon)];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }
        if self.zoom_out_ratio > 1.0 {
            return Err(ConfigError::OutOfRange { key: "zoomOutRatio", value: self.zoom_out_ratio });
        }
        if self.pixelate_steps == 0 {
            return Err(ConfigError::OutOfRange { key: "pixelateSteps", value: 0.0 });
        }
        Ok(())
    }

    #[must_use]
    pub fn design_viewport(&self) -> Viewport {
        Viewport::new(self.design_width, self.design_height)
    }

    #[must_use]
    pub fn tuning(&self) -> TransitionTuning {
        TransitionTuning { zoom_out_ratio: self.zoom_out_ratio, epsilon: self.transition_epsilon }
    }

    #[must_use]
    pub fn tolerances(&self) -> HitTolerances {
        HitTolerances {
            corner_px: self.handle_radius_px,
            edge_px: self.handle_radius_px,
            anchor_px: self.anchor_point_radius_px,
            ..HitTolerances::default()
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { key: key.to_string(), value: raw }),
    }
}
