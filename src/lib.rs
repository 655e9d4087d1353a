//! Scene transform and cue playback engine for live presentations.
//!
//! A deck is a set of nodes on an infinite canvas (or pinned to the screen),
//! optionally nested in rotated and scaled groups, plus an ordered list of
//! camera views and enter/exit cues. This crate owns the geometry shared by
//! pointer manipulation and camera transitions, and the sequencer that steps
//! through cues without ever leaving visibility inconsistent. Everything it
//! does to the scene goes through a [`host::SceneHost`]; rendering and widget
//! payloads belong to the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Engine`]: pointer input, playback, timers, editing |
//! | [`doc`] | Nodes, views, cues, patches, and the validated presentation model |
//! | [`geometry`] | Points, rectangles, anchors, and anchored transforms |
//! | [`transform`] | Parent-relative composition and its exact inverse |
//! | [`camera`] | Cameras, screen projection, and transition planning |
//! | [`hit`] | Rotation-aware hit regions and cursors |
//! | [`manipulate`] | Move, resize, rotate, and anchor-retarget math |
//! | [`snap`] | Decimal world grids and angle snapping |
//! | [`input`] | Pointer events and the drag state machine |
//! | [`cue`] | Per-view cue sequencing over a baseline visibility set |
//! | [`timers`] | Cancellable delayed work fired by `tick` |
//! | [`host`] | The scene host trait and an in-memory host |
//! | [`config`] | Engine tunables from JSON or environment |
//! | [`consts`] | Fixed interaction constants (hit radii, snap step) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod cue;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod host;
pub mod input;
pub mod manipulate;
pub mod snap;
pub mod timers;
pub mod transform;
