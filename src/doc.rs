//! Document model: nodes, views, cues, and the presentation aggregate.
//!
//! This module defines what a deck is made of (`Node`, `View`, `Cue`), the
//! sparse-update type every manipulation and cue operation writes through
//! (`NodePatch`), and `PresentationModel`, which owns all of it and enforces
//! the structural rules at load time (unique ids, world-only parents, no parent
//! cycles) and on edits (cascading deletes, collision-free ids).
//!
//! Widget payloads (polls, charts, timers) ride along as opaque JSON; nothing in
//! the engine reads them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Camera;
use crate::geometry::{Anchor, Point, Transform};

/// Unique identifier for a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id that cannot collide with authored names.
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique identifier for a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Error returned when a presentation fails structural validation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid presentation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("duplicate view id: {0}")]
    DuplicateView(ViewId),
    #[error("node {node} names unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },
    #[error("node {node} names screen-space parent {parent}")]
    ScreenParent { node: NodeId, parent: NodeId },
    #[error("parent chain of node {0} forms a cycle")]
    ParentCycle(NodeId),
    #[error("unknown initial view: {0}")]
    UnknownInitialView(ViewId),
}

/// Coordinate space a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    /// Shared infinite canvas; affected by camera pan and zoom.
    World,
    /// Viewport fractions; immune to the camera.
    Screen,
}

/// Where a node lives and how it is placed there.
///
/// Screen-space nodes cannot have a parent, so that combination is not
/// representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "lowercase")]
pub enum Placement {
    World {
        #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
        parent_id: Option<NodeId>,
        transform: Transform,
    },
    Screen {
        transform: Transform,
    },
}

impl Placement {
    #[must_use]
    pub fn world(transform: Transform) -> Self {
        Self::World { parent_id: None, transform }
    }

    #[must_use]
    pub fn child_of(parent: NodeId, transform: Transform) -> Self {
        Self::World { parent_id: Some(parent), transform }
    }

    #[must_use]
    pub fn screen(transform: Transform) -> Self {
        Self::Screen { transform }
    }

    #[must_use]
    pub fn space(&self) -> Space {
        match self {
            Self::World { .. } => Space::World,
            Self::Screen { .. } => Space::Screen,
        }
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        match self {
            Self::World { transform, .. } | Self::Screen { transform } => transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Self::World { transform, .. } | Self::Screen { transform } => transform,
        }
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&NodeId> {
        match self {
            Self::World { parent_id, .. } => parent_id.as_ref(),
            Self::Screen { .. } => None,
        }
    }
}

/// Visual style of an enter or exit animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Cut with no tween.
    Sudden,
    /// Opacity tween, optionally sliding in from an edge.
    Fade,
    /// Stepped pixelation.
    Pixelate,
    /// Cue-driven appearance; marks the node as enter-controlled.
    Appear,
}

/// An enter or exit animation attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    #[serde(default)]
    pub duration_ms: f64,
    #[serde(default)]
    pub delay_ms: f64,
    /// Edge the animation travels from (`left`, `right`, `top`, `bottom`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Fraction of the node used as a soft border during a directional fade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_frac: Option<f64>,
    /// Number of pixelation steps; the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl AnimationSpec {
    #[must_use]
    pub fn new(kind: AnimationKind, duration_ms: f64) -> Self {
        Self { kind, duration_ms, delay_ms: 0.0, from: None, border_frac: None, steps: None }
    }

    /// Delay plus duration, ignoring negative or non-finite parts.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        clean(self.delay_ms) + clean(self.duration_ms)
    }
}

/// Geometry a node draws. Boxes use the transform; segments use endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Box,
    /// Straight line between two points in the owning coordinate space.
    Segment { a: Point, b: Point },
}

/// Which end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    A,
    B,
}

fn default_visible() -> bool {
    true
}

/// A node as stored in the model and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Enter animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appear: Option<AnimationSpec>,
    /// Exit animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disappear: Option<AnimationSpec>,
    /// Font size that scales with uniform resizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_px: Option<f64>,
    #[serde(default)]
    pub shape: Shape,
    /// Opaque widget payload for external renderers.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, placement: Placement) -> Self {
        Self {
            id: NodeId::new(id),
            placement,
            visible: true,
            appear: None,
            disappear: None,
            font_px: None,
            shape: Shape::Box,
            payload: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        self.placement.transform()
    }

    #[must_use]
    pub fn space(&self) -> Space {
        self.placement.space()
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.placement.parent_id()
    }
}

/// An authored camera framing plus the nodes that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ViewId,
    pub camera: Camera,
    #[serde(default)]
    pub show: Vec<NodeId>,
    /// Camera transition duration; the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<f64>,
}

impl View {
    #[must_use]
    pub fn new(id: impl Into<String>, camera: Camera, show: Vec<NodeId>) -> Self {
        Self { id: ViewId::new(id), camera, show, transition_ms: None }
    }

    #[must_use]
    pub fn shows(&self, id: &NodeId) -> bool {
        self.show.contains(id)
    }
}

/// Whether a cue brings a node in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueWhen {
    Enter,
    Exit,
}

/// An authored enter or exit event bound to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    #[serde(alias = "id")]
    pub node_id: NodeId,
    pub when: CueWhen,
}

impl Cue {
    #[must_use]
    pub fn enter(node_id: impl Into<String>) -> Self {
        Self { node_id: NodeId::new(node_id), when: CueWhen::Enter }
    }

    #[must_use]
    pub fn exit(node_id: impl Into<String>) -> Self {
        Self { node_id: NodeId::new(node_id), when: CueWhen::Exit }
    }
}

/// How a patch changes a node's parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentPatch {
    Set(NodeId),
    Clear,
}

/// Sparse update for a node. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentPatch>,
}

impl NodePatch {
    /// A patch that writes every field of `t`.
    #[must_use]
    pub fn transform(t: &Transform) -> Self {
        Self {
            x: Some(t.x),
            y: Some(t.y),
            w: Some(t.w),
            h: Some(t.h),
            anchor: Some(t.anchor),
            rotation_deg: Some(t.rotation_deg),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn visibility(visible: bool) -> Self {
        Self { visible: Some(visible), ..Default::default() }
    }

    /// Restores everything a drag can touch back to `node`'s values.
    #[must_use]
    pub fn restore(node: &Node) -> Self {
        Self { font_px: node.font_px, shape: Some(node.shape), ..Self::transform(node.transform()) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The aggregate of all nodes, views, and cues in a deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationModel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub views: Vec<View>,
    /// Global ordered cue list. Each view plays the cues whose node it shows.
    #[serde(default, alias = "animationCues")]
    pub cues: Vec<Cue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_view_id: Option<ViewId>,
}

impl PresentationModel {
    /// Parse and validate a deck from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the JSON is malformed or the deck breaks a
    /// structural rule.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check ids are unique, parents are known world nodes, parent chains are
    /// acyclic, and the initial view exists.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(ModelError::DuplicateNode(node.id.clone()));
            }
        }
        let mut seen_views = HashSet::new();
        for view in &self.views {
            if !seen_views.insert(&view.id) {
                return Err(ModelError::DuplicateView(view.id.clone()));
            }
        }
        for node in &self.nodes {
            let Some(parent_id) = node.parent_id() else {
                continue;
            };
            let Some(parent) = self.node(parent_id) else {
                return Err(ModelError::UnknownParent { node: node.id.clone(), parent: parent_id.clone() });
            };
            if parent.space() != Space::World {
                return Err(ModelError::ScreenParent { node: node.id.clone(), parent: parent_id.clone() });
            }
            if self.parent_chain_cycles(&node.id) {
                return Err(ModelError::ParentCycle(node.id.clone()));
            }
        }
        if let Some(initial) = &self.initial_view_id {
            if self.view_index(initial).is_none() {
                return Err(ModelError::UnknownInitialView(initial.clone()));
            }
        }
        Ok(())
    }

    /// Clamp degenerate transforms in place. Root world nodes are floored at
    /// `min_world`; screen and parented nodes store fractions and are floored
    /// at `min_fraction`.
    pub fn sanitize(&mut self, min_world: f64, min_fraction: f64) {
        for node in &mut self.nodes {
            let floor = match (&node.placement, node.placement.parent_id()) {
                (Placement::World { .. }, None) => min_world,
                _ => min_fraction,
            };
            let t = node.placement.transform_mut();
            *t = t.sanitized(floor);
        }
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    #[must_use]
    pub fn view_index(&self, id: &ViewId) -> Option<usize> {
        self.views.iter().position(|v| &v.id == id)
    }

    /// Index of the initial view, falling back to the first view.
    #[must_use]
    pub fn initial_view_index(&self) -> Option<usize> {
        self.initial_view_id
            .as_ref()
            .and_then(|id| self.view_index(id))
            .or(if self.views.is_empty() { None } else { Some(0) })
    }

    /// The global cue list filtered to nodes shown by `view`, in authored order.
    #[must_use]
    pub fn cues_for_view(&self, view: &View) -> Vec<Cue> {
        self.cues
            .iter()
            .filter(|cue| view.shows(&cue.node_id))
            .cloned()
            .collect()
    }

    /// Insert a node, replacing its id with a fresh one when it is empty or
    /// already taken. Returns the id actually used.
    pub fn insert_node(&mut self, mut node: Node) -> NodeId {
        while node.id.as_str().is_empty() || self.contains(&node.id) {
            node.id = NodeId::fresh();
        }
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Delete a node and cascade: drop it from every view, drop cues that name
    /// it, and orphan its children (they keep their values and become
    /// root-level world nodes).
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        let removed = self.nodes.remove(index);
        for view in &mut self.views {
            view.show.retain(|n| n != id);
        }
        self.cues.retain(|c| &c.node_id != id);
        for node in &mut self.nodes {
            if let Placement::World { parent_id, .. } = &mut node.placement {
                if parent_id.as_ref() == Some(id) {
                    *parent_id = None;
                }
            }
        }
        Some(removed)
    }

    /// Apply a partial update to an existing node. Returns false if the node
    /// doesn't exist or the parent change is illegal (screen node, unknown or
    /// screen parent, or a cycle); in that case nothing is applied.
    pub fn apply_patch(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        if let Some(parent) = &patch.parent {
            if !self.parent_patch_allowed(id, parent) {
                return false;
            }
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let t = node.placement.transform_mut();
        if let Some(x) = patch.x {
            t.x = x;
        }
        if let Some(y) = patch.y {
            t.y = y;
        }
        if let Some(w) = patch.w {
            t.w = w;
        }
        if let Some(h) = patch.h {
            t.h = h;
        }
        if let Some(anchor) = patch.anchor {
            t.anchor = anchor;
        }
        if let Some(r) = patch.rotation_deg {
            t.rotation_deg = r;
        }
        if let Some(v) = patch.visible {
            node.visible = v;
        }
        if let Some(f) = patch.font_px {
            node.font_px = Some(f);
        }
        if let Some(shape) = patch.shape {
            node.shape = shape;
        }
        if let Some(parent) = &patch.parent {
            if let Placement::World { parent_id, .. } = &mut node.placement {
                *parent_id = match parent {
                    ParentPatch::Set(p) => Some(p.clone()),
                    ParentPatch::Clear => None,
                };
            }
        }
        true
    }

    /// Nodes in draw order: world nodes in authored order, then screen nodes
    /// in authored order. Later entries are on top.
    #[must_use]
    pub fn stacking(&self) -> Vec<&Node> {
        let world = self.nodes.iter().filter(|n| n.space() == Space::World);
        let screen = self.nodes.iter().filter(|n| n.space() == Space::Screen);
        world.chain(screen).collect()
    }

    fn parent_patch_allowed(&self, id: &NodeId, parent: &ParentPatch) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.space() != Space::World {
            return false;
        }
        let ParentPatch::Set(parent_id) = parent else {
            return true;
        };
        let Some(parent_node) = self.node(parent_id) else {
            return false;
        };
        if parent_node.space() != Space::World {
            return false;
        }
        // Reject if `id` is already an ancestor of the proposed parent.
        let mut cursor = Some(parent_id);
        let mut guard = HashSet::new();
        while let Some(current) = cursor {
            if current == id || !guard.insert(current) {
                return false;
            }
            cursor = self.node(current).and_then(Node::parent_id);
        }
        true
    }

    fn parent_chain_cycles(&self, start: &NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return true;
            }
            cursor = self.node(current).and_then(Node::parent_id);
        }
        false
    }
}
