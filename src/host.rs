//! The boundary between the engine and whatever owns the scene.
//!
//! A host holds the authoritative presentation model and camera and performs
//! the side effects the engine asks for. [`MemoryHost`] keeps everything in
//! memory and records each call, which is all the tests and the replay binary
//! need.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::collections::{HashMap, HashSet};

use crate::camera::{Camera, Viewport};
use crate::cue::Phase;
use crate::doc::{AnimationSpec, NodeId, NodePatch, PresentationModel};
use crate::geometry::Rect;

/// Operations the engine needs from the scene owner.
pub trait SceneHost {
    fn model(&self) -> &PresentationModel;

    fn set_model(&mut self, model: PresentationModel);

    /// Commit a sparse update. Returns false if the node doesn't exist or the
    /// patch was rejected.
    fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool;

    fn camera(&self) -> Camera;

    /// Jump the camera without a tween.
    fn set_camera(&mut self, camera: Camera);

    /// Tween the camera to `camera` over `duration_ms`.
    fn transition_to_camera(&mut self, camera: Camera, duration_ms: f64);

    /// Current viewport size in CSS pixels.
    fn screen(&self) -> Viewport;

    /// Rendered bounds of a node in screen pixels, when the renderer knows them.
    fn query_bounding_rect(&self, id: &NodeId) -> Option<Rect>;

    /// Start an enter or exit animation on a node.
    fn play_animation(&mut self, _id: &NodeId, _spec: &AnimationSpec, _phase: Phase) {}

    /// Whether a node has a live interactive session (e.g. a running widget).
    fn session_active(&self, _id: &NodeId) -> bool {
        false
    }

    /// Stop a node's live interactive session.
    fn stop_session(&mut self, _id: &NodeId) {}
}

/// A call the engine made on a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    UpdateNode { id: NodeId, patch: NodePatch },
    SetCamera(Camera),
    TransitionToCamera { camera: Camera, duration_ms: f64 },
    PlayAnimation { id: NodeId, spec: AnimationSpec, phase: Phase },
    StopSession(NodeId),
}

/// In-memory host that applies patches to its own model and records calls.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    model: PresentationModel,
    camera: Camera,
    viewport: Viewport,
    sessions: HashSet<NodeId>,
    rendered: HashMap<NodeId, Rect>,
    calls: Vec<HostCall>,
}

impl MemoryHost {
    #[must_use]
    pub fn new(model: PresentationModel, viewport: Viewport) -> Self {
        Self {
            model,
            camera: Camera::default(),
            viewport,
            sessions: HashSet::new(),
            rendered: HashMap::new(),
            calls: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Mark a node as having a live session.
    pub fn start_session(&mut self, id: NodeId) {
        self.sessions.insert(id);
    }

    /// Record the bounds a renderer reported for a node.
    pub fn set_rendered_rect(&mut self, id: NodeId, rect: Rect) {
        self.rendered.insert(id, rect);
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Ids of visible nodes, in model order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.model.nodes.iter().filter(|n| n.visible).map(|n| n.id.clone()).collect()
    }
}

impl SceneHost for MemoryHost {
    fn model(&self) -> &PresentationModel {
        &self.model
    }

    fn set_model(&mut self, model: PresentationModel) {
        self.model = model;
    }

    fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        self.calls.push(HostCall::UpdateNode { id: id.clone(), patch: patch.clone() });
        self.model.apply_patch(id, patch)
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera(&mut self, camera: Camera) {
        self.calls.push(HostCall::SetCamera(camera));
        self.camera = camera;
    }

    fn transition_to_camera(&mut self, camera: Camera, duration_ms: f64) {
        self.calls.push(HostCall::TransitionToCamera { camera, duration_ms });
        self.camera = camera;
    }

    fn screen(&self) -> Viewport {
        self.viewport
    }

    fn query_bounding_rect(&self, id: &NodeId) -> Option<Rect> {
        self.rendered.get(id).copied()
    }

    fn play_animation(&mut self, id: &NodeId, spec: &AnimationSpec, phase: Phase) {
        self.calls.push(HostCall::PlayAnimation { id: id.clone(), spec: spec.clone(), phase });
    }

    fn session_active(&self, id: &NodeId) -> bool {
        self.sessions.contains(id)
    }

    fn stop_session(&mut self, id: &NodeId) {
        self.calls.push(HostCall::StopSession(id.clone()));
        self.sessions.remove(id);
    }
}
