//! The engine: one instance per scene, owning all interactive and playback
//! state, with every side effect routed through its [`SceneHost`].
//!
//! Pointer handlers return [`Action`]s describing what changed so a UI layer
//! can repaint or persist; the host has already been updated by then. Cue
//! playback and view switches act on the host directly. Delayed work (hide
//! commits, the second leg of a camera transition) waits in a timer queue
//! that only moves when the host calls [`Engine::tick`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Projection, TransitionPlan, plan_transition};
use crate::config::EngineConfig;
use crate::consts::DRAG_THRESHOLD_PX;
use crate::cue::{Phase, Sequencer, Step, VisibilityOp};
use crate::doc::{AnimationKind, AnimationSpec, Cue, Node, NodeId, NodePatch, SegmentEnd, Shape};
use crate::geometry::{Anchor, Point, Rect, Transform};
use crate::hit::{Cursor, Hit, HitRegion, NodeFrame, cursor_for, hit_test, screen_frames};
use crate::host::SceneHost;
use crate::input::{DragSession, DragState, PointerEvent};
use crate::manipulate::{DragFrame, RotateGesture, moved, resized, retarget_anchor, scaled_font};
use crate::timers::{TimerKey, TimerQueue, TimerTask};
use crate::transform::Resolver;

/// What an input handler changed, for the UI layer to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NodeUpdated { id: NodeId, patch: NodePatch },
    SetCursor(Cursor),
    SelectionChanged(Option<NodeId>),
    RenderNeeded,
}

/// Result of a playback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A cue was played forward.
    Played(Cue),
    /// A cue was undone.
    Undone(Cue),
    /// The step crossed into another view.
    ViewChanged(usize),
    /// Nothing further in this direction.
    Boundary,
}

/// A visible node as the renderer should place it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub frame: NodeFrame,
    /// Bounds the renderer last reported for the node, if any.
    pub rendered: Option<Rect>,
}

/// Scene transform and cue playback engine bound to one host.
pub struct Engine<H: SceneHost> {
    host: H,
    config: EngineConfig,
    drag: DragState,
    selected: Option<NodeId>,
    sequencer: Sequencer,
    timers: TimerQueue,
    now_ms: f64,
}

impl<H: SceneHost> Engine<H> {
    #[must_use]
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            drag: DragState::Idle,
            selected: None,
            sequencer: Sequencer::new(),
            timers: TimerQueue::new(),
            now_ms: 0.0,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for edits the engine doesn't mediate.
    /// Call [`Engine::refresh`] afterwards if views or cues changed.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    #[must_use]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Whether a hide is waiting for its exit animation to finish.
    #[must_use]
    pub fn hide_pending(&self, id: &NodeId) -> bool {
        self.timers.is_pending(&TimerKey::Hide(id.clone()))
    }

    /// Every visible node projected into screen pixels, bottom to top.
    /// Never touches playback or drag state.
    #[must_use]
    pub fn layout(&self) -> Vec<NodeLayout> {
        screen_frames(self.host.model(), &self.projection())
            .into_iter()
            .map(|frame| {
                let rendered = self.host.query_bounding_rect(&frame.id);
                NodeLayout { frame, rendered }
            })
            .collect()
    }

    fn projection(&self) -> Projection {
        Projection::new(self.host.camera(), self.host.screen())
    }

    // --- Selection ---

    /// Select `id`, or clear the selection with `None`. Unknown ids clear it.
    pub fn select(&mut self, id: Option<NodeId>) -> Vec<Action> {
        let id = id.filter(|id| self.host.model().contains(id));
        if id == self.selected {
            return Vec::new();
        }
        self.selected.clone_from(&id);
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Start a gesture, retarget an anchor, or clear the selection.
    ///
    /// A second pointer-down from the pointer that owns the active drag
    /// restores that drag's node before starting over. Other pointers are
    /// ignored while a drag is active.
    pub fn pointer_down(&mut self, ev: &PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(session) = self.drag.session() {
            if session.pointer_id != ev.pointer_id {
                tracing::debug!(pointer = ev.pointer_id, owner = session.pointer_id, "pointer ignored during drag");
                return actions;
            }
            tracing::debug!(node = %session.node_id, "drag superseded");
            self.abort_drag(&mut actions);
        }

        let projection = self.projection();
        let frames = screen_frames(self.host.model(), &projection);
        let hit = hit_test(ev.screen, &frames, self.selected.as_ref(), &self.config.tolerances());
        let Some(Hit { node_id, region }) = hit else {
            actions.extend(self.select(None));
            actions.push(Action::SetCursor(Cursor::Default));
            return actions;
        };
        let Some(frame) = frames.into_iter().find(|f| f.id == node_id) else {
            return actions;
        };
        actions.extend(self.select(Some(node_id.clone())));

        if let HitRegion::Anchor(anchor) = region {
            self.retarget(&node_id, anchor, &mut actions);
            actions.push(Action::SetCursor(Cursor::Pointer));
            return actions;
        }

        let Some(session) = self.begin_session(ev, &node_id, &frame, projection) else {
            return actions;
        };
        self.drag = match region {
            HitRegion::Resize(handle) => DragState::Resize { session, handle },
            HitRegion::Rotate(_) => {
                let gesture = RotateGesture::new(&frame.rect, ev.screen);
                DragState::Rotate { session, gesture }
            }
            HitRegion::SegmentEndpoint(end) => match frame.segment {
                Some((a, b)) => {
                    let start = if end == SegmentEnd::A { a } else { b };
                    DragState::SegmentEndpoint { session, end, start }
                }
                None => DragState::Move(session),
            },
            HitRegion::SegmentBody => match frame.segment {
                Some(start) => DragState::SegmentTranslate { session, start },
                None => DragState::Move(session),
            },
            HitRegion::Move | HitRegion::Anchor(_) => DragState::Move(session),
        };
        tracing::debug!(node = %node_id, gesture = self.drag.label(), "drag started");
        actions.push(Action::SetCursor(cursor_for(Some(region), frame.rect.rotation_deg, true)));
        actions
    }

    /// Update the active drag, or report the hover cursor when idle.
    pub fn pointer_move(&mut self, ev: &PointerEvent) -> Vec<Action> {
        let Some(session) = self.drag.session() else {
            return vec![Action::SetCursor(self.hover_cursor(ev.screen))];
        };
        if session.pointer_id != ev.pointer_id {
            return Vec::new();
        }
        if !session.moved && session.delta(ev.screen).length() < DRAG_THRESHOLD_PX {
            return Vec::new();
        }
        let node_id = session.node_id.clone();
        let captured = session.frame.parent_world;
        let parent_world = Resolver::new(self.host.model()).parent_world(&node_id);
        if parent_world != captured {
            self.rebase_drag(&node_id, parent_world);
        }

        let Some((id, patch)) = self.drag_patch(ev) else {
            return Vec::new();
        };
        if !self.host.update_node(&id, &patch) {
            tracing::warn!(node = %id, "dragged node rejected update; ending drag");
            self.drag = DragState::Idle;
            return vec![Action::SetCursor(Cursor::Default)];
        }
        if let Some(session) = self.drag.session_mut() {
            session.moved = true;
            session.last_screen = ev.screen;
        }
        vec![Action::NodeUpdated { id, patch }, Action::RenderNeeded]
    }

    /// Finish the active drag. Changes were committed as the pointer moved, so
    /// a release without movement leaves the node untouched.
    pub fn pointer_up(&mut self, ev: &PointerEvent) -> Vec<Action> {
        match self.drag.session() {
            Some(session) if session.pointer_id == ev.pointer_id => {
                tracing::debug!(node = %session.node_id, gesture = self.drag.label(), moved = session.moved, "drag ended");
                self.drag = DragState::Idle;
                vec![Action::SetCursor(self.hover_cursor(ev.screen))]
            }
            Some(_) => Vec::new(),
            None => vec![Action::SetCursor(self.hover_cursor(ev.screen))],
        }
    }

    /// Abandon the active drag, restoring the node's pre-drag values.
    pub fn pointer_cancel(&mut self, ev: &PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.drag.session().is_some_and(|s| s.pointer_id == ev.pointer_id) {
            self.abort_drag(&mut actions);
            actions.push(Action::SetCursor(Cursor::Default));
        }
        actions
    }

    fn hover_cursor(&self, screen: Point) -> Cursor {
        let frames = screen_frames(self.host.model(), &self.projection());
        let Some(hit) = hit_test(screen, &frames, self.selected.as_ref(), &self.config.tolerances()) else {
            return Cursor::Default;
        };
        let rotation = frames.iter().find(|f| f.id == hit.node_id).map_or(0.0, |f| f.rect.rotation_deg);
        cursor_for(Some(hit.region), rotation, false)
    }

    fn begin_session(
        &self,
        ev: &PointerEvent,
        node_id: &NodeId,
        frame: &NodeFrame,
        projection: Projection,
    ) -> Option<DragSession> {
        let model = self.host.model();
        let original = model.node(node_id)?.clone();
        let parent_world = Resolver::new(model).parent_world(node_id);
        Some(DragSession {
            pointer_id: ev.pointer_id,
            node_id: node_id.clone(),
            start_screen: ev.screen,
            last_screen: ev.screen,
            start_frame: frame.rect,
            frame: DragFrame { projection, space: original.space(), parent_world },
            original,
            moved: false,
        })
    }

    /// The dragged node's parent moved, changed, or went away since the last
    /// event. Continue from where the node is now.
    fn rebase_drag(&mut self, id: &NodeId, parent_world: Option<Transform>) {
        let Some(projection) = self.drag.session().map(|s| s.frame.projection) else {
            return;
        };
        let frame = screen_frames(self.host.model(), &projection).into_iter().find(|f| &f.id == id);
        match frame {
            Some(frame) => {
                tracing::debug!(node = %id, parented = parent_world.is_some(), "parent changed during drag; rebasing");
                self.drag.rebase(&frame, parent_world);
            }
            None => {
                if let Some(session) = self.drag.session_mut() {
                    session.frame.parent_world = parent_world;
                }
            }
        }
    }

    fn retarget(&mut self, id: &NodeId, anchor: Anchor, actions: &mut Vec<Action>) {
        let Some(node) = self.host.model().node(id) else {
            return;
        };
        if node.transform().anchor == anchor {
            return;
        }
        let t = retarget_anchor(node.transform(), anchor);
        let patch = NodePatch { x: Some(t.x), y: Some(t.y), anchor: Some(anchor), ..Default::default() };
        if self.host.update_node(id, &patch) {
            tracing::debug!(node = %id, ?anchor, "anchor retargeted");
            actions.push(Action::NodeUpdated { id: id.clone(), patch });
            actions.push(Action::RenderNeeded);
        }
    }

    /// The patch the active drag implies for the pointer at `ev`.
    fn drag_patch(&mut self, ev: &PointerEvent) -> Option<(NodeId, NodePatch)> {
        let cfg = &self.config;
        let snap = ev.modifiers.shift;
        let patch = match &mut self.drag {
            DragState::Idle => return None,
            DragState::Move(session) => {
                let frame = moved(&session.start_frame, session.delta(ev.screen));
                let grid = snap.then(|| session.frame.grid_spacing(cfg.grid_base, cfg.screen_grid));
                let local = session.frame.local_from_screen(&frame, session.original.transform().anchor, grid);
                NodePatch { x: Some(local.x), y: Some(local.y), ..Default::default() }
            }
            DragState::Resize { session, handle } => {
                let (min_w, min_h) = session.frame.min_size_px(cfg.min_world_size, cfg.min_screen_size);
                let r = resized(&session.start_frame, *handle, session.delta(ev.screen), min_w, min_h);
                let local = session.frame.local_from_screen(&r.frame, session.original.transform().anchor, None);
                NodePatch {
                    font_px: scaled_font(session.original.font_px, r.factor),
                    ..NodePatch::transform(&local)
                }
            }
            DragState::Rotate { session, gesture } => {
                let rotation = gesture.update(ev.screen, snap.then_some(cfg.rotate_snap_deg));
                let frame = Transform { rotation_deg: rotation, ..session.start_frame };
                let local = session.frame.local_from_screen(&frame, session.original.transform().anchor, None);
                NodePatch { rotation_deg: Some(local.rotation_deg), ..Default::default() }
            }
            DragState::SegmentEndpoint { session, end, start } => {
                let Shape::Segment { a, b } = session.original.shape else {
                    return None;
                };
                let grid = snap.then(|| session.frame.grid_spacing(cfg.grid_base, cfg.screen_grid));
                let p = session.frame.local_point_from_screen(*start + session.delta(ev.screen), grid);
                let shape = match end {
                    SegmentEnd::A => Shape::Segment { a: p, b },
                    SegmentEnd::B => Shape::Segment { a, b: p },
                };
                NodePatch { shape: Some(shape), ..Default::default() }
            }
            DragState::SegmentTranslate { session, start } => {
                let Shape::Segment { a, b } = session.original.shape else {
                    return None;
                };
                let grid = snap.then(|| session.frame.grid_spacing(cfg.grid_base, cfg.screen_grid));
                let new_a = session.frame.local_point_from_screen(start.0 + session.delta(ev.screen), grid);
                let shift = new_a - a;
                NodePatch { shape: Some(Shape::Segment { a: new_a, b: b + shift }), ..Default::default() }
            }
        };
        let id = self.drag.session()?.node_id.clone();
        Some((id, patch))
    }

    /// Drop the active drag, putting its node back if it had moved.
    fn abort_drag(&mut self, actions: &mut Vec<Action>) {
        let session = match std::mem::take(&mut self.drag) {
            DragState::Idle => return,
            DragState::Move(session)
            | DragState::Resize { session, .. }
            | DragState::Rotate { session, .. }
            | DragState::SegmentEndpoint { session, .. }
            | DragState::SegmentTranslate { session, .. } => session,
        };
        if !session.moved {
            return;
        }
        let patch = NodePatch::restore(&session.original);
        if self.host.update_node(&session.node_id, &patch) {
            tracing::debug!(node = %session.node_id, "drag reverted");
            actions.push(Action::NodeUpdated { id: session.node_id, patch });
            actions.push(Action::RenderNeeded);
        }
    }

    // --- Playback ---

    /// Enter playback at `index`, or at the deck's initial view when `None`,
    /// with a clean baseline. Returns false if there is no such view.
    pub fn begin_playback(&mut self, index: Option<usize>) -> bool {
        let Some(index) = index.or_else(|| self.host.model().initial_view_index()) else {
            tracing::warn!("deck has no views to play");
            return false;
        };
        if self.host.model().view(index).is_none() {
            tracing::warn!(index, "playback requested for unknown view");
            return false;
        }
        self.sequencer.set_playing(true);
        tracing::info!(index, "playback started");
        self.switch_view(index, false, false)
    }

    /// Leave playback. Pending hides are committed and the current view's
    /// show set is revealed for editing.
    pub fn end_playback(&mut self) {
        if !self.sequencer.is_playing() {
            return;
        }
        self.commit_pending_hides();
        self.sequencer.set_playing(false);
        let ops = self.sequencer.reveal_all(self.host.model());
        self.apply_ops(ops);
        tracing::info!("playback stopped");
    }

    /// Make `index` the current view, moving the camera there (tweened when
    /// `animate`). During playback the cue position resets and the baseline
    /// is applied keeping nodes that are already visible; in edit mode the
    /// whole show set is revealed.
    pub fn set_view(&mut self, index: usize, animate: bool) -> bool {
        self.switch_view(index, animate, true)
    }

    /// Bring the current view's show set to its baseline. Without
    /// `preserve_existing` this is a fresh start of the view, so the cue
    /// position rewinds to its first cue.
    ///
    /// Nodes the baseline keeps visible lose any pending hide; enter-controlled
    /// nodes it hides are hidden at once.
    pub fn apply_baseline(&mut self, preserve_existing: bool) {
        if !preserve_existing {
            self.sequencer.rewind();
        }
        let always_shown: Vec<NodeId> =
            self.sequencer.show_set().iter().filter(|id| !self.sequencer.is_enter_controlled(id)).cloned().collect();
        for id in always_shown {
            if self.timers.cancel(&TimerKey::Hide(id.clone())).is_some() {
                tracing::debug!(node = %id, "pending hide cancelled by baseline");
            }
        }
        let ops = self.sequencer.baseline(self.host.model(), preserve_existing);
        self.apply_ops(ops);
    }

    /// Play the next cue, or move on to the next view.
    pub fn step_forward(&mut self) -> StepOutcome {
        let step = self.sequencer.step_forward(self.host.model().views.len());
        self.run_step(step, true)
    }

    /// Undo the last cue, or move back to the end of the previous view.
    pub fn step_back(&mut self) -> StepOutcome {
        let step = self.sequencer.step_back();
        self.run_step(step, false)
    }

    fn run_step(&mut self, step: Step, forward: bool) -> StepOutcome {
        match step {
            Step::Apply { cue, op } => {
                tracing::debug!(node = %cue.node_id, when = ?cue.when, forward, index = self.sequencer.cue_index(), "cue step");
                self.apply_op(op);
                if forward { StepOutcome::Played(cue) } else { StepOutcome::Undone(cue) }
            }
            Step::ToView { index, at_end } => {
                if !self.switch_view(index, true, true) {
                    return StepOutcome::Boundary;
                }
                if at_end {
                    let ops = self.sequencer.settle_at_end();
                    self.apply_ops(ops);
                }
                StepOutcome::ViewChanged(index)
            }
            Step::Boundary => StepOutcome::Boundary,
        }
    }

    fn switch_view(&mut self, index: usize, animate: bool, preserve_existing: bool) -> bool {
        let Some(view) = self.host.model().view(index).cloned() else {
            tracing::warn!(index, "unknown view");
            return false;
        };
        let playing = self.sequencer.is_playing();
        let departing = self.sequencer.show_set().to_vec();
        let leaving: Vec<NodeId> = departing.iter().filter(|id| !view.shows(id)).cloned().collect();

        if playing {
            self.commit_pending_hides();
            for id in &departing {
                if self.host.session_active(id) {
                    tracing::debug!(node = %id, "stopping session of departing view");
                    self.host.stop_session(id);
                }
            }
        }

        self.sequencer.enter_view(self.host.model(), index);

        if playing {
            for id in &leaving {
                self.hide(id, false);
            }
            self.apply_baseline(preserve_existing);
        } else {
            let ops = self.sequencer.reveal_all(self.host.model());
            self.apply_ops(ops);
        }

        let duration_ms = view.transition_ms.unwrap_or(self.config.view_transition_ms);
        self.timers.cancel(&TimerKey::Camera);
        let two_stage = if animate && duration_ms > 0.0 {
            let plan =
                plan_transition(&self.host.camera(), &view.camera, self.host.screen(), duration_ms, self.config.tuning());
            match plan {
                TransitionPlan::Direct { to, duration_ms } => self.host.transition_to_camera(to, duration_ms),
                TransitionPlan::TwoStage { mid, to, first_ms, second_ms } => {
                    self.host.transition_to_camera(mid, first_ms);
                    self.timers
                        .schedule(self.now_ms + first_ms, TimerTask::CameraStage { camera: to, duration_ms: second_ms });
                }
            }
            plan.is_two_stage()
        } else {
            self.host.set_camera(view.camera);
            false
        };
        tracing::info!(view = %view.id, index, animate, two_stage, playing, "view changed");
        true
    }

    fn apply_ops(&mut self, ops: Vec<VisibilityOp>) {
        for op in ops {
            self.apply_op(op);
        }
    }

    fn apply_op(&mut self, op: VisibilityOp) {
        match op {
            VisibilityOp::Show { id, animate } => self.show(&id, animate),
            VisibilityOp::Hide { id, animate } => self.hide(&id, animate),
        }
    }

    fn show(&mut self, id: &NodeId, animate: bool) {
        let Some(node) = self.host.model().node(id) else {
            tracing::warn!(node = %id, "show requested for unknown node");
            return;
        };
        let visible = node.visible;
        let appear = node.appear.clone();
        if self.timers.cancel(&TimerKey::Hide(id.clone())).is_some() {
            tracing::debug!(node = %id, "pending hide cancelled");
        }
        if let Some(spec) = appear.filter(|_| animate) {
            let spec = self.with_defaults(spec);
            self.host.play_animation(id, &spec, Phase::Enter);
        }
        if !visible && !self.host.update_node(id, &NodePatch::visibility(true)) {
            tracing::warn!(node = %id, "host rejected show");
        }
    }

    /// Hide a node. With an exit animation the node stays visible until the
    /// animation has run, then a timer commits it hidden.
    fn hide(&mut self, id: &NodeId, animate: bool) {
        let Some(node) = self.host.model().node(id) else {
            tracing::warn!(node = %id, "hide requested for unknown node");
            return;
        };
        if !node.visible {
            self.timers.cancel(&TimerKey::Hide(id.clone()));
            return;
        }
        let exit = node.disappear.clone().filter(|spec| animate && spec.total_ms() > 0.0);
        match exit {
            Some(spec) => {
                let spec = self.with_defaults(spec);
                self.host.play_animation(id, &spec, Phase::Exit);
                self.timers.schedule(self.now_ms + spec.total_ms(), TimerTask::CommitHide(id.clone()));
            }
            None => {
                self.timers.cancel(&TimerKey::Hide(id.clone()));
                if !self.host.update_node(id, &NodePatch::visibility(false)) {
                    tracing::warn!(node = %id, "host rejected hide");
                }
            }
        }
    }

    fn with_defaults(&self, mut spec: AnimationSpec) -> AnimationSpec {
        if spec.kind == AnimationKind::Pixelate && spec.steps.is_none() {
            spec.steps = Some(self.config.pixelate_steps);
        }
        spec
    }

    fn commit_pending_hides(&mut self) {
        for id in self.timers.pending_hides() {
            self.timers.cancel(&TimerKey::Hide(id.clone()));
            if !self.host.update_node(&id, &NodePatch::visibility(false)) {
                tracing::warn!(node = %id, "host rejected pending hide");
            }
        }
    }

    /// Advance the clock to `now_ms` and fire every timer that is due.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        if now_ms.is_finite() {
            self.now_ms = self.now_ms.max(now_ms);
        }
        let mut actions = Vec::new();
        for task in self.timers.take_due(self.now_ms) {
            self.fire(task, false, &mut actions);
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn fire(&mut self, task: TimerTask, immediate: bool, actions: &mut Vec<Action>) {
        match task {
            TimerTask::CommitHide(id) => {
                let patch = NodePatch::visibility(false);
                if self.host.update_node(&id, &patch) {
                    tracing::debug!(node = %id, "hide committed");
                    actions.push(Action::NodeUpdated { id, patch });
                } else {
                    tracing::warn!(node = %id, "host rejected timed hide");
                }
            }
            TimerTask::CameraStage { camera, duration_ms } => {
                if immediate {
                    self.host.set_camera(camera);
                } else {
                    self.host.transition_to_camera(camera, duration_ms);
                }
            }
        }
    }

    // --- Editing ---

    /// Re-derive the sequencer's per-view sets after the model was edited
    /// through [`Engine::host_mut`].
    pub fn refresh(&mut self) {
        self.sequencer.refresh(self.host.model());
        if self.selected.as_ref().is_some_and(|id| !self.host.model().contains(id)) {
            self.selected = None;
        }
    }

    /// Add a node, giving it a fresh id if its own is empty or taken. The node
    /// joins the current view's show set. Returns the id used.
    pub fn create_node(&mut self, node: Node) -> NodeId {
        let mut model = self.host.model().clone();
        let id = model.insert_node(node);
        if let Some(view) = self.sequencer.view_index().and_then(|i| model.views.get_mut(i)) {
            view.show.push(id.clone());
        }
        self.host.set_model(model);
        self.sequencer.refresh(self.host.model());
        tracing::debug!(node = %id, "node created");
        id
    }

    /// Delete a node and everything that refers to it. Returns false if the
    /// node doesn't exist.
    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        if !self.host.model().contains(id) {
            return false;
        }
        if self.drag.session().is_some_and(|s| &s.node_id == id) {
            self.drag = DragState::Idle;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.timers.cancel(&TimerKey::Hide(id.clone()));
        if self.host.session_active(id) {
            self.host.stop_session(id);
        }
        let mut model = self.host.model().clone();
        model.remove_node(id);
        self.host.set_model(model);
        self.sequencer.refresh(self.host.model());
        tracing::debug!(node = %id, "node deleted");
        true
    }

    /// Shut the engine down and hand back the host. A live drag is reverted,
    /// pending hides are committed, and a pending camera leg jumps to its
    /// destination, so the host is left in a settled state.
    pub fn dispose(mut self) -> H {
        let mut actions = Vec::new();
        self.abort_drag(&mut actions);
        for task in self.timers.drain() {
            self.fire(task, true, &mut actions);
        }
        tracing::debug!(reverted = !actions.is_empty(), "engine disposed");
        self.host
    }
}
