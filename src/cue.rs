//! Cue sequencing: per-view cue lists layered over a baseline visibility set.
//!
//! The sequencer is pure bookkeeping. It decides which visibility operations
//! a step or a baseline pass implies and leaves carrying them out (animations,
//! hide timers, host patches) to the engine.
//!
//! Within a view, `cue_index` counts how many of the view's cues have been
//! played. Stepping forward plays cue `cue_index` and advances; stepping back
//! undoes cue `cue_index - 1`: an enter is undone by hiding with the exit
//! animation, an exit by showing with the enter animation.

#[cfg(test)]
#[path = "cue_test.rs"]
mod cue_test;

use std::collections::HashSet;

use crate::doc::{AnimationKind, Cue, CueWhen, NodeId, PresentationModel};

/// Whether an animation brings a node in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Exit,
}

/// A visibility change the engine must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityOp {
    /// Make the node visible, playing its enter animation when `animate`.
    Show { id: NodeId, animate: bool },
    /// Hide the node, playing its exit animation first when `animate`.
    Hide { id: NodeId, animate: bool },
}

impl VisibilityOp {
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Show { id, .. } | Self::Hide { id, .. } => id,
        }
    }
}

/// What a step asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Play (or undo) one cue.
    Apply { cue: Cue, op: VisibilityOp },
    /// Leave the current view for `index`, landing at the end of its cue list
    /// when `at_end`.
    ToView { index: usize, at_end: bool },
    /// Nothing further in this direction.
    Boundary,
}

/// Playback position and the derived per-view sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequencer {
    view_index: Option<usize>,
    cue_index: usize,
    cues: Vec<Cue>,
    show_set: Vec<NodeId>,
    enter_controlled: HashSet<NodeId>,
    playing: bool,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view_index(&self) -> Option<usize> {
        self.view_index
    }

    #[must_use]
    pub fn cue_index(&self) -> usize {
        self.cue_index
    }

    /// The current view's cues, filtered to nodes it shows.
    #[must_use]
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    #[must_use]
    pub fn show_set(&self) -> &[NodeId] {
        &self.show_set
    }

    #[must_use]
    pub fn is_enter_controlled(&self, id: &NodeId) -> bool {
        self.enter_controlled.contains(id)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Make `index` the current view and rebuild its cue list and sets.
    /// The cue index starts at zero. Returns false if the view doesn't exist.
    pub fn enter_view(&mut self, model: &PresentationModel, index: usize) -> bool {
        let Some(view) = model.view(index) else {
            return false;
        };
        self.cues = model.cues_for_view(view);
        self.show_set = view.show.clone();
        self.enter_controlled = self
            .show_set
            .iter()
            .filter(|id| {
                let cued = self.cues.iter().any(|c| &c.node_id == *id && c.when == CueWhen::Enter);
                let appears = model
                    .node(id)
                    .and_then(|n| n.appear.as_ref())
                    .is_some_and(|a| a.kind == AnimationKind::Appear);
                cued || appears
            })
            .cloned()
            .collect();
        self.view_index = Some(index);
        self.cue_index = 0;
        true
    }

    /// Back to the first cue of the current view.
    pub fn rewind(&mut self) {
        self.cue_index = 0;
    }

    /// Refresh the cue list and sets after the model was edited.
    ///
    /// The position becomes the number of leading cues in the new list that
    /// were already played, so cues removed from the played prefix don't push
    /// an unplayed cue behind the position.
    pub fn refresh(&mut self, model: &PresentationModel) {
        let Some(index) = self.view_index else {
            return;
        };
        let played: Vec<Cue> = self.cues[..self.cue_index.min(self.cues.len())].to_vec();
        if self.enter_view(model, index) {
            self.cue_index = played_prefix_len(&self.cues, &played);
        } else {
            self.view_index = None;
            self.cue_index = 0;
            self.cues.clear();
            self.show_set.clear();
            self.enter_controlled.clear();
        }
    }

    /// Visibility operations that bring the show set to its baseline.
    ///
    /// Nodes that aren't enter-controlled become visible. Enter-controlled
    /// nodes that are hidden stay hidden; visible ones are hidden unless
    /// `preserve_existing`. Only nodes whose visibility would change get an
    /// operation, and none of them animate.
    #[must_use]
    pub fn baseline(&self, model: &PresentationModel, preserve_existing: bool) -> Vec<VisibilityOp> {
        let mut ops = Vec::new();
        for id in &self.show_set {
            let Some(node) = model.node(id) else {
                tracing::warn!(node = %id, "show list names unknown node");
                continue;
            };
            if !self.enter_controlled.contains(id) {
                if !node.visible {
                    ops.push(VisibilityOp::Show { id: id.clone(), animate: false });
                }
            } else if node.visible && !preserve_existing {
                ops.push(VisibilityOp::Hide { id: id.clone(), animate: false });
            }
        }
        ops
    }

    /// Operations that make every node in the show set visible (edit mode).
    #[must_use]
    pub fn reveal_all(&self, model: &PresentationModel) -> Vec<VisibilityOp> {
        self.show_set
            .iter()
            .filter(|id| model.node(id).is_some_and(|n| !n.visible))
            .map(|id| VisibilityOp::Show { id: id.clone(), animate: false })
            .collect()
    }

    /// Jump to the end of the cue list, returning the unanimated operations
    /// that reproduce every cue's effect in order.
    pub fn settle_at_end(&mut self) -> Vec<VisibilityOp> {
        self.cue_index = self.cues.len();
        self.cues.iter().map(|cue| forward_op(cue, false)).collect()
    }

    /// Advance one cue, or ask to move to the next view.
    pub fn step_forward(&mut self, view_count: usize) -> Step {
        if let Some(cue) = self.cues.get(self.cue_index).cloned() {
            self.cue_index += 1;
            let op = forward_op(&cue, true);
            return Step::Apply { cue, op };
        }
        match self.view_index {
            Some(index) if index + 1 < view_count => Step::ToView { index: index + 1, at_end: false },
            _ => Step::Boundary,
        }
    }

    /// Undo the last played cue, or ask to move to the previous view.
    pub fn step_back(&mut self) -> Step {
        if self.cue_index > 0 {
            if let Some(cue) = self.cues.get(self.cue_index - 1).cloned() {
                self.cue_index -= 1;
                let op = match cue.when {
                    CueWhen::Enter => VisibilityOp::Hide { id: cue.node_id.clone(), animate: true },
                    CueWhen::Exit => VisibilityOp::Show { id: cue.node_id.clone(), animate: true },
                };
                return Step::Apply { cue, op };
            }
        }
        match self.view_index {
            Some(index) if index > 0 => Step::ToView { index: index - 1, at_end: true },
            _ => Step::Boundary,
        }
    }
}

/// How many leading `cues` appear, in order, among `played`.
fn played_prefix_len(cues: &[Cue], played: &[Cue]) -> usize {
    let mut rest = played.iter();
    cues.iter().take_while(|cue| rest.any(|p| p == *cue)).count()
}

fn forward_op(cue: &Cue, animate: bool) -> VisibilityOp {
    match cue.when {
        CueWhen::Enter => VisibilityOp::Show { id: cue.node_id.clone(), animate },
        CueWhen::Exit => VisibilityOp::Hide { id: cue.node_id.clone(), animate },
    }
}
