//! Delayed engine work fired from `tick`.
//!
//! At most one timer exists per key: scheduling a key that is already pending
//! replaces it. Due timers fire in due-time order, ties in scheduling order.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use crate::camera::Camera;
use crate::doc::NodeId;

/// Work a timer performs when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTask {
    /// Commit a node hidden once its exit animation has played.
    CommitHide(NodeId),
    /// Start the second leg of a two-stage camera transition.
    CameraStage { camera: Camera, duration_ms: f64 },
}

/// Identity of a timer slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Hide(NodeId),
    Camera,
}

impl TimerTask {
    #[must_use]
    pub fn key(&self) -> TimerKey {
        match self {
            Self::CommitHide(id) => TimerKey::Hide(id.clone()),
            Self::CameraStage { .. } => TimerKey::Camera,
        }
    }
}

#[derive(Debug, Clone)]
struct Timer {
    due_ms: f64,
    seq: u64,
    task: TimerTask,
}

/// Pending timers, one per key.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` at `due_ms`, replacing any pending timer with the same key.
    /// Returns the replaced task, if any.
    pub fn schedule(&mut self, due_ms: f64, task: TimerTask) -> Option<TimerTask> {
        let replaced = self.cancel(&task.key());
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer { due_ms, seq, task });
        replaced
    }

    /// Remove the pending timer for `key`.
    pub fn cancel(&mut self, key: &TimerKey) -> Option<TimerTask> {
        let index = self.timers.iter().position(|t| &t.task.key() == key)?;
        Some(self.timers.remove(index).task)
    }

    #[must_use]
    pub fn is_pending(&self, key: &TimerKey) -> bool {
        self.timers.iter().any(|t| &t.task.key() == key)
    }

    /// Remove and return every task due at or before `now_ms`, in firing order.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<TimerTask> {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due_ms <= now_ms);
        self.timers = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Remove and return every pending task regardless of due time.
    pub fn drain(&mut self) -> Vec<TimerTask> {
        self.take_due(f64::INFINITY)
    }

    /// Ids of nodes with a pending hide.
    #[must_use]
    pub fn pending_hides(&self) -> Vec<NodeId> {
        self.timers
            .iter()
            .filter_map(|t| match &t.task {
                TimerTask::CommitHide(id) => Some(id.clone()),
                TimerTask::CameraStage { .. } => None,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
