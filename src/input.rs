//! Input model: modifier keys, pointer events, and the drag state machine.
//!
//! `DragState` is the active gesture tracked between pointer-down and
//! pointer-up. Every active variant carries a [`DragSession`] with the
//! pre-drag snapshot of the node, so a cancel or a superseding drag can put
//! the node back exactly as it was.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{Node, NodeId, SegmentEnd};
use crate::geometry::{Point, Transform};
use crate::hit::{Handle, NodeFrame};
use crate::manipulate::{DragFrame, RotateGesture};

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held; enables grid and angle snapping.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Identifies one pointer (mouse, pen, or a single touch contact).
pub type PointerId = u32;

/// A pointer event in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub screen: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn new(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self { pointer_id, screen: Point::new(x, y), modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Context shared by every active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Pointer that owns the drag; events from other pointers are ignored.
    pub pointer_id: PointerId,
    pub node_id: NodeId,
    /// The node exactly as stored before the drag began.
    pub original: Node,
    /// Screen-space pointer position at pointer-down, or at the last rebase.
    pub start_screen: Point,
    /// Pointer position of the latest applied move.
    pub last_screen: Point,
    /// The node's frame in screen pixels at `start_screen`.
    pub start_frame: Transform,
    pub frame: DragFrame,
    /// Whether any pointer-move has changed the node yet.
    pub moved: bool,
}

impl DragSession {
    /// Total pointer travel since pointer-down.
    #[must_use]
    pub fn delta(&self, screen: Point) -> Point {
        screen - self.start_screen
    }
}

/// The drag state machine.
///
/// Every active state is entered from `Idle` and returns to `Idle` on
/// release or cancel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Translating a box.
    Move(DragSession),
    /// Dragging an edge or bottom-corner handle.
    Resize { session: DragSession, handle: Handle },
    /// Dragging a top-corner handle.
    Rotate { session: DragSession, gesture: RotateGesture },
    /// Dragging one end of a segment; `start` is that end in screen pixels.
    SegmentEndpoint { session: DragSession, end: SegmentEnd, start: Point },
    /// Translating a whole segment; `start` holds both ends in screen pixels.
    SegmentTranslate { session: DragSession, start: (Point, Point) },
}

impl DragState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Move(session)
            | Self::Resize { session, .. }
            | Self::Rotate { session, .. }
            | Self::SegmentEndpoint { session, .. }
            | Self::SegmentTranslate { session, .. } => Some(session),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Idle => None,
            Self::Move(session)
            | Self::Resize { session, .. }
            | Self::Rotate { session, .. }
            | Self::SegmentEndpoint { session, .. }
            | Self::SegmentTranslate { session, .. } => Some(session),
        }
    }

    /// Restart the gesture from the node's current `frame` at the last applied
    /// pointer position, under a new parent (or none). The pre-drag snapshot
    /// is kept so a cancel still restores the original values.
    pub fn rebase(&mut self, frame: &NodeFrame, parent_world: Option<Transform>) {
        match self {
            Self::Idle => return,
            Self::Rotate { session, gesture } => *gesture = RotateGesture::new(&frame.rect, session.last_screen),
            Self::SegmentEndpoint { end, start, .. } => {
                if let Some((a, b)) = frame.segment {
                    *start = if *end == SegmentEnd::A { a } else { b };
                }
            }
            Self::SegmentTranslate { start, .. } => {
                if let Some(segment) = frame.segment {
                    *start = segment;
                }
            }
            Self::Move(_) | Self::Resize { .. } => {}
        }
        if let Some(session) = self.session_mut() {
            session.start_screen = session.last_screen;
            session.start_frame = frame.rect;
            session.frame.parent_world = parent_world;
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move(_) => "move",
            Self::Resize { .. } => "resize",
            Self::Rotate { .. } => "rotate",
            Self::SegmentEndpoint { .. } => "segment-endpoint",
            Self::SegmentTranslate { .. } => "segment-translate",
        }
    }
}
