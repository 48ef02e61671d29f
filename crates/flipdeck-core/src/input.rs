use web_time::Duration;

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Move,
    /// The platform took the pointer away (scroll parent, system gesture).
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub position: Vec2,
    /// Time since an arbitrary, monotonic origin shared by all events.
    pub timestamp: Duration,
}

impl PointerEvent {
    /// Touch event for the first pointer; handy for hosts with a single finger.
    pub fn touch(event: PointerEventKind, position: Vec2, timestamp: Duration) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Touch,
            event,
            position,
            timestamp,
        }
    }
}
