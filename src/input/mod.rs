//! Input side: raw pointer events and the targets that dispatch them
//!
//! The input source and the registration surface are external collaborators.
//! This module defines the narrow types the observer consumes from them, plus
//! `ElementTarget`, an in-memory target used by the replay tool and tests.

pub mod target;
pub mod types;

pub use target::{ElementTarget, EventTarget, PointerListener, TargetId};
pub use types::{
    MotionSample, Point, PointerEventKind, PointerId, PointerType, RawPointerEvent, PRIMARY_BUTTON,
};
