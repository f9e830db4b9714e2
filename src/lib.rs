//! Pointer Observer - aggregated pointer state for UI event targets.
//!
//! Raw pointer notifications (down/up/move/enter/leave/cancel/capture) are
//! folded into one `PointerState` per pointer: contact/proximity status, last
//! position and a bounded motion history. State is delivered either through a
//! callback (`PointerObserver`) or pulled from a stream (`PointerWatcher`).

pub mod error;
pub mod input;
pub mod observer;
pub mod pointer;
pub mod replay;

pub use error::{ObserverError, Result};
pub use input::{
    ElementTarget, EventTarget, MotionSample, Point, PointerEventKind, PointerId, PointerType,
    RawPointerEvent, TargetId,
};
pub use observer::{
    MoveCapture, ObserverOptions, PointerObserver, PointerObserverEntry, PointerStream,
    PointerWatcher,
};
pub use pointer::{MotionRecord, PointerHandle, PointerRegistry, PointerState, PointerStatus};
