//! Pointer state tracking
//!
//! `PointerState` is the per-pointer record, `classifier` decides status
//! transitions, `history` bounds the motion log and `PointerRegistry` owns
//! the states for a single target.

pub mod classifier;
pub mod history;
pub mod registry;
pub mod state;

pub use classifier::{classify, next_status};
pub use history::{HistoryPolicy, DEFAULT_HISTORY_CAPACITY};
pub use registry::{PointerHandle, PointerRegistry};
pub use state::{LastPosition, MotionRecord, PointerState, PointerStatus};
