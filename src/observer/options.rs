//! Observation settings
//!
//! All fields use `#[serde(default)]` so partial configs (and trace files
//! that omit options entirely) load with sensible defaults.

use crate::error::{ObserverError, Result};
use crate::pointer::history::{HistoryPolicy, DEFAULT_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};

/// What to do with `pointermove` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCapture {
    /// One motion record per move
    #[default]
    Record,
    /// One motion record per coalesced sub-sample of a move
    Coalesced,
    /// Drop moves before they reach the registry
    Ignore,
}

/// Per-target observation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Accept events the host did not mark as user-generated
    pub untrusted: bool,

    pub move_capture: MoveCapture,

    /// Motion records kept per pointer; `None` keeps everything
    pub history_capacity: Option<usize>,

    /// Pointers tracked at once; the least recently active is evicted first
    pub max_pointers: Option<usize>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            untrusted: false,
            move_capture: MoveCapture::default(),
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
            max_pointers: None,
        }
    }
}

impl ObserverOptions {
    pub fn with_untrusted(mut self, untrusted: bool) -> Self {
        self.untrusted = untrusted;
        self
    }

    pub fn with_move_capture(mut self, move_capture: MoveCapture) -> Self {
        self.move_capture = move_capture;
        self
    }

    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_max_pointers(mut self, max_pointers: Option<usize>) -> Self {
        self.max_pointers = max_pointers;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == Some(0) {
            return Err(ObserverError::Configuration(
                "historyCapacity must be at least 1".to_string(),
            ));
        }
        if self.max_pointers == Some(0) {
            return Err(ObserverError::Configuration(
                "maxPointers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn history_policy(&self) -> HistoryPolicy {
        HistoryPolicy {
            capacity: self.history_capacity,
            expand_coalesced: self.move_capture == MoveCapture::Coalesced,
        }
    }
}
