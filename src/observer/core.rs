//! Event normalization shared by the callback and pull delivery modes

use crate::error::Result;
use crate::input::target::TargetId;
use crate::input::types::{PointerEventKind, PointerId, RawPointerEvent};
use crate::observer::options::{MoveCapture, ObserverOptions};
use crate::pointer::registry::{PointerHandle, PointerRegistry};
use crate::pointer::state::PointerState;
use serde::{Deserialize, Serialize};

/// Snapshot of one target delivered to observer callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerObserverEntry {
    pub target: TargetId,
    /// Tracked pointers, most recently active first
    pub pointers: Vec<PointerState>,
}

/// Outcome of an accepted event
pub(crate) struct Processed {
    pub pointer_id: PointerId,
    pub handle: PointerHandle,
    pub created: bool,
    /// The pointer left the target and must be evicted once delivery is done
    pub left: bool,
}

/// Registry plus the options that gate what reaches it
pub(crate) struct ObserverCore {
    target: TargetId,
    options: ObserverOptions,
    registry: PointerRegistry,
}

impl ObserverCore {
    pub fn new(target: TargetId, options: ObserverOptions) -> Result<Self> {
        options.validate()?;
        let registry = PointerRegistry::new(options.history_policy(), options.max_pointers);
        Ok(Self {
            target,
            options,
            registry,
        })
    }

    pub fn accepts(&self, event: &RawPointerEvent) -> bool {
        if !self.options.untrusted && !event.is_trusted {
            return false;
        }
        !(self.options.move_capture == MoveCapture::Ignore && event.kind == PointerEventKind::Move)
    }

    /// Fold `event` into the registry, or return `None` if it is filtered out
    pub fn process(&mut self, event: &RawPointerEvent) -> Option<Processed> {
        if !self.accepts(event) {
            tracing::trace!(
                target_id = %self.target,
                kind = %event.kind,
                pointer_id = event.pointer_id,
                trusted = event.is_trusted,
                "Ignoring pointer event"
            );
            return None;
        }

        tracing::trace!(
            target_id = %self.target,
            kind = %event.kind,
            pointer_id = event.pointer_id,
            "Pointer event"
        );

        let upsert = self.registry.upsert_tracked(event);
        Some(Processed {
            pointer_id: event.pointer_id,
            handle: upsert.handle,
            created: upsert.created,
            left: event.kind == PointerEventKind::Leave,
        })
    }

    /// Drop a pointer whose session ended
    pub fn evict(&mut self, pointer_id: PointerId) {
        self.registry.remove(pointer_id);
    }

    pub fn entry(&self) -> PointerObserverEntry {
        PointerObserverEntry {
            target: self.target,
            pointers: self.registry.snapshot(),
        }
    }

    pub fn snapshot(&self) -> Vec<PointerState> {
        self.registry.snapshot()
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }
}
