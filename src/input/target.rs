//! Registration surface for pointer listeners
//!
//! An `EventTarget` accepts listeners per event kind. Every listener is tied
//! to a `CancellationToken`; cancelling the token detaches all listeners that
//! were registered with it in one step.

use crate::input::types::{PointerEventKind, RawPointerEvent};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Listener invoked for every dispatched event of the kind it registered for
pub type PointerListener = Arc<dyn Fn(&RawPointerEvent) + Send + Sync>;

/// Opaque identity of an observed target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Anything pointer listeners can be attached to
pub trait EventTarget {
    /// Stable identity used to key per-target state
    fn target_id(&self) -> TargetId;

    /// Attach `listener` for `kind` until `signal` is cancelled
    fn add_listener(&self, kind: PointerEventKind, listener: PointerListener, signal: CancellationToken);
}

struct Registration {
    kind: PointerEventKind,
    listener: PointerListener,
    signal: CancellationToken,
}

/// In-memory event target that dispatches events synchronously
///
/// Clones share the same listener table.
#[derive(Clone)]
pub struct ElementTarget {
    id: TargetId,
    registrations: Arc<ParkingMutex<Vec<Registration>>>,
}

impl ElementTarget {
    pub fn new() -> Self {
        Self {
            id: TargetId::new(),
            registrations: Arc::new(ParkingMutex::new(Vec::new())),
        }
    }

    /// Deliver `event` to every live listener registered for its kind.
    ///
    /// Listeners run after the table lock is released, so a listener may
    /// register or cancel listeners on this same target.
    pub fn dispatch(&self, event: &RawPointerEvent) {
        let listeners: Vec<(PointerListener, CancellationToken)> = {
            let mut registrations = self.registrations.lock();
            registrations.retain(|r| !r.signal.is_cancelled());
            registrations
                .iter()
                .filter(|r| r.kind == event.kind)
                .map(|r| (r.listener.clone(), r.signal.clone()))
                .collect()
        };

        for (listener, signal) in listeners {
            // An earlier listener in this dispatch may have cancelled it
            if signal.is_cancelled() {
                continue;
            }
            listener(event);
        }
    }

    /// Number of listeners still attached
    pub fn listener_count(&self) -> usize {
        let mut registrations = self.registrations.lock();
        registrations.retain(|r| !r.signal.is_cancelled());
        registrations.len()
    }
}

impl Default for ElementTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementTarget")
            .field("id", &self.id)
            .field("listeners", &self.registrations.lock().len())
            .finish()
    }
}

impl EventTarget for ElementTarget {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn add_listener(&self, kind: PointerEventKind, listener: PointerListener, signal: CancellationToken) {
        if signal.is_cancelled() {
            return;
        }
        let mut registrations = self.registrations.lock();
        registrations.retain(|r| !r.signal.is_cancelled());
        registrations.push(Registration {
            kind,
            listener,
            signal,
        });
    }
}
