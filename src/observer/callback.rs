//! Callback delivery
//!
//! Every accepted event produces exactly one synchronous call with the full,
//! ordered snapshot of the target it was dispatched on.

use crate::error::{ObserverError, Result};
use crate::input::target::{EventTarget, PointerListener, TargetId};
use crate::input::types::{PointerEventKind, RawPointerEvent};
use crate::observer::core::{ObserverCore, PointerObserverEntry};
use crate::observer::options::ObserverOptions;
use crate::pointer::state::PointerState;
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Callback receiving a target's snapshot after each accepted event
pub type ObserverCallback = Arc<dyn Fn(&PointerObserverEntry) + Send + Sync>;

struct Observation {
    signal: CancellationToken,
    core: Arc<ParkingMutex<ObserverCore>>,
}

/// Watches any number of targets and reports their pointers to one callback
pub struct PointerObserver {
    callback: ObserverCallback,
    observations: ParkingMutex<HashMap<TargetId, Observation>>,
}

impl PointerObserver {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&PointerObserverEntry) + Send + Sync + 'static,
    {
        Self::with_callback(Arc::new(callback))
    }

    pub fn builder() -> PointerObserverBuilder {
        PointerObserverBuilder::default()
    }

    fn with_callback(callback: ObserverCallback) -> Self {
        Self {
            callback,
            observations: ParkingMutex::new(HashMap::new()),
        }
    }

    /// Start observing `target` with a fresh, empty registry.
    ///
    /// Observing a target twice replaces the earlier observation and its state.
    pub fn observe<T>(&self, target: &T, options: ObserverOptions) -> Result<()>
    where
        T: EventTarget + ?Sized,
    {
        let target_id = target.target_id();
        let core = Arc::new(ParkingMutex::new(ObserverCore::new(target_id, options)?));
        let signal = CancellationToken::new();

        let previous = self.observations.lock().insert(
            target_id,
            Observation {
                signal: signal.clone(),
                core: core.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.signal.cancel();
            tracing::debug!(target_id = %target_id, "Replaced existing observation");
        }

        let listener = Self::listener(core, signal.clone(), self.callback.clone());
        for kind in PointerEventKind::OBSERVED {
            target.add_listener(kind, listener.clone(), signal.clone());
        }

        tracing::info!(target_id = %target_id, "Observing pointer events");
        Ok(())
    }

    fn listener(
        core: Arc<ParkingMutex<ObserverCore>>,
        signal: CancellationToken,
        callback: ObserverCallback,
    ) -> PointerListener {
        Arc::new(move |event: &RawPointerEvent| {
            if signal.is_cancelled() {
                return;
            }

            // Snapshot under the lock, deliver outside it so the callback may
            // call back into the observer.
            let entry = {
                let mut core = core.lock();
                let Some(processed) = core.process(event) else {
                    return;
                };
                let entry = core.entry();
                if processed.left {
                    core.evict(processed.pointer_id);
                }
                entry
            };

            if signal.is_cancelled() {
                return;
            }
            callback(&entry);
        })
    }

    /// Stop observing `target` and discard its state. Unknown targets are ignored.
    pub fn unobserve(&self, target_id: TargetId) {
        if let Some(observation) = self.observations.lock().remove(&target_id) {
            observation.signal.cancel();
            tracing::info!(target_id = %target_id, "Stopped observing pointer events");
        }
    }

    /// Stop observing every target
    pub fn disconnect(&self) {
        let drained: Vec<(TargetId, Observation)> = self.observations.lock().drain().collect();
        for (target_id, observation) in drained {
            observation.signal.cancel();
            tracing::info!(target_id = %target_id, "Stopped observing pointer events");
        }
    }

    pub fn is_observing(&self, target_id: TargetId) -> bool {
        self.observations.lock().contains_key(&target_id)
    }

    /// Current pointers for `target_id`, most recently active first
    pub fn snapshot(&self, target_id: TargetId) -> Option<Vec<PointerState>> {
        let core = self.observations.lock().get(&target_id).map(|o| o.core.clone())?;
        let pointers = core.lock().snapshot();
        Some(pointers)
    }
}

impl Drop for PointerObserver {
    fn drop(&mut self) {
        for observation in self.observations.get_mut().values() {
            observation.signal.cancel();
        }
    }
}

/// Builder that validates the delivery target before any observation starts
#[derive(Default)]
pub struct PointerObserverBuilder {
    callback: Option<ObserverCallback>,
}

impl PointerObserverBuilder {
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PointerObserverEntry) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Result<PointerObserver> {
        let callback = self.callback.ok_or_else(|| {
            ObserverError::Configuration("PointerObserver requires a callback".to_string())
        })?;
        Ok(PointerObserver::with_callback(callback))
    }
}
