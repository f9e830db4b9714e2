//! Trace replay
//!
//! A trace is a JSON document holding observer options and an ordered list of
//! raw pointer events. Replaying it drives an `ElementTarget` observed by a
//! `PointerObserver` and collects every delivered entry.

use crate::error::{ObserverError, Result};
use crate::input::target::{ElementTarget, EventTarget};
use crate::input::types::RawPointerEvent;
use crate::observer::{ObserverOptions, PointerObserver, PointerObserverEntry};
use crate::pointer::state::PointerState;
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Recorded input for one target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    #[serde(default)]
    pub options: ObserverOptions,
    pub events: Vec<RawPointerEvent>,
}

impl Trace {
    pub fn from_json(json: &str) -> Result<Self> {
        let trace: Trace = serde_json::from_str(json)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let trace = Self::from_json(&content)?;
        tracing::debug!("Loaded trace {:?} ({} events)", path, trace.events.len());
        Ok(trace)
    }

    /// Options must be valid and timestamps must not go backwards
    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[1].time_stamp < pair[0].time_stamp {
                return Err(ObserverError::Trace(format!(
                    "event {} at {}ms is earlier than the previous event at {}ms",
                    index + 1,
                    pair[1].time_stamp,
                    pair[0].time_stamp
                )));
            }
        }
        Ok(())
    }
}

/// Everything observed while replaying a trace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub deliveries: Vec<PointerObserverEntry>,
    /// Pointers still tracked after the last event
    pub final_pointers: Vec<PointerState>,
}

pub fn replay(trace: &Trace) -> Result<ReplayOutcome> {
    let target = ElementTarget::new();
    let deliveries = Arc::new(ParkingMutex::new(Vec::new()));

    let sink = deliveries.clone();
    let observer = PointerObserver::new(move |entry: &PointerObserverEntry| {
        sink.lock().push(entry.clone());
    });
    observer.observe(&target, trace.options.clone())?;

    for event in &trace.events {
        target.dispatch(event);
    }

    let final_pointers = observer.snapshot(target.target_id()).unwrap_or_default();
    observer.unobserve(target.target_id());

    let deliveries = std::mem::take(&mut *deliveries.lock());
    tracing::info!(
        "Replayed {} events ({} deliveries, {} pointers remaining)",
        trace.events.len(),
        deliveries.len(),
        final_pointers.len()
    );

    Ok(ReplayOutcome {
        deliveries,
        final_pointers,
    })
}
