//! Per-target pointer registry
//!
//! Maps pointer ids to their live state. States sit behind a shared lock so a
//! pull-mode consumer can hold a `PointerHandle` and watch it change, while
//! the registry stays the only writer.

use crate::input::types::{PointerId, PointerType, RawPointerEvent};
use crate::pointer::history::HistoryPolicy;
use crate::pointer::state::{PointerState, PointerStatus};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read-only live view of a tracked pointer
#[derive(Clone)]
pub struct PointerHandle {
    id: PointerId,
    state: Arc<RwLock<PointerState>>,
}

impl PointerHandle {
    fn new(state: PointerState) -> Self {
        Self {
            id: state.id(),
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn pointer_type(&self) -> PointerType {
        self.state.read().pointer_type()
    }

    pub fn status(&self) -> PointerStatus {
        self.state.read().status()
    }

    /// Borrow the current state; the registry is blocked until the guard drops
    pub fn read(&self) -> RwLockReadGuard<'_, PointerState> {
        self.state.read()
    }

    /// Deep copy of the current state
    pub fn snapshot(&self) -> PointerState {
        self.state.read().clone()
    }
}

impl fmt::Debug for PointerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHandle")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}

struct Entry {
    handle: PointerHandle,
    /// Insertion order, used to break timestamp ties
    seq: u64,
}

/// Result of folding one event into the registry
pub(crate) struct Upsert {
    pub handle: PointerHandle,
    /// True when the event opened a new session
    pub created: bool,
}

/// Owns every `PointerState` tracked for one target
pub struct PointerRegistry {
    entries: HashMap<PointerId, Entry>,
    next_seq: u64,
    policy: HistoryPolicy,
    max_pointers: Option<usize>,
}

impl PointerRegistry {
    pub fn new(policy: HistoryPolicy, max_pointers: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
            policy,
            max_pointers,
        }
    }

    /// Create or update the state for the event's pointer and return a copy of it
    pub fn upsert(&mut self, event: &RawPointerEvent) -> PointerState {
        self.upsert_tracked(event).handle.snapshot()
    }

    pub(crate) fn upsert_tracked(&mut self, event: &RawPointerEvent) -> Upsert {
        if let Some(entry) = self.entries.get(&event.pointer_id) {
            let mut state = entry.handle.state.write();
            check_identity(&state, event);
            state.apply(event, &self.policy);
            return Upsert {
                handle: entry.handle.clone(),
                created: false,
            };
        }

        if let Some(max) = self.max_pointers {
            while self.entries.len() >= max {
                if !self.evict_least_recent() {
                    break;
                }
            }
        }

        let handle = PointerHandle::new(PointerState::open(event, &self.policy));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            event.pointer_id,
            Entry {
                handle: handle.clone(),
                seq,
            },
        );

        tracing::debug!(
            pointer_id = event.pointer_id,
            pointer_type = %event.pointer_type,
            status = %handle.status(),
            "Tracking new pointer"
        );

        Upsert { handle, created: true }
    }

    /// Stop tracking a pointer, returning its final state
    pub fn remove(&mut self, pointer_id: PointerId) -> Option<PointerState> {
        let entry = self.entries.remove(&pointer_id)?;
        tracing::debug!(pointer_id, "Stopped tracking pointer");
        Some(entry.handle.snapshot())
    }

    /// Copies of all tracked states, most recently active first.
    ///
    /// Pointers with equal activity timestamps keep their insertion order.
    pub fn snapshot(&self) -> Vec<PointerState> {
        let mut ordered: Vec<(f64, u64, PointerState)> = self
            .entries
            .values()
            .map(|entry| {
                let state = entry.handle.snapshot();
                (state.last_activity(), entry.seq, state)
            })
            .collect();

        ordered.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        ordered.into_iter().map(|(_, _, state)| state).collect()
    }

    pub fn get(&self, pointer_id: PointerId) -> Option<PointerState> {
        self.entries.get(&pointer_id).map(|entry| entry.handle.snapshot())
    }

    pub fn handle(&self, pointer_id: PointerId) -> Option<PointerHandle> {
        self.entries.get(&pointer_id).map(|entry| entry.handle.clone())
    }

    pub fn contains(&self, pointer_id: PointerId) -> bool {
        self.entries.contains_key(&pointer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_least_recent(&mut self) -> bool {
        let victim = self
            .entries
            .iter()
            .map(|(id, entry)| (*id, entry.handle.read().last_activity(), entry.seq))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)))
            .map(|(id, _, _)| id);

        match victim {
            Some(pointer_id) => {
                self.entries.remove(&pointer_id);
                tracing::debug!(pointer_id, "Evicted least recently active pointer");
                true
            }
            None => false,
        }
    }
}

impl Default for PointerRegistry {
    fn default() -> Self {
        Self::new(HistoryPolicy::default(), None)
    }
}

/// Pointer ids must not be reused across device kinds within one session.
///
/// Debug builds abort; release builds log and keep the stored identity.
fn check_identity(state: &PointerState, event: &RawPointerEvent) {
    let matches = state.pointer_type() == event.pointer_type && state.is_primary() == event.is_primary;
    if !matches {
        tracing::error!(
            pointer_id = event.pointer_id,
            stored_type = %state.pointer_type(),
            event_type = %event.pointer_type,
            stored_primary = state.is_primary(),
            event_primary = event.is_primary,
            "Pointer identity changed within a session"
        );
    }
    debug_assert!(
        matches,
        "pointer {} changed identity within a session",
        event.pointer_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::PointerEventKind;

    fn event(kind: PointerEventKind, id: PointerId, pointer_type: PointerType, t: f64) -> RawPointerEvent {
        RawPointerEvent::new(kind, id, pointer_type, t)
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut registry = PointerRegistry::default();

        let created = registry.upsert(&event(PointerEventKind::Enter, 1, PointerType::Mouse, 0.0));
        assert_eq!(created.status(), PointerStatus::InProximity);
        assert_eq!(registry.len(), 1);

        let updated = registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Mouse, 1.0).with_button(0));
        assert_eq!(updated.status(), PointerStatus::InContact);
        assert_eq!(updated.history().len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mouse_press_sequence() {
        let mut registry = PointerRegistry::default();
        let statuses: Vec<PointerStatus> = [
            event(PointerEventKind::Down, 1, PointerType::Mouse, 0.0).with_button(0),
            event(PointerEventKind::Move, 1, PointerType::Mouse, 1.0),
            event(PointerEventKind::Up, 1, PointerType::Mouse, 2.0).with_button(0),
        ]
        .iter()
        .map(|e| registry.upsert(e).status())
        .collect();

        assert_eq!(
            statuses,
            vec![
                PointerStatus::InContact,
                PointerStatus::InContact,
                PointerStatus::InProximity
            ]
        );

        assert!(registry.remove(1).is_some());
        assert!(registry.get(1).is_none());
        assert!(registry.remove(1).is_none());
    }

    #[test]
    fn test_snapshot_orders_by_recent_activity() {
        let mut registry = PointerRegistry::default();
        registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Touch, 10.0));
        registry.upsert(&event(PointerEventKind::Down, 2, PointerType::Touch, 20.0));

        let ids: Vec<PointerId> = registry.snapshot().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![2, 1]);

        registry.upsert(&event(PointerEventKind::Move, 1, PointerType::Touch, 30.0));
        let ids: Vec<PointerId> = registry.snapshot().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_snapshot_ties_keep_insertion_order() {
        let mut registry = PointerRegistry::default();
        for id in [5, 3, 9] {
            registry.upsert(&event(PointerEventKind::Enter, id, PointerType::Pen, 4.0));
        }
        let ids: Vec<PointerId> = registry.snapshot().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn test_snapshot_is_a_deep_copy() {
        let mut registry = PointerRegistry::default();
        registry.upsert(&event(PointerEventKind::Enter, 1, PointerType::Pen, 0.0));
        let before = registry.snapshot();

        registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Pen, 1.0));

        assert_eq!(before[0].status(), PointerStatus::InProximity);
        assert_eq!(before[0].history().len(), 1);
        assert_eq!(registry.get(1).unwrap().status(), PointerStatus::InContact);
    }

    #[test]
    fn test_handle_tracks_live_state() {
        let mut registry = PointerRegistry::default();
        let upsert = registry.upsert_tracked(&event(PointerEventKind::Enter, 4, PointerType::Touch, 0.0));
        assert!(upsert.created);

        let again = registry.upsert_tracked(&event(PointerEventKind::Down, 4, PointerType::Touch, 1.0));
        assert!(!again.created);
        assert_eq!(upsert.handle.status(), PointerStatus::InContact);
        assert_eq!(upsert.handle.read().history().len(), 2);
    }

    #[test]
    fn test_history_respects_capacity() {
        let mut registry = PointerRegistry::new(
            HistoryPolicy {
                capacity: Some(3),
                expand_coalesced: false,
            },
            None,
        );
        for t in 0..10 {
            registry.upsert(&event(PointerEventKind::Move, 1, PointerType::Mouse, t as f64));
        }
        let state = registry.get(1).unwrap();
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.history()[0].time_stamp, 7.0);
    }

    #[test]
    fn test_max_pointers_evicts_least_recent() {
        let mut registry = PointerRegistry::new(HistoryPolicy::default(), Some(2));
        registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Touch, 1.0));
        registry.upsert(&event(PointerEventKind::Down, 2, PointerType::Touch, 2.0));
        registry.upsert(&event(PointerEventKind::Move, 1, PointerType::Touch, 3.0));
        registry.upsert(&event(PointerEventKind::Down, 3, PointerType::Touch, 4.0));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(1));
        assert!(!registry.contains(2));
        assert!(registry.contains(3));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut registry = PointerRegistry::default();
        registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Touch, 1.0));
        registry.upsert(&event(PointerEventKind::Down, 2, PointerType::Touch, 1.0));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "changed identity")]
    fn test_identity_change_aborts_in_debug() {
        let mut registry = PointerRegistry::default();
        registry.upsert(&event(PointerEventKind::Down, 1, PointerType::Touch, 1.0));
        registry.upsert(&event(PointerEventKind::Move, 1, PointerType::Pen, 2.0));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_identity_change_keeps_stored_identity_in_release() {
        let mut registry = PointerRegistry::default();
        registry.upsert(&event(PointerEventKind::Enter, 1, PointerType::Mouse, 1.0));

        // Classified as the stored mouse: a non-primary button leaves status alone
        let state = registry.upsert(
            &event(PointerEventKind::Down, 1, PointerType::Pen, 2.0)
                .with_button(2)
                .with_primary(false),
        );

        assert_eq!(state.status(), PointerStatus::InProximity);
        assert_eq!(state.pointer_type(), PointerType::Mouse);
        assert!(state.is_primary());
        assert_eq!(state.history().len(), 2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn kind_strategy() -> impl Strategy<Value = PointerEventKind> {
            prop_oneof![
                Just(PointerEventKind::Down),
                Just(PointerEventKind::Up),
                Just(PointerEventKind::Move),
                Just(PointerEventKind::Enter),
                Just(PointerEventKind::Cancel),
                Just(PointerEventKind::GotPointerCapture),
                Just(PointerEventKind::LostPointerCapture),
            ]
        }

        fn type_for(id: PointerId) -> PointerType {
            match id % 3 {
                0 => PointerType::Mouse,
                1 => PointerType::Pen,
                _ => PointerType::Touch,
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// Property: history never exceeds the configured capacity
            #[test]
            fn prop_history_bounded(
                capacity in 1usize..8,
                expand in any::<bool>(),
                steps in prop::collection::vec((0i32..4, kind_strategy(), -1i16..3, 0usize..5), 1..60),
            ) {
                let mut registry = PointerRegistry::new(
                    HistoryPolicy { capacity: Some(capacity), expand_coalesced: expand },
                    None,
                );
                for (t, (id, kind, button, samples)) in steps.into_iter().enumerate() {
                    let coalesced = (0..samples)
                        .map(|i| crate::input::types::MotionSample {
                            time_stamp: t as f64 + i as f64 / 10.0,
                            offset: Default::default(),
                            page: Default::default(),
                        })
                        .collect();
                    let state = registry.upsert(
                        &event(kind, id, type_for(id), t as f64)
                            .with_button(button)
                            .with_coalesced(coalesced),
                    );
                    prop_assert!(state.history().len() <= capacity);
                }
                for state in registry.snapshot() {
                    prop_assert!(state.history().len() <= capacity);
                }
            }

            /// Property: touch and pen presses always land in contact
            #[test]
            fn prop_touch_down_in_contact(
                button in any::<i16>(),
                prior in prop::collection::vec(kind_strategy(), 0..10),
                pen in any::<bool>(),
            ) {
                let pointer_type = if pen { PointerType::Pen } else { PointerType::Touch };
                let mut registry = PointerRegistry::default();
                for (t, kind) in prior.into_iter().enumerate() {
                    registry.upsert(&event(kind, 1, pointer_type, t as f64));
                }
                let state = registry.upsert(&event(PointerEventKind::Down, 1, pointer_type, 100.0).with_button(button));
                prop_assert_eq!(state.status(), PointerStatus::InContact);
            }
        }
    }
}
