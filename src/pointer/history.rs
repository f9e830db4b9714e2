//! Bounded motion history

use crate::input::types::{PointerEventKind, RawPointerEvent};
use crate::pointer::state::MotionRecord;
use std::collections::VecDeque;

/// Default number of motion records kept per pointer
pub const DEFAULT_HISTORY_CAPACITY: usize = 6;

/// How motion records are produced and retained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPolicy {
    /// Maximum records kept per pointer; `None` keeps everything
    pub capacity: Option<usize>,
    /// Record each coalesced sub-sample of a move instead of one coarse record
    pub expand_coalesced: bool,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_HISTORY_CAPACITY),
            expand_coalesced: false,
        }
    }
}

/// Records contributed by one event, in order
pub(crate) fn motion_records(event: &RawPointerEvent, policy: &HistoryPolicy) -> Vec<MotionRecord> {
    let event_type = event.kind.as_str();

    if policy.expand_coalesced && event.kind == PointerEventKind::Move && !event.coalesced.is_empty() {
        return event
            .coalesced
            .iter()
            .map(|sample| MotionRecord {
                time_stamp: sample.time_stamp,
                event_type: event_type.to_string(),
                offset: sample.offset,
                page: sample.page,
                coalesced: true,
            })
            .collect();
    }

    vec![MotionRecord {
        time_stamp: event.time_stamp,
        event_type: event_type.to_string(),
        offset: event.offset,
        page: event.page,
        coalesced: false,
    }]
}

/// Append `record`, evicting the oldest entries beyond `capacity`
pub(crate) fn push_bounded(history: &mut VecDeque<MotionRecord>, record: MotionRecord, capacity: Option<usize>) {
    history.push_back(record);
    if let Some(capacity) = capacity {
        while history.len() > capacity {
            history.pop_front();
        }
    }
}
