use crate::input::types::{Point, PointerId, PointerType, RawPointerEvent};
use crate::pointer::classifier;
use crate::pointer::history::{self, HistoryPolicy};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;

/// Contact/proximity classification of a tracked pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerStatus {
    /// Pressed or touching
    InContact,
    /// Hovering over the target without pressing
    InProximity,
    /// Left the target's hit-test region; terminal for the session
    None,
}

impl fmt::Display for PointerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerStatus::InContact => write!(f, "in_contact"),
            PointerStatus::InProximity => write!(f, "in_proximity"),
            PointerStatus::None => write!(f, "none"),
        }
    }
}

/// One entry in a pointer's motion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionRecord {
    pub time_stamp: f64,
    /// Host name of the originating event, e.g. "pointermove"
    pub event_type: String,
    pub offset: Point,
    pub page: Point,
    /// Set when the record is a sub-sample of a coalesced move
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub coalesced: bool,
}

/// Last known position in element-local and page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LastPosition {
    pub offset: Point,
    pub page: Point,
}

/// Aggregated state of one pointer on one target
///
/// Instances are created and mutated only by `PointerRegistry`; everything
/// handed out to callers is either a clone or a read-only view.
///
/// Serialized output also carries the derived `isInContact` and
/// `isInProximity` flags; they are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerState {
    id: PointerId,
    #[serde(rename = "type")]
    pointer_type: PointerType,
    is_primary: bool,
    status: PointerStatus,
    last_position: LastPosition,
    last_activity: f64,
    history: VecDeque<MotionRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedPointerState<'a> {
    id: PointerId,
    #[serde(rename = "type")]
    pointer_type: PointerType,
    is_primary: bool,
    is_in_contact: bool,
    is_in_proximity: bool,
    status: PointerStatus,
    last_position: LastPosition,
    last_activity: f64,
    history: &'a VecDeque<MotionRecord>,
}

impl Serialize for PointerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializedPointerState {
            id: self.id,
            pointer_type: self.pointer_type,
            is_primary: self.is_primary,
            is_in_contact: self.is_in_contact(),
            is_in_proximity: self.is_in_proximity(),
            status: self.status,
            last_position: self.last_position,
            last_activity: self.last_activity,
            history: &self.history,
        }
        .serialize(serializer)
    }
}

impl PointerState {
    /// Start a session from the first event seen for a pointer id.
    ///
    /// Every session starts in proximity; the event itself is then applied,
    /// so a primary `pointerdown` yields a pointer already in contact.
    pub(crate) fn open(event: &RawPointerEvent, policy: &HistoryPolicy) -> Self {
        let mut state = Self {
            id: event.pointer_id,
            pointer_type: event.pointer_type,
            is_primary: event.is_primary,
            status: PointerStatus::InProximity,
            last_position: LastPosition::default(),
            last_activity: event.time_stamp,
            history: VecDeque::new(),
        };
        state.apply(event, policy);
        state
    }

    /// Fold one event into this state
    pub(crate) fn apply(&mut self, event: &RawPointerEvent, policy: &HistoryPolicy) {
        for record in history::motion_records(event, policy) {
            history::push_bounded(&mut self.history, record, policy.capacity);
        }
        self.status = classifier::next_status(self.status, self.pointer_type, event.kind, event.button);
        self.last_position = LastPosition {
            offset: event.offset,
            page: event.page,
        };
        self.last_activity = event.time_stamp;
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn pointer_type(&self) -> PointerType {
        self.pointer_type
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn status(&self) -> PointerStatus {
        self.status
    }

    pub fn is_in_contact(&self) -> bool {
        self.status == PointerStatus::InContact
    }

    /// True while hovering or in contact
    pub fn is_in_proximity(&self) -> bool {
        matches!(self.status, PointerStatus::InContact | PointerStatus::InProximity)
    }

    pub fn last_position(&self) -> LastPosition {
        self.last_position
    }

    /// Timestamp of the most recent event applied to this pointer
    pub fn last_activity(&self) -> f64 {
        self.last_activity
    }

    /// Motion records, oldest first
    pub fn history(&self) -> &VecDeque<MotionRecord> {
        &self.history
    }
}
