use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer identifier as reported by the input source
pub type PointerId = i32;

/// Button index of the primary (usually left) mouse button
pub const PRIMARY_BUTTON: i16 = 0;

/// Device kind that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

impl fmt::Display for PointerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerType::Mouse => write!(f, "mouse"),
            PointerType::Pen => write!(f, "pen"),
            PointerType::Touch => write!(f, "touch"),
        }
    }
}

/// Raw pointer event kinds, named as the host reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEventKind {
    #[serde(rename = "gotpointercapture")]
    GotPointerCapture,
    #[serde(rename = "lostpointercapture")]
    LostPointerCapture,
    #[serde(rename = "pointercancel")]
    Cancel,
    #[serde(rename = "pointerdown")]
    Down,
    #[serde(rename = "pointerenter")]
    Enter,
    #[serde(rename = "pointerleave")]
    Leave,
    #[serde(rename = "pointermove")]
    Move,
    #[serde(rename = "pointerup")]
    Up,
}

impl PointerEventKind {
    /// Every kind an observer subscribes to on its target.
    ///
    /// `pointerover`/`pointerout` are left out: they fire again for every
    /// descendant the pointer crosses.
    pub const OBSERVED: [PointerEventKind; 8] = [
        PointerEventKind::GotPointerCapture,
        PointerEventKind::LostPointerCapture,
        PointerEventKind::Cancel,
        PointerEventKind::Down,
        PointerEventKind::Enter,
        PointerEventKind::Leave,
        PointerEventKind::Move,
        PointerEventKind::Up,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PointerEventKind::GotPointerCapture => "gotpointercapture",
            PointerEventKind::LostPointerCapture => "lostpointercapture",
            PointerEventKind::Cancel => "pointercancel",
            PointerEventKind::Down => "pointerdown",
            PointerEventKind::Enter => "pointerenter",
            PointerEventKind::Leave => "pointerleave",
            PointerEventKind::Move => "pointermove",
            PointerEventKind::Up => "pointerup",
        }
    }
}

impl fmt::Display for PointerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Finer-grained motion sample from a batched (coalesced) move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSample {
    pub time_stamp: f64,
    /// Element-local coordinates
    pub offset: Point,
    /// Page-relative coordinates
    pub page: Point,
}

/// One raw pointer notification from the input source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPointerEvent {
    #[serde(rename = "type")]
    pub kind: PointerEventKind,
    pub pointer_id: PointerId,
    pub pointer_type: PointerType,
    #[serde(default = "primary")]
    pub is_primary: bool,
    /// Button that changed state; -1 when none did
    #[serde(default = "no_button")]
    pub button: i16,
    #[serde(default)]
    pub offset: Point,
    #[serde(default)]
    pub page: Point,
    #[serde(default = "trusted")]
    pub is_trusted: bool,
    pub time_stamp: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coalesced: Vec<MotionSample>,
}

fn no_button() -> i16 {
    -1
}

fn trusted() -> bool {
    true
}

fn primary() -> bool {
    true
}

impl RawPointerEvent {
    /// Build a trusted event with no button change and no coalesced samples
    pub fn new(
        kind: PointerEventKind,
        pointer_id: PointerId,
        pointer_type: PointerType,
        time_stamp: f64,
    ) -> Self {
        Self {
            kind,
            pointer_id,
            pointer_type,
            is_primary: primary(),
            button: no_button(),
            offset: Point::default(),
            page: Point::default(),
            is_trusted: true,
            time_stamp,
            coalesced: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn with_trusted(mut self, is_trusted: bool) -> Self {
        self.is_trusted = is_trusted;
        self
    }

    /// Set element-local and page position to the same point
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.offset = Point::new(x, y);
        self.page = Point::new(x, y);
        self
    }

    pub fn with_page(mut self, x: f64, y: f64) -> Self {
        self.page = Point::new(x, y);
        self
    }

    pub fn with_coalesced(mut self, samples: Vec<MotionSample>) -> Self {
        self.coalesced = samples;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_uses_host_names() {
        let json = serde_json::to_string(&PointerEventKind::Down).unwrap();
        assert_eq!(json, "\"pointerdown\"");

        let kind: PointerEventKind = serde_json::from_str("\"lostpointercapture\"").unwrap();
        assert_eq!(kind, PointerEventKind::LostPointerCapture);
        assert_eq!(kind.to_string(), "lostpointercapture");
    }

    #[test]
    fn test_raw_event_defaults() {
        let event: RawPointerEvent = serde_json::from_str(
            r#"{"type":"pointermove","pointerId":3,"pointerType":"pen","timeStamp":12.5}"#,
        )
        .unwrap();

        assert_eq!(event.kind, PointerEventKind::Move);
        assert_eq!(event.pointer_type, PointerType::Pen);
        assert_eq!(event.button, -1);
        assert!(event.is_trusted);
        assert!(event.is_primary);
        assert!(event.coalesced.is_empty());
    }

    #[test]
    fn test_deserialized_identity_matches_constructor() {
        let parsed: RawPointerEvent = serde_json::from_str(
            r#"{"type":"pointerdown","pointerId":1,"pointerType":"touch","timeStamp":4.0}"#,
        )
        .unwrap();
        let built = RawPointerEvent::new(PointerEventKind::Down, 1, PointerType::Touch, 4.0);

        assert_eq!(parsed, built);
    }
}
