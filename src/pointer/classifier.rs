//! Pointer status state machine
//!
//! Only the primary mouse button toggles contact for mice. Pens and touch
//! contacts have no separate button concept, so any press or release toggles
//! contact for them.

use crate::input::types::{PointerEventKind, PointerType, PRIMARY_BUTTON};
use crate::pointer::state::PointerStatus;

/// Status an event forces, or `None` when the event leaves status untouched
pub fn classify(kind: PointerEventKind, pointer_type: PointerType, button: i16) -> Option<PointerStatus> {
    let toggles_contact = pointer_type != PointerType::Mouse || button == PRIMARY_BUTTON;

    match kind {
        PointerEventKind::Down if toggles_contact => Some(PointerStatus::InContact),
        PointerEventKind::Up if toggles_contact => Some(PointerStatus::InProximity),
        PointerEventKind::Cancel => Some(PointerStatus::InProximity),
        PointerEventKind::Leave => Some(PointerStatus::None),
        PointerEventKind::Down
        | PointerEventKind::Up
        | PointerEventKind::Move
        | PointerEventKind::Enter
        | PointerEventKind::GotPointerCapture
        | PointerEventKind::LostPointerCapture => None,
    }
}

/// Apply one event to `current`
pub fn next_status(
    current: PointerStatus,
    pointer_type: PointerType,
    kind: PointerEventKind,
    button: i16,
) -> PointerStatus {
    classify(kind, pointer_type, button).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [PointerStatus; 3] = [
        PointerStatus::InContact,
        PointerStatus::InProximity,
        PointerStatus::None,
    ];

    #[test]
    fn test_mouse_primary_button_toggles_contact() {
        assert_eq!(
            classify(PointerEventKind::Down, PointerType::Mouse, 0),
            Some(PointerStatus::InContact)
        );
        assert_eq!(
            classify(PointerEventKind::Up, PointerType::Mouse, 0),
            Some(PointerStatus::InProximity)
        );
    }

    #[test]
    fn test_mouse_other_buttons_never_change_status() {
        for button in [1, 2, 3, 4, -1] {
            for current in ALL_STATUSES {
                assert_eq!(next_status(current, PointerType::Mouse, PointerEventKind::Down, button), current);
                assert_eq!(next_status(current, PointerType::Mouse, PointerEventKind::Up, button), current);
            }
        }
    }

    #[test]
    fn test_pen_and_touch_ignore_button() {
        for pointer_type in [PointerType::Pen, PointerType::Touch] {
            for button in [-1, 0, 1, 5] {
                assert_eq!(
                    classify(PointerEventKind::Down, pointer_type, button),
                    Some(PointerStatus::InContact)
                );
                assert_eq!(
                    classify(PointerEventKind::Up, pointer_type, button),
                    Some(PointerStatus::InProximity)
                );
            }
        }
    }

    #[test]
    fn test_cancel_and_leave_apply_to_every_device() {
        for pointer_type in [PointerType::Mouse, PointerType::Pen, PointerType::Touch] {
            assert_eq!(
                classify(PointerEventKind::Cancel, pointer_type, -1),
                Some(PointerStatus::InProximity)
            );
            assert_eq!(classify(PointerEventKind::Leave, pointer_type, -1), Some(PointerStatus::None));
        }
    }

    #[test]
    fn test_motion_and_capture_events_keep_status() {
        let passive = [
            PointerEventKind::Move,
            PointerEventKind::Enter,
            PointerEventKind::GotPointerCapture,
            PointerEventKind::LostPointerCapture,
        ];
        for kind in passive {
            for current in ALL_STATUSES {
                assert_eq!(next_status(current, PointerType::Touch, kind, 0), current);
            }
        }
    }
}
