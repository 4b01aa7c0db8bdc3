use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Status of a slot as last reported by the parking service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Free,
    Booked,
    Parked,
}

impl SlotStatus {
    pub fn is_occupied(&self) -> bool {
        !matches!(self, SlotStatus::Free)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotStatus::Free => "FREE",
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Parked => "PARKED",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotStatus::Free => "free",
            SlotStatus::Booked => "booked",
            SlotStatus::Parked => "parked",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub slot_id: u32,
    pub status: SlotStatus,
    pub parked_vehicle_plate: Option<String>,
    pub parked_time: Option<OffsetDateTime>,
}

impl Slot {
    pub fn free(slot_id: u32) -> Self {
        Self {
            slot_id,
            status: SlotStatus::Free,
            parked_vehicle_plate: None,
            parked_time: None,
        }
    }

    pub fn booked(slot_id: u32, plate: impl Into<String>) -> Self {
        Self {
            slot_id,
            status: SlotStatus::Booked,
            parked_vehicle_plate: Some(plate.into()),
            parked_time: None,
        }
    }

    pub fn parked(slot_id: u32, plate: impl Into<String>, since: OffsetDateTime) -> Self {
        Self {
            slot_id,
            status: SlotStatus::Parked,
            parked_vehicle_plate: Some(plate.into()),
            parked_time: Some(since),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status.is_occupied()
    }
}

/// Transition a client may ask the service to perform on a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotAction {
    Book,
    Park,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action:?} a {from} slot")]
pub struct InvalidTransition {
    pub action: SlotAction,
    pub from: SlotStatus,
}

impl SlotAction {
    /// Status the slot ends up in, or the reason the service will refuse.
    pub fn apply(self, from: SlotStatus) -> Result<SlotStatus, InvalidTransition> {
        match (self, from) {
            (SlotAction::Book, SlotStatus::Free) => Ok(SlotStatus::Booked),
            (SlotAction::Park, SlotStatus::Booked) => Ok(SlotStatus::Parked),
            (SlotAction::Clear, SlotStatus::Booked | SlotStatus::Parked) => Ok(SlotStatus::Free),
            (action, from) => Err(InvalidTransition { action, from }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotAction::Book => "Book",
            SlotAction::Park => "Mark parked",
            SlotAction::Clear => "Clear slot",
        }
    }

    /// Actions a screen should offer for a slot in `status`.
    pub fn available_for(status: SlotStatus) -> &'static [SlotAction] {
        match status {
            SlotStatus::Free => &[SlotAction::Book],
            SlotStatus::Booked => &[SlotAction::Park, SlotAction::Clear],
            SlotStatus::Parked => &[SlotAction::Clear],
        }
    }
}

/// Uppercase alphanumerics only, so "ab-123 " and "AB123" compare equal.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_slot_lifecycle() {
        assert_eq!(SlotAction::Book.apply(SlotStatus::Free), Ok(SlotStatus::Booked));
        assert_eq!(SlotAction::Park.apply(SlotStatus::Booked), Ok(SlotStatus::Parked));
        assert_eq!(SlotAction::Clear.apply(SlotStatus::Booked), Ok(SlotStatus::Free));
        assert_eq!(SlotAction::Clear.apply(SlotStatus::Parked), Ok(SlotStatus::Free));
    }

    #[test]
    fn invalid_transitions_are_reported() {
        for (action, from) in [
            (SlotAction::Book, SlotStatus::Booked),
            (SlotAction::Book, SlotStatus::Parked),
            (SlotAction::Park, SlotStatus::Free),
            (SlotAction::Park, SlotStatus::Parked),
            (SlotAction::Clear, SlotStatus::Free),
        ] {
            assert_eq!(action.apply(from), Err(InvalidTransition { action, from }));
        }
    }

    #[test]
    fn offered_actions_are_all_valid() {
        for status in [SlotStatus::Free, SlotStatus::Booked, SlotStatus::Parked] {
            for action in SlotAction::available_for(status) {
                assert!(action.apply(status).is_ok());
            }
        }
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&SlotStatus::Parked).unwrap(), "\"parked\"");
        let status: SlotStatus = serde_json::from_str("\"booked\"").unwrap();
        assert_eq!(status, SlotStatus::Booked);
    }

    #[test]
    fn plates_normalize_for_comparison() {
        assert_eq!(normalize_plate(" ab-123 "), "AB123");
        assert_eq!(normalize_plate("WP CAB 4567"), "WPCAB4567");
        assert_eq!(normalize_plate(""), "");
    }
}
