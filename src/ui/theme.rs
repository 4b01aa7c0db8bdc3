//! CSS class helpers so pages agree on how slots and states look.

use crate::domain::{Slot, SlotAction, SlotStatus};

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "btn btn-active"
    } else {
        "btn"
    }
}

pub fn slot_tile(slot: &Slot, mine: bool) -> String {
    let mut class = format!("slot {}", status_key(slot.status));
    if mine {
        class.push_str(" mine");
    }
    class
}

pub fn status_badge(status: SlotStatus) -> String {
    format!("badge {}", status_key(status))
}

pub fn vehicle_badge(parked: bool) -> String {
    status_badge(if parked {
        SlotStatus::Parked
    } else {
        SlotStatus::Booked
    })
}

pub fn message(success: bool) -> &'static str {
    if success {
        "message success"
    } else {
        "message error"
    }
}

pub fn action_button(action: SlotAction) -> &'static str {
    match action {
        SlotAction::Clear => "btn btn-danger",
        SlotAction::Book | SlotAction::Park => "btn btn-primary",
    }
}

pub fn occupancy_bar(full: bool) -> &'static str {
    if full {
        "bar full"
    } else {
        "bar"
    }
}

fn status_key(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Free => "free",
        SlotStatus::Booked => "booked",
        SlotStatus::Parked => "parked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_booking_is_highlighted() {
        let slot = Slot::booked(12, "CAB-1");
        assert_eq!(slot_tile(&slot, true), "slot booked mine");
        assert_eq!(slot_tile(&Slot::free(3), false), "slot free");
    }
}
