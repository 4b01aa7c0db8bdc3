//! Client-side booking checks.
//!
//! These only drive immediate feedback on the booking screen. The parking
//! service re-validates every booking and its answer is final.

use thiserror::Error;

use super::{
    category::VehicleCategory,
    slot::{normalize_plate, Slot, SlotStatus},
    slot_table::{SlotError, SlotRangeTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    #[error(transparent)]
    OutOfRange(#[from] SlotError),
    #[error("slot {slot_id} is reserved for {slot_category}, not {user_category}")]
    CategoryMismatch {
        slot_id: u32,
        slot_category: VehicleCategory,
        user_category: VehicleCategory,
    },
    #[error("plate {plate} already holds a booking on slot {slot_id}")]
    AlreadyBooked { plate: String, slot_id: u32 },
    #[error("slot {slot_id} is currently {status}")]
    SlotUnavailable { slot_id: u32, status: SlotStatus },
}

pub fn check_eligibility(
    table: &SlotRangeTable,
    user_category: VehicleCategory,
    target_slot_id: u32,
    existing_slots: &[Slot],
    user_plate: &str,
) -> Result<(), EligibilityError> {
    let slot_category = table.classify(target_slot_id)?;
    if slot_category != user_category {
        return Err(EligibilityError::CategoryMismatch {
            slot_id: target_slot_id,
            slot_category,
            user_category,
        });
    }

    if let Some(existing) = active_booking(existing_slots, user_plate) {
        return Err(EligibilityError::AlreadyBooked {
            plate: user_plate.to_string(),
            slot_id: existing.slot_id,
        });
    }

    Ok(())
}

/// The booked slot held by `plate`, if any.
pub fn active_booking<'a>(slots: &'a [Slot], plate: &str) -> Option<&'a Slot> {
    let wanted = normalize_plate(plate);
    if wanted.is_empty() {
        return None;
    }
    slots.iter().find(|slot| {
        slot.status == SlotStatus::Booked
            && slot
                .parked_vehicle_plate
                .as_deref()
                .map(|held| normalize_plate(held) == wanted)
                .unwrap_or(false)
    })
}

/// Rejects targets whose latest record is booked or parked. Unknown ids pass.
pub fn ensure_slot_free(slots: &[Slot], slot_id: u32) -> Result<(), EligibilityError> {
    let status = slots
        .iter()
        .rev()
        .find(|slot| slot.slot_id == slot_id)
        .map(|slot| slot.status)
        .unwrap_or(SlotStatus::Free);
    if status.is_occupied() {
        return Err(EligibilityError::SlotUnavailable { slot_id, status });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    #[test]
    fn car_driver_cannot_book_a_bike_slot() {
        let table = SlotRangeTable::standard();
        let result = check_eligibility(&table, VehicleCategory::Cars, 5, &[], "ABC123");
        assert_eq!(
            result,
            Err(EligibilityError::CategoryMismatch {
                slot_id: 5,
                slot_category: VehicleCategory::Bikes,
                user_category: VehicleCategory::Cars,
            })
        );
    }

    #[test]
    fn second_booking_for_the_same_plate_is_refused() {
        let table = SlotRangeTable::standard();
        let slots = vec![Slot::booked(12, "ABC123")];
        let result = check_eligibility(&table, VehicleCategory::Bikes, 5, &slots, "ABC123");
        assert_eq!(
            result,
            Err(EligibilityError::AlreadyBooked {
                plate: "ABC123".to_string(),
                slot_id: 12,
            })
        );
    }

    #[test]
    fn matching_category_without_booking_is_allowed() {
        let table = SlotRangeTable::standard();
        assert_eq!(
            check_eligibility(&table, VehicleCategory::Bikes, 5, &[], "ABC123"),
            Ok(())
        );
    }

    #[test]
    fn out_of_range_target_is_reported_before_anything_else() {
        let table = SlotRangeTable::standard();
        let slots = vec![Slot::booked(12, "ABC123")];
        let result = check_eligibility(&table, VehicleCategory::Bikes, 101, &slots, "ABC123");
        assert_eq!(
            result,
            Err(EligibilityError::OutOfRange(SlotError::OutOfRange(101)))
        );
    }

    #[test]
    fn parked_vehicle_does_not_count_as_active_booking() {
        let slots = vec![Slot::parked(7, "ABC123", OffsetDateTime::UNIX_EPOCH)];
        assert!(active_booking(&slots, "ABC123").is_none());
    }

    #[test]
    fn plate_comparison_ignores_formatting() {
        let slots = vec![Slot::booked(30, "abc-123")];
        assert_eq!(
            active_booking(&slots, "ABC 123").map(|slot| slot.slot_id),
            Some(30)
        );
        assert!(active_booking(&slots, "").is_none());
    }

    #[test]
    fn occupied_targets_are_unavailable() {
        let slots = vec![
            Slot::booked(3, "A1"),
            Slot::parked(4, "B2", OffsetDateTime::UNIX_EPOCH),
            Slot::free(5),
        ];
        assert_eq!(
            ensure_slot_free(&slots, 3),
            Err(EligibilityError::SlotUnavailable {
                slot_id: 3,
                status: SlotStatus::Booked,
            })
        );
        assert!(ensure_slot_free(&slots, 4).is_err());
        assert_eq!(ensure_slot_free(&slots, 5), Ok(()));
        assert_eq!(ensure_slot_free(&slots, 6), Ok(()));
    }
}
