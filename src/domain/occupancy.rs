//! Occupancy counts derived from a snapshot of the slot list.
//!
//! Slot ids missing from the snapshot count as free: the service seeds every
//! slot up front, so an absent record means it was never taken. When the same
//! id appears more than once the last record wins.

use std::collections::BTreeMap;

use super::{
    category::VehicleCategory,
    slot::{Slot, SlotStatus},
    slot_table::SlotRangeTable,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryOccupancy {
    pub total: u32,
    pub occupied: u32,
    pub available: u32,
}

impl CategoryOccupancy {
    /// Share of the category in use, 0.0 when it has no capacity.
    pub fn utilisation(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.occupied as f64 / self.total as f64
        }
    }

    pub fn is_full(&self) -> bool {
        self.total > 0 && self.available == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyReport {
    /// Distinct, classifiable slot records in the snapshot.
    pub total: u32,
    /// Slots configured in the range table.
    pub capacity: u32,
    pub occupied_overall: u32,
    pub available_overall: u32,
    /// Records whose id falls outside the table.
    pub unmapped: u32,
    pub per_category: BTreeMap<VehicleCategory, CategoryOccupancy>,
}

impl OccupancyReport {
    pub fn category(&self, category: VehicleCategory) -> CategoryOccupancy {
        self.per_category
            .get(&category)
            .copied()
            .unwrap_or_default()
    }
}

pub fn aggregate(table: &SlotRangeTable, slots: &[Slot]) -> OccupancyReport {
    let latest = latest_status_by_id(slots);

    let mut per_category: BTreeMap<VehicleCategory, CategoryOccupancy> = table
        .ranges()
        .iter()
        .map(|range| {
            let total = range.capacity();
            (
                range.category,
                CategoryOccupancy {
                    total,
                    occupied: 0,
                    available: total,
                },
            )
        })
        .collect();

    let mut total = 0;
    let mut occupied_overall = 0;
    let mut unmapped = 0;

    for (&slot_id, status) in &latest {
        let Ok(category) = table.classify(slot_id) else {
            unmapped += 1;
            continue;
        };
        total += 1;
        if status.is_occupied() {
            occupied_overall += 1;
            if let Some(entry) = per_category.get_mut(&category) {
                entry.occupied += 1;
                entry.available = entry.total - entry.occupied;
            }
        }
    }

    let capacity = table.total_capacity();
    OccupancyReport {
        total,
        capacity,
        occupied_overall,
        available_overall: capacity.saturating_sub(occupied_overall),
        unmapped,
        per_category,
    }
}

/// Lowest slot id in the category's range that is free in the snapshot.
pub fn suggest_slot(
    table: &SlotRangeTable,
    category: VehicleCategory,
    slots: &[Slot],
) -> Option<u32> {
    let latest = latest_status_by_id(slots);
    table.slot_ids(category).find(|slot_id| {
        latest
            .get(slot_id)
            .map(|status| !status.is_occupied())
            .unwrap_or(true)
    })
}

/// Slots of one category, filling ids absent from the snapshot with free records.
pub fn slots_in_category(
    table: &SlotRangeTable,
    category: VehicleCategory,
    slots: &[Slot],
) -> Vec<Slot> {
    let mut by_id: BTreeMap<u32, &Slot> = BTreeMap::new();
    for slot in slots {
        by_id.insert(slot.slot_id, slot);
    }
    table
        .slot_ids(category)
        .map(|slot_id| {
            by_id
                .get(&slot_id)
                .map(|slot| (*slot).clone())
                .unwrap_or_else(|| Slot::free(slot_id))
        })
        .collect()
}

fn latest_status_by_id(slots: &[Slot]) -> BTreeMap<u32, SlotStatus> {
    let mut latest = BTreeMap::new();
    for slot in slots {
        latest.insert(slot.slot_id, slot.status);
    }
    latest
}
