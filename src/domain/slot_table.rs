//! Static ownership of slot ids by vehicle category.
//!
//! The table is built once and shared behind an `Arc`; every screen that
//! needs to know which category a slot belongs to goes through it.

use std::{ops::RangeInclusive, sync::Arc, sync::OnceLock};

use thiserror::Error;

use super::category::VehicleCategory;

/// Closed interval of slot ids owned by one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRange {
    pub category: VehicleCategory,
    pub start: u32,
    pub end: u32,
}

impl SlotRange {
    pub const fn new(category: VehicleCategory, start: u32, end: u32) -> Self {
        Self {
            category,
            start,
            end,
        }
    }

    pub fn contains(&self, slot_id: u32) -> bool {
        (self.start..=self.end).contains(&slot_id)
    }

    pub fn capacity(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn ids(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    fn overlaps(&self, other: &SlotRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

const STANDARD_RANGES: [SlotRange; 6] = [
    SlotRange::new(VehicleCategory::Bikes, 1, 40),
    SlotRange::new(VehicleCategory::Cars, 41, 70),
    SlotRange::new(VehicleCategory::ThreeWheelers, 71, 80),
    SlotRange::new(VehicleCategory::Vans, 81, 90),
    SlotRange::new(VehicleCategory::Trucks, 91, 95),
    SlotRange::new(VehicleCategory::Lorries, 96, 100),
];

static STANDARD_TABLE: OnceLock<Arc<SlotRangeTable>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot {0} is outside every configured range")]
    OutOfRange(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeTableError {
    #[error("range {start}-{end} for {category} is empty or starts below 1")]
    InvalidBounds {
        category: VehicleCategory,
        start: u32,
        end: u32,
    },
    #[error("ranges for {first} and {second} overlap")]
    Overlap {
        first: VehicleCategory,
        second: VehicleCategory,
    },
    #[error("{0} is configured more than once")]
    DuplicateCategory(VehicleCategory),
}

/// Validated, sorted set of non-overlapping slot ranges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotRangeTable {
    ranges: Vec<SlotRange>,
}

impl SlotRangeTable {
    pub fn new(mut ranges: Vec<SlotRange>) -> Result<Self, RangeTableError> {
        for range in &ranges {
            if range.start == 0 || range.start > range.end {
                return Err(RangeTableError::InvalidBounds {
                    category: range.category,
                    start: range.start,
                    end: range.end,
                });
            }
        }

        for (idx, range) in ranges.iter().enumerate() {
            if ranges[..idx].iter().any(|r| r.category == range.category) {
                return Err(RangeTableError::DuplicateCategory(range.category));
            }
        }

        ranges.sort_by_key(|range| range.start);
        for pair in ranges.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(RangeTableError::Overlap {
                    first: pair[0].category,
                    second: pair[1].category,
                });
            }
        }

        Ok(Self { ranges })
    }

    /// The lot layout used by the parking service: 100 slots in six blocks.
    pub fn standard() -> Arc<SlotRangeTable> {
        STANDARD_TABLE
            .get_or_init(|| {
                Arc::new(
                    SlotRangeTable::new(STANDARD_RANGES.to_vec())
                        .expect("standard slot ranges are valid"),
                )
            })
            .clone()
    }

    pub fn classify(&self, slot_id: u32) -> Result<VehicleCategory, SlotError> {
        self.ranges
            .iter()
            .find(|range| range.contains(slot_id))
            .map(|range| range.category)
            .ok_or(SlotError::OutOfRange(slot_id))
    }

    pub fn range_for(&self, category: VehicleCategory) -> Option<&SlotRange> {
        self.ranges.iter().find(|range| range.category == category)
    }

    /// Zero when the category has no slots in this table.
    pub fn capacity(&self, category: VehicleCategory) -> u32 {
        self.range_for(category)
            .map(SlotRange::capacity)
            .unwrap_or(0)
    }

    pub fn total_capacity(&self) -> u32 {
        self.ranges.iter().map(SlotRange::capacity).sum()
    }

    pub fn slot_ids(&self, category: VehicleCategory) -> impl Iterator<Item = u32> {
        self.range_for(category)
            .map(SlotRange::ids)
            .into_iter()
            .flatten()
    }

    /// Ranges ordered by their first slot id.
    pub fn ranges(&self) -> &[SlotRange] {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_partitions_one_to_hundred() {
        let table = SlotRangeTable::standard();
        for slot_id in 1..=100 {
            let owners = table
                .ranges()
                .iter()
                .filter(|range| range.contains(slot_id))
                .count();
            assert_eq!(owners, 1, "slot {slot_id} must belong to exactly one range");
            assert!(table.classify(slot_id).is_ok());
        }
        assert_eq!(table.total_capacity(), 100);
    }

    #[test]
    fn boundaries_are_closed() {
        let table = SlotRangeTable::standard();
        assert_eq!(table.classify(1), Ok(VehicleCategory::Bikes));
        assert_eq!(table.classify(40), Ok(VehicleCategory::Bikes));
        assert_eq!(table.classify(41), Ok(VehicleCategory::Cars));
        assert_eq!(table.classify(70), Ok(VehicleCategory::Cars));
        assert_eq!(table.classify(71), Ok(VehicleCategory::ThreeWheelers));
        assert_eq!(table.classify(90), Ok(VehicleCategory::Vans));
        assert_eq!(table.classify(95), Ok(VehicleCategory::Trucks));
        assert_eq!(table.classify(96), Ok(VehicleCategory::Lorries));
        assert_eq!(table.classify(100), Ok(VehicleCategory::Lorries));
    }

    #[test]
    fn ids_outside_the_lot_are_rejected() {
        let table = SlotRangeTable::standard();
        assert_eq!(table.classify(0), Err(SlotError::OutOfRange(0)));
        assert_eq!(table.classify(101), Err(SlotError::OutOfRange(101)));
    }

    #[test]
    fn capacities_match_range_sizes() {
        let table = SlotRangeTable::standard();
        let expected = [
            (VehicleCategory::Bikes, 40),
            (VehicleCategory::Cars, 30),
            (VehicleCategory::ThreeWheelers, 10),
            (VehicleCategory::Vans, 10),
            (VehicleCategory::Trucks, 5),
            (VehicleCategory::Lorries, 5),
        ];
        for (category, capacity) in expected {
            assert_eq!(table.capacity(category), capacity);
            assert_eq!(table.slot_ids(category).count() as u32, capacity);
        }
    }

    #[test]
    fn custom_table_with_gaps_leaves_gap_unmapped() {
        let table = SlotRangeTable::new(vec![
            SlotRange::new(VehicleCategory::Cars, 11, 20),
            SlotRange::new(VehicleCategory::Bikes, 1, 5),
        ])
        .unwrap();
        assert_eq!(table.ranges()[0].category, VehicleCategory::Bikes);
        assert_eq!(table.classify(7), Err(SlotError::OutOfRange(7)));
        assert_eq!(table.capacity(VehicleCategory::Lorries), 0);
        assert_eq!(table.slot_ids(VehicleCategory::Lorries).count(), 0);
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let err = SlotRangeTable::new(vec![
            SlotRange::new(VehicleCategory::Bikes, 1, 10),
            SlotRange::new(VehicleCategory::Cars, 10, 20),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RangeTableError::Overlap {
                first: VehicleCategory::Bikes,
                second: VehicleCategory::Cars,
            }
        );
    }

    #[test]
    fn duplicate_and_inverted_ranges_are_rejected() {
        let duplicate = SlotRangeTable::new(vec![
            SlotRange::new(VehicleCategory::Vans, 1, 2),
            SlotRange::new(VehicleCategory::Vans, 5, 6),
        ]);
        assert_eq!(
            duplicate,
            Err(RangeTableError::DuplicateCategory(VehicleCategory::Vans))
        );

        let inverted = SlotRangeTable::new(vec![SlotRange::new(VehicleCategory::Vans, 9, 3)]);
        assert!(matches!(inverted, Err(RangeTableError::InvalidBounds { .. })));

        let zero = SlotRangeTable::new(vec![SlotRange::new(VehicleCategory::Vans, 0, 3)]);
        assert!(matches!(zero, Err(RangeTableError::InvalidBounds { .. })));
    }
}
