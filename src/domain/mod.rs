//! Parking domain: slot layout, occupancy and booking rules.

pub mod app_state;
pub mod category;
pub mod eligibility;
pub mod entities;
pub mod fee;
pub mod occupancy;
pub mod slot;
pub mod slot_table;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState};
#[allow(unused_imports)]
pub use category::VehicleCategory;
#[allow(unused_imports)]
pub use eligibility::{active_booking, check_eligibility, ensure_slot_free, EligibilityError};
#[allow(unused_imports)]
pub use entities::{Detection, ParkedVehicle, User};
#[allow(unused_imports)]
pub use fee::{estimate_fee, format_duration, ClearReceipt, FeeEstimate};
#[allow(unused_imports)]
pub use occupancy::{
    aggregate, slots_in_category, suggest_slot, CategoryOccupancy, OccupancyReport,
};
#[allow(unused_imports)]
pub use slot::{normalize_plate, Slot, SlotAction, SlotStatus};
#[allow(unused_imports)]
pub use slot_table::{RangeTableError, SlotError, SlotRange, SlotRangeTable};
