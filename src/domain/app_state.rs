use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::{
    category::VehicleCategory,
    entities::{Detection, ParkedVehicle, User},
    fee::DEFAULT_RATE_PER_HOUR,
    occupancy::{aggregate, OccupancyReport},
    slot::Slot,
    slot_table::SlotRangeTable,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub session: Option<User>,
    /// Shared layout of the lot; every screen classifies through this.
    pub table: Arc<SlotRangeTable>,
    pub slots: Vec<Slot>,
    pub slots_fetched_at: Option<SystemTime>,
    pub parked_vehicles: Vec<ParkedVehicle>,
    pub last_detection: Option<Detection>,
    pub rate_per_hour: f64,
    /// Base URL chosen in settings; overrides the environment.
    pub api_base_url: Option<String>,
    /// Last vehicle type seen per username. Login responses omit it.
    pub known_vehicle_types: BTreeMap<String, VehicleCategory>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            table: SlotRangeTable::standard(),
            slots: Vec::new(),
            slots_fetched_at: None,
            parked_vehicles: Vec::new(),
            last_detection: None,
            rate_per_hour: DEFAULT_RATE_PER_HOUR,
            api_base_url: None,
            known_vehicle_types: BTreeMap::new(),
        }
    }
}

impl AppState {
    pub fn occupancy(&self) -> OccupancyReport {
        aggregate(&self.table, &self.slots)
    }

    pub fn slot(&self, slot_id: u32) -> Option<&Slot> {
        self.slots.iter().rev().find(|slot| slot.slot_id == slot_id)
    }

    pub fn record_slots(&mut self, mut slots: Vec<Slot>, fetched_at: SystemTime) {
        slots.sort_by_key(|slot| slot.slot_id);
        self.slots = slots;
        self.slots_fetched_at = Some(fetched_at);
    }

    pub fn slots_stale(&self, ttl: Duration) -> bool {
        self.slots_fetched_at
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }

    /// Category from the user's profile, falling back to the range that
    /// holds their current booking.
    pub fn user_category(&self) -> Option<VehicleCategory> {
        let user = self.session.as_ref()?;
        if let Some(category) = user.vehicle_type {
            return Some(category);
        }
        let booking = super::eligibility::active_booking(&self.slots, &user.vehicle_plate)?;
        self.table.classify(booking.slot_id).ok()
    }

    /// Starts a session, filling in the remembered vehicle type when the
    /// service returned none.
    pub fn sign_in(&mut self, mut user: User) {
        match user.vehicle_type {
            Some(category) => {
                self.known_vehicle_types
                    .insert(user.username.clone(), category);
            }
            None => user.vehicle_type = self.known_vehicle_types.get(&user.username).copied(),
        }
        self.session = Some(user);
    }

    pub fn set_vehicle_type(&mut self, value: Option<VehicleCategory>) {
        let Some(user) = self.session.as_mut() else {
            return;
        };
        user.vehicle_type = value;
        match value {
            Some(category) => {
                self.known_vehicle_types
                    .insert(user.username.clone(), category);
            }
            None => {
                self.known_vehicle_types.remove(&user.username);
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.slots.clear();
        self.slots_fetched_at = None;
        self.parked_vehicles.clear();
        self.last_detection = None;
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.session = persisted.user;
        if let Some(rate) = persisted.rate_per_hour.filter(|rate| rate.is_finite() && *rate >= 0.0) {
            self.rate_per_hour = rate;
        }
        self.api_base_url = persisted.api_base_url;
        self.known_vehicle_types = persisted.vehicle_types;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            user: self.session.clone(),
            rate_per_hour: Some(self.rate_per_hour),
            api_base_url: self.api_base_url.clone(),
            vehicle_types: self.known_vehicle_types.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub rate_per_hour: Option<f64>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub vehicle_types: BTreeMap<String, VehicleCategory>,
}
