use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::category::VehicleCategory;

/// Logged-in user as returned by the login and register endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub vehicle_plate: String,
    #[serde(default)]
    pub vehicle_type: Option<VehicleCategory>,
}

/// Vehicle tracked by the gate: either booked in or physically parked.
#[derive(Clone, Debug, PartialEq)]
pub struct ParkedVehicle {
    pub id: String,
    pub license_plate: String,
    pub vehicle_type: Option<String>,
    pub parking_state: Option<String>,
    pub time_in: Option<OffsetDateTime>,
}

impl ParkedVehicle {
    pub fn is_parked(&self) -> bool {
        self.parking_state
            .as_deref()
            .map(|state| state.eq_ignore_ascii_case("parked"))
            .unwrap_or(false)
    }

    pub fn state_label(&self) -> &str {
        self.parking_state.as_deref().unwrap_or("Booked")
    }
}

/// What the recognition endpoint saw in an uploaded frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    pub vehicle_types: Vec<String>,
    pub recognized_plates: Vec<String>,
    /// Base64 PNG with bounding boxes drawn in.
    pub annotated_image: Option<String>,
    pub suggested_slot: Option<u32>,
    pub auto_parked: bool,
    pub message: Option<String>,
}

impl Detection {
    pub fn primary_plate(&self) -> Option<&str> {
        self.recognized_plates
            .iter()
            .map(|plate| plate.trim())
            .find(|plate| !plate.is_empty())
    }

    /// First detected vehicle class that maps onto a slot category.
    pub fn primary_category(&self) -> Option<VehicleCategory> {
        self.vehicle_types
            .iter()
            .find_map(|label| VehicleCategory::from_detector_label(label))
    }

    pub fn annotated_data_uri(&self) -> Option<String> {
        self.annotated_image
            .as_ref()
            .filter(|image| !image.is_empty())
            .map(|image| format!("data:image/png;base64,{image}"))
    }
}
