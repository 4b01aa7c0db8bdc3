use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vehicle class that owns a contiguous block of parking slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleCategory {
    Bikes,
    Cars,
    ThreeWheelers,
    Vans,
    Trucks,
    Lorries,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Bikes,
        VehicleCategory::Cars,
        VehicleCategory::ThreeWheelers,
        VehicleCategory::Vans,
        VehicleCategory::Trucks,
        VehicleCategory::Lorries,
    ];

    /// Name used on the wire and in persisted state.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bikes => "bikes",
            Self::Cars => "cars",
            Self::ThreeWheelers => "threeWheelers",
            Self::Vans => "vans",
            Self::Trucks => "trucks",
            Self::Lorries => "lorries",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bikes => "Bikes",
            Self::Cars => "Cars",
            Self::ThreeWheelers => "Three Wheelers",
            Self::Vans => "Vans",
            Self::Trucks => "Trucks",
            Self::Lorries => "Lorries",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Bikes => "🏍️",
            Self::Cars => "🚗",
            Self::ThreeWheelers => "🛺",
            Self::Vans => "🚐",
            Self::Trucks => "🚚",
            Self::Lorries => "🚛",
        }
    }

    /// Maps a class label emitted by the plate/vehicle detector.
    /// Buses share the heavy-vehicle truck bays.
    pub fn from_detector_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "bike" | "motorbike" | "motorcycle" => Some(Self::Bikes),
            "car" => Some(Self::Cars),
            "three wheeler" | "three-wheeler" | "threewheeler" => Some(Self::ThreeWheelers),
            "van" => Some(Self::Vans),
            "truck" | "bus" => Some(Self::Trucks),
            "lorry" => Some(Self::Lorries),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for VehicleCategory {
    type Err = UnknownCategory;

    /// Accepts the wire key or the display label, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.key().eq_ignore_ascii_case(needle)
                    || category.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_string(&VehicleCategory::ThreeWheelers).unwrap();
        assert_eq!(json, "\"threeWheelers\"");
        let parsed: VehicleCategory = serde_json::from_str("\"lorries\"").unwrap();
        assert_eq!(parsed, VehicleCategory::Lorries);
    }

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("cars".parse(), Ok(VehicleCategory::Cars));
        assert_eq!("Three Wheelers".parse(), Ok(VehicleCategory::ThreeWheelers));
        assert_eq!(" VANS ".parse(), Ok(VehicleCategory::Vans));
        assert!("boats".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn detector_labels_map_to_categories() {
        assert_eq!(
            VehicleCategory::from_detector_label("Lorry"),
            Some(VehicleCategory::Lorries)
        );
        assert_eq!(
            VehicleCategory::from_detector_label("three wheeler"),
            Some(VehicleCategory::ThreeWheelers)
        );
        assert_eq!(
            VehicleCategory::from_detector_label("bus"),
            Some(VehicleCategory::Trucks)
        );
        assert_eq!(VehicleCategory::from_detector_label("number plate"), None);
    }
}
