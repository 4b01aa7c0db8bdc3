use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "ParkVision";
const APP_NAME: &str = "ParkVision";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("state.json"))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    load_persisted_state_from(&data_file()?)
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_persisted_state_to(&path, state)
}

/// Missing or unreadable files count as "nothing saved yet".
pub fn load_persisted_state_from(path: &Path) -> Option<PersistedState> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => {
            debug!(path = %path.display(), "loaded saved session");
            Some(state)
        }
        Err(err) => {
            warn!(path = %path.display(), "ignoring corrupt state file: {err}");
            None
        }
    }
}

pub fn save_persisted_state_to(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, VehicleCategory};

    #[test]
    fn state_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = PersistedState {
            user: Some(User {
                username: "dilani".into(),
                vehicle_plate: "WP-KA-2231".into(),
                vehicle_type: Some(VehicleCategory::ThreeWheelers),
            }),
            rate_per_hour: Some(15.0),
            api_base_url: Some("http://192.168.1.2:8000/".into()),
            vehicle_types: Default::default(),
        };

        save_persisted_state_to(&path, &state).unwrap();
        assert_eq!(load_persisted_state_from(&path), Some(state));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_persisted_state_from(&dir.path().join("absent.json")), None);
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_persisted_state_from(&path), None);
    }

    #[test]
    fn older_files_without_new_fields_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"user":null}"#).unwrap();
        assert_eq!(
            load_persisted_state_from(&path),
            Some(PersistedState::default())
        );
    }
}
