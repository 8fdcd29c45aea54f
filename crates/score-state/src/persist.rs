use std::fs;
use std::path::Path;

use crate::error::StateError;
use crate::types::State;

const STATE_FILE_NAME: &str = "state.yaml";

/// Atomically write `state` into `<dir>/state.yaml` (spec §4.9).
///
/// Ensures `dir` and the state's mounts directory both exist, encodes to a
/// temp file, then renames over the final path so a crash mid-write leaves
/// either the previous or the new version intact.
pub fn persist(state: &State, dir: &Path) -> Result<(), StateError> {
    fs::create_dir_all(dir).map_err(|source| StateError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    fs::create_dir_all(&state.mounts_directory).map_err(|source| StateError::Write {
        path: state.mounts_directory.clone(),
        source,
    })?;

    let encoded = serde_yaml::to_string(state).map_err(StateError::Encode)?;

    let final_path = dir.join(STATE_FILE_NAME);
    let temp_path = dir.join(format!("{STATE_FILE_NAME}.temp"));

    fs::write(&temp_path, encoded).map_err(|source| StateError::Write {
        path: temp_path.display().to_string(),
        source,
    })?;
    fs::rename(&temp_path, &final_path).map_err(|source| StateError::Write {
        path: final_path.display().to_string(),
        source,
    })?;

    Ok(())
}

/// Load the state document from `<dir>/state.yaml` (spec §4.9).
///
/// Unknown top-level or nested fields are rejected: `State`,
/// `ScoreWorkloadState` and `ScoreResourceState` all derive
/// `#[serde(deny_unknown_fields)]`.
pub fn load(dir: &Path) -> Result<State, StateError> {
    let path = dir.join(STATE_FILE_NAME);
    if !path.exists() {
        return Err(StateError::NotPresent(path.display().to_string()));
    }
    let raw = fs::read_to_string(&path).map_err(|source| StateError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| StateError::Decode {
        path: path.display().to_string(),
        source,
    })
}
