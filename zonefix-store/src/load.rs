use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use thiserror::Error;
use tracing::debug;
use zonefix_types::wire::WorkoutV1;
use zonefix_types::workout::WorkoutId;

#[derive(Debug, Clone)]
pub struct LoadedWorkout {
    pub path: Utf8PathBuf,
    pub workout: Result<WorkoutV1, StoreError>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("workout {id} not found")]
    NotFound { id: WorkoutId },
}

pub fn workout_path(dir: &Utf8Path, id: WorkoutId) -> Utf8PathBuf {
    dir.join(format!("{id}.json"))
}

/// Load every `*.json` document directly under `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn scan_workouts(dir: &Utf8Path) -> anyhow::Result<Vec<LoadedWorkout>> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning store for workouts");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob <store>/*.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        let utf8_path = Utf8PathBuf::from(path);
        let workout = read_document(&utf8_path);
        out.push(LoadedWorkout {
            path: utf8_path,
            workout,
        });
    }

    // Deterministic order matters.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

pub fn load_workout(dir: &Utf8Path, id: WorkoutId) -> Result<WorkoutV1, StoreError> {
    let path = workout_path(dir, id);
    if !path.is_file() {
        return Err(StoreError::NotFound { id });
    }
    read_document(&path)
}

fn read_document(path: &Utf8Path) -> Result<WorkoutV1, StoreError> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str::<WorkoutV1>(&s).map_err(|e| StoreError::Json {
            message: e.to_string(),
        }),
        Err(e) => Err(StoreError::Io {
            message: e.to_string(),
        }),
    }
}
