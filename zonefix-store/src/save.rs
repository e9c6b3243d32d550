use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::debug;
use zonefix_types::wire::WorkoutV1;
use zonefix_types::workout::WorkoutId;

use crate::load::workout_path;

pub const DEFAULT_BACKUP_SUFFIX: &str = ".zonefix.bak";

/// Write `workout` to `<dir>/<workoutId>.json` as pretty JSON.
///
/// With `backup_suffix` set, the document being replaced is first copied to
/// `<workoutId>.json<suffix>`. An existing backup is kept, so it always holds the
/// first version zonefix saw.
pub fn save_workout(
    dir: &Utf8Path,
    workout: &WorkoutV1,
    backup_suffix: Option<&str>,
) -> anyhow::Result<Utf8PathBuf> {
    let id = workout
        .workout_id
        .map(WorkoutId)
        .context("workout document has no workoutId")?;
    let path = workout_path(dir, id);

    if let Some(suffix) = backup_suffix {
        let backup = Utf8PathBuf::from(format!("{path}{suffix}"));
        if path.is_file() && !backup.exists() {
            debug!(path = %backup, "backing up workout");
            fs::copy(&path, &backup).with_context(|| format!("back up {}", path))?;
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("create {}", dir))?;
    let mut json = serde_json::to_string_pretty(workout).context("serialize workout")?;
    json.push('\n');
    fs::write(&path, json).with_context(|| format!("write {}", path))?;
    Ok(path)
}
