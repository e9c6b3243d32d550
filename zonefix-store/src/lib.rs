//! Workout document storage.
//!
//! A store is a directory of `<workoutId>.json` files, each holding one workout exactly as the
//! remote service returns it. Loading is tolerant: a document that fails to parse is reported
//! alongside the good ones instead of aborting the scan.

mod load;
mod save;

pub use load::{LoadedWorkout, StoreError, load_workout, scan_workouts, workout_path};
pub use save::{DEFAULT_BACKUP_SUFFIX, save_workout};
