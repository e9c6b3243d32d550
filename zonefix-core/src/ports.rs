//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use zonefix_types::workout::{Workout, WorkoutId, WorkoutSummary};

/// Default size of one workout listing.
pub const DEFAULT_LIST_LIMIT: usize = 30;

/// An authenticated session with the workout service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Display name of the account.
    pub account: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

pub trait SessionPort {
    fn authenticate(&self) -> anyhow::Result<Session>;
}

/// The remote workout collection.
pub trait WorkoutStore {
    fn list_workouts(&self, query: &ListQuery) -> anyhow::Result<Vec<WorkoutSummary>>;
    fn fetch_workout(&self, id: WorkoutId) -> anyhow::Result<Workout>;
    /// Replace the stored workout wholesale.
    fn push_workout(&self, workout: &Workout) -> anyhow::Result<()>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
