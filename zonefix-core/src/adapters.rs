//! Default port implementations: a directory of workout documents, and in-memory versions for
//! embedding and testing.

use crate::ports::{ListQuery, Session, SessionPort, WorkoutStore, WritePort};
use anyhow::{Context, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use zonefix_types::wire::WorkoutV1;
use zonefix_types::workout::{Workout, WorkoutId, WorkoutSummary};

/// Workouts stored as `<dir>/<workoutId>.json` via `zonefix_store`.
#[derive(Debug, Clone)]
pub struct FsWorkoutStore {
    pub dir: Utf8PathBuf,
    /// Copy each document to `<file><suffix>` before its first overwrite.
    pub backup_suffix: Option<String>,
}

impl FsWorkoutStore {
    pub fn new(dir: Utf8PathBuf) -> Self {
        Self {
            dir,
            backup_suffix: None,
        }
    }

    pub fn with_backup(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = Some(suffix.into());
        self
    }
}

impl WorkoutStore for FsWorkoutStore {
    fn list_workouts(&self, query: &ListQuery) -> anyhow::Result<Vec<WorkoutSummary>> {
        let loaded = zonefix_store::scan_workouts(&self.dir)
            .with_context(|| format!("scan workouts in {}", self.dir))?;

        let mut out = Vec::new();
        for entry in loaded {
            let summary = match &entry.workout {
                Ok(wire) => WorkoutSummary::try_from(wire).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match summary {
                Ok(summary) => out.push(summary),
                Err(reason) => debug!(path = %entry.path, %reason, "skipping unreadable workout"),
            }
        }
        // Numeric id order, not path order.
        out.sort_by_key(|summary| summary.id);
        out.truncate(query.limit);
        Ok(out)
    }

    fn fetch_workout(&self, id: WorkoutId) -> anyhow::Result<Workout> {
        let wire = zonefix_store::load_workout(&self.dir, id)
            .with_context(|| format!("load workout {} from {}", id, self.dir))?;
        Workout::try_from(wire).with_context(|| format!("decode workout {}", id))
    }

    fn push_workout(&self, workout: &Workout) -> anyhow::Result<()> {
        let wire = WorkoutV1::from(workout);
        let path = zonefix_store::save_workout(&self.dir, &wire, self.backup_suffix.as_deref())?;
        debug!(path = %path, "saved workout");
        Ok(())
    }
}

/// Treats a readable store directory as a successful login.
#[derive(Debug, Clone)]
pub struct FsSession {
    pub dir: Utf8PathBuf,
}

impl FsSession {
    pub fn new(dir: Utf8PathBuf) -> Self {
        Self { dir }
    }
}

impl SessionPort for FsSession {
    fn authenticate(&self) -> anyhow::Result<Session> {
        std::fs::read_dir(&self.dir)
            .with_context(|| format!("workout store {} is not readable", self.dir))?;
        let account = self
            .dir
            .canonicalize_utf8()
            .ok()
            .as_deref()
            .and_then(Utf8Path::file_name)
            .unwrap_or(self.dir.as_str())
            .to_string();
        Ok(Session { account })
    }
}

/// Always authenticates as `account`.
#[derive(Debug, Clone)]
pub struct StaticSession {
    pub account: String,
}

impl StaticSession {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }
}

impl SessionPort for StaticSession {
    fn authenticate(&self) -> anyhow::Result<Session> {
        Ok(Session {
            account: self.account.clone(),
        })
    }
}

/// In-memory workout store for embedding and testing.
///
/// Listing preserves construction order. Pushes replace the stored workout and are also
/// recorded so callers can inspect exactly what was sent.
#[derive(Debug, Default)]
pub struct InMemoryWorkoutStore {
    workouts: Mutex<Vec<Workout>>,
    pushed: Mutex<Vec<Workout>>,
    failing: HashSet<WorkoutId>,
}

impl InMemoryWorkoutStore {
    pub fn new(workouts: Vec<Workout>) -> Self {
        Self {
            workouts: Mutex::new(workouts),
            pushed: Mutex::new(Vec::new()),
            failing: HashSet::new(),
        }
    }

    /// Make every push of workout `id` fail.
    pub fn fail_push_for(mut self, id: WorkoutId) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn pushed(&self) -> Vec<Workout> {
        self.pushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: WorkoutId) -> Option<Workout> {
        self.workouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|w| w.id == id)
            .cloned()
    }
}

impl WorkoutStore for InMemoryWorkoutStore {
    fn list_workouts(&self, query: &ListQuery) -> anyhow::Result<Vec<WorkoutSummary>> {
        let workouts = self
            .workouts
            .lock()
            .map_err(|_| anyhow!("workout store lock poisoned"))?;
        Ok(workouts
            .iter()
            .take(query.limit)
            .map(Workout::summary)
            .collect())
    }

    fn fetch_workout(&self, id: WorkoutId) -> anyhow::Result<Workout> {
        self.get(id).ok_or_else(|| anyhow!("workout {} not found", id))
    }

    fn push_workout(&self, workout: &Workout) -> anyhow::Result<()> {
        if self.failing.contains(&workout.id) {
            anyhow::bail!("service rejected update of workout {}", workout.id);
        }

        let mut workouts = self
            .workouts
            .lock()
            .map_err(|_| anyhow!("workout store lock poisoned"))?;
        let slot = workouts
            .iter_mut()
            .find(|w| w.id == workout.id)
            .ok_or_else(|| anyhow!("workout {} not found", workout.id))?;
        *slot = workout.clone();

        self.pushed
            .lock()
            .map_err(|_| anyhow!("workout store lock poisoned"))?
            .push(workout.clone());
        Ok(())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        std::fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
