use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workout::WorkoutId;

/// Outcome of a whole processing run: one entry per listed workout plus aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub policy: RunPolicy,

    #[serde(default)]
    pub workouts: Vec<WorkoutReport>,

    #[serde(default)]
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(tool: ToolInfo, policy: RunPolicy) -> Self {
        Self {
            schema: crate::schema::ZONEFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                run_id: Uuid::new_v4(),
                started_at: Utc::now(),
                ended_at: None,
                account: None,
                aborted: None,
            },
            policy,
            workouts: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Record one workout's outcome and fold it into the aggregates.
    pub fn record(&mut self, workout: WorkoutReport) {
        self.summary.record(&workout);
        self.workouts.push(workout);
    }

    pub fn finish(&mut self) {
        self.run.ended_at = Some(Utc::now());
    }

    /// Close the report early; workouts after the failing one were never looked at.
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.run.aborted = Some(reason.into());
        self.finish();
    }

    pub fn is_aborted(&self) -> bool {
        self.run.aborted.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Display name of the authenticated account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Set when a fatal error stopped the run part-way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Settings the run was executed with, echoed for the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPolicy {
    pub zone: u32,
    pub sport: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_filter: Option<String>,

    pub dry_run: bool,
    pub limit: usize,

    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutReport {
    pub id: WorkoutId,
    pub name: String,
    pub outcome: WorkoutOutcome,

    #[serde(default)]
    pub steps_modified: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Per-step decisions, only collected in verbose runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepTrace>,
}

/// Terminal state of a single workout.
///
/// `SkippedSport` and `SkippedFilter` are decided from the listing alone; every other state is
/// reached after the workout was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutOutcome {
    SkippedSport,
    SkippedFilter,
    NoSegments,
    Unchanged,
    DryRun,
    Updated,
    Failed,
}

impl WorkoutOutcome {
    pub fn label(self) -> &'static str {
        match self {
            WorkoutOutcome::SkippedSport => "skipped (sport)",
            WorkoutOutcome::SkippedFilter => "skipped (filter)",
            WorkoutOutcome::NoSegments => "no segments",
            WorkoutOutcome::Unchanged => "no changes needed",
            WorkoutOutcome::DryRun => "dry run",
            WorkoutOutcome::Updated => "updated",
            WorkoutOutcome::Failed => "failed",
        }
    }

    pub fn is_skipped(self) -> bool {
        matches!(
            self,
            WorkoutOutcome::SkippedSport | WorkoutOutcome::SkippedFilter
        )
    }

    /// Whether the workout reached the push decision with at least one mutated step.
    pub fn had_changes(self) -> bool {
        matches!(
            self,
            WorkoutOutcome::DryRun | WorkoutOutcome::Updated | WorkoutOutcome::Failed
        )
    }
}

/// One leaf step as seen before mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTrace {
    /// Repeat-group nesting depth; 0 for steps directly in a segment.
    pub depth: u32,
    pub step_type: String,
    pub duration: String,
    pub target: String,
    pub add_target: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub workouts_seen: u64,
    pub workouts_skipped: u64,
    pub workouts_unchanged: u64,
    pub workouts_previewed: u64,
    pub workouts_updated: u64,
    pub workouts_failed: u64,
    pub steps_modified: u64,
}

impl RunSummary {
    pub fn record(&mut self, workout: &WorkoutReport) {
        self.workouts_seen += 1;
        match workout.outcome {
            WorkoutOutcome::SkippedSport | WorkoutOutcome::SkippedFilter => {
                self.workouts_skipped += 1
            }
            WorkoutOutcome::NoSegments | WorkoutOutcome::Unchanged => {
                self.workouts_unchanged += 1
            }
            WorkoutOutcome::DryRun => self.workouts_previewed += 1,
            WorkoutOutcome::Updated => self.workouts_updated += 1,
            WorkoutOutcome::Failed => self.workouts_failed += 1,
        }
        if workout.outcome.had_changes() {
            self.steps_modified += workout.steps_modified;
        }
    }
}
