//! The workout processing pipeline, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: authentication, fetching, and pushing all go through
//! the port traits.

use crate::ports::{ListQuery, SessionPort, WorkoutStore, WritePort};
use crate::settings::ProcessSettings;
use anyhow::Context;
use camino::Utf8Path;
use tracing::{debug, info, warn};
use zonefix_domain::{Annotated, ZonePolicy, annotate_workout, trace_workout};
use zonefix_render::render_run_md;
use zonefix_types::garmin::RUNNING_SPORT_KEY;
use zonefix_types::report::{RunPolicy, RunReport, ToolInfo, WorkoutOutcome, WorkoutReport};
use zonefix_types::workout::WorkoutSummary;

/// Error type for pipeline results. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("authentication failed: {0:#}")]
    Auth(anyhow::Error),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
    /// Failure after processing started; `report` holds the workouts handled before it.
    #[error("{error:#}")]
    Aborted {
        error: anyhow::Error,
        report: Box<RunReport>,
    },
}

impl ToolError {
    /// The report of what already happened, when the run stopped part-way.
    pub fn partial_report(&self) -> Option<&RunReport> {
        match self {
            ToolError::Aborted { report, .. } => Some(&**report),
            _ => None,
        }
    }
}

/// Outcome of `run_process`.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub report: RunReport,
}

impl ProcessOutcome {
    /// Whether any push was rejected. The rest of the batch still ran.
    pub fn has_failures(&self) -> bool {
        self.report.summary.workouts_failed > 0
    }
}

/// Authenticate, list, and run every listed workout through the classifier and walker.
///
/// Per-workout push failures are recorded and do not stop the batch. Authentication, listing,
/// and fetch failures abort the run; a fetch failure returns [`ToolError::Aborted`] carrying the
/// outcomes recorded so far.
pub fn run_process(
    settings: &ProcessSettings,
    session: &dyn SessionPort,
    store: &dyn WorkoutStore,
    tool: ToolInfo,
) -> Result<ProcessOutcome, ToolError> {
    settings.validate().context("invalid settings")?;

    let session = session.authenticate().map_err(ToolError::Auth)?;
    info!(account = %session.account, "authenticated");

    let summaries = store
        .list_workouts(&ListQuery {
            limit: settings.limit,
        })
        .context("list workouts")?;
    info!("found {} workouts", summaries.len());

    let policy = ZonePolicy {
        zone: settings.zone,
    };
    let mut report = RunReport::new(
        tool,
        RunPolicy {
            zone: settings.zone,
            sport: RUNNING_SPORT_KEY.to_string(),
            name_filter: settings.effective_filter().map(str::to_string),
            dry_run: settings.dry_run,
            limit: settings.limit,
            verbose: settings.verbose,
        },
    );
    report.run.account = Some(session.account);

    for summary in &summaries {
        match process_workout(settings, &policy, store, summary) {
            Ok(entry) => report.record(entry),
            Err(error) => {
                report.abort(format!("{:#}", error));
                return Err(ToolError::Aborted {
                    error,
                    report: Box::new(report),
                });
            }
        }
    }
    report.finish();

    debug!(
        steps_modified = report.summary.steps_modified,
        workouts_updated = report.summary.workouts_updated,
        "run complete"
    );
    Ok(ProcessOutcome { report })
}

/// Authenticate and list workouts without fetching or changing anything.
pub fn run_list(
    session: &dyn SessionPort,
    store: &dyn WorkoutStore,
    query: &ListQuery,
) -> Result<Vec<WorkoutSummary>, ToolError> {
    let session = session.authenticate().map_err(ToolError::Auth)?;
    debug!(account = %session.account, "authenticated");
    Ok(store.list_workouts(query).context("list workouts")?)
}

fn process_workout(
    settings: &ProcessSettings,
    policy: &ZonePolicy,
    store: &dyn WorkoutStore,
    summary: &WorkoutSummary,
) -> anyhow::Result<WorkoutReport> {
    let mut entry = WorkoutReport {
        id: summary.id,
        name: summary.name.clone(),
        outcome: WorkoutOutcome::Unchanged,
        steps_modified: 0,
        message: None,
        steps: Vec::new(),
    };

    if summary.sport_key != RUNNING_SPORT_KEY {
        debug!(id = %summary.id, sport = %summary.sport_key, "skipping non-running workout");
        entry.outcome = WorkoutOutcome::SkippedSport;
        entry.message = Some(format!("sport: {}", summary.sport_key));
        return Ok(entry);
    }

    if let Some(filter) = settings.effective_filter()
        && !name_matches(&summary.name, filter)
    {
        debug!(id = %summary.id, filter, "skipping workout outside name filter");
        entry.outcome = WorkoutOutcome::SkippedFilter;
        entry.message = Some(format!("filter: {}", filter));
        return Ok(entry);
    }

    info!(id = %summary.id, name = %summary.name, "processing workout");
    let workout = store
        .fetch_workout(summary.id)
        .with_context(|| format!("fetch workout {}", summary.id))?;

    if workout.segments.is_empty() {
        entry.outcome = WorkoutOutcome::NoSegments;
        return Ok(entry);
    }

    if settings.verbose {
        entry.steps = trace_workout(&workout);
    }

    let Annotated { workout, modified } = annotate_workout(workout, policy);
    entry.steps_modified = modified as u64;

    if modified == 0 {
        return Ok(entry);
    }

    if settings.dry_run {
        entry.outcome = WorkoutOutcome::DryRun;
        return Ok(entry);
    }

    match store.push_workout(&workout) {
        Ok(()) => {
            info!(id = %summary.id, steps = modified, "updated workout");
            entry.outcome = WorkoutOutcome::Updated;
        }
        Err(err) => {
            warn!(id = %summary.id, "failed to update workout: {:#}", err);
            entry.outcome = WorkoutOutcome::Failed;
            entry.message = Some(format!("{:#}", err));
        }
    }
    Ok(entry)
}

fn name_matches(name: &str, filter: &str) -> bool {
    name.to_lowercase().contains(&filter.to_lowercase())
}

/// Write `report.json` and `report.md` into `out_dir`.
pub fn write_report_artifacts(
    outcome: &ProcessOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_run_md(&outcome.report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    Ok(())
}
