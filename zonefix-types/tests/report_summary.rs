use zonefix_types::report::{
    RunPolicy, RunReport, RunSummary, ToolInfo, WorkoutOutcome, WorkoutReport,
};
use zonefix_types::workout::WorkoutId;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "zonefix".to_string(),
        version: Some("0.0.0-test".to_string()),
    }
}

fn policy() -> RunPolicy {
    RunPolicy {
        zone: 2,
        sport: "running".to_string(),
        name_filter: None,
        dry_run: false,
        limit: 30,
        verbose: false,
    }
}

fn workout(id: u64, outcome: WorkoutOutcome, steps: u64) -> WorkoutReport {
    WorkoutReport {
        id: WorkoutId(id),
        name: format!("workout {id}"),
        outcome,
        steps_modified: steps,
        message: None,
        steps: vec![],
    }
}

#[test]
fn new_report_sets_schema_and_defaults() {
    let report = RunReport::new(tool(), policy());
    assert_eq!(report.schema, zonefix_types::schema::ZONEFIX_REPORT_V1);
    assert!(report.workouts.is_empty());
    assert_eq!(report.summary, RunSummary::default());
    assert!(report.run.ended_at.is_none());
}

#[test]
fn record_accumulates_by_outcome() {
    let mut report = RunReport::new(tool(), policy());
    report.record(workout(1, WorkoutOutcome::SkippedSport, 0));
    report.record(workout(2, WorkoutOutcome::Unchanged, 0));
    report.record(workout(3, WorkoutOutcome::Updated, 3));
    report.record(workout(4, WorkoutOutcome::Failed, 2));
    report.record(workout(5, WorkoutOutcome::NoSegments, 0));
    report.finish();

    let s = &report.summary;
    assert_eq!(s.workouts_seen, 5);
    assert_eq!(s.workouts_skipped, 1);
    assert_eq!(s.workouts_unchanged, 2);
    assert_eq!(s.workouts_updated, 1);
    assert_eq!(s.workouts_failed, 1);
    assert_eq!(s.steps_modified, 5);
    assert!(report.run.ended_at.is_some());
}

#[test]
fn dry_run_counts_previewed_steps() {
    let mut summary = RunSummary::default();
    summary.record(&workout(1, WorkoutOutcome::DryRun, 4));
    assert_eq!(summary.workouts_previewed, 1);
    assert_eq!(summary.workouts_updated, 0);
    assert_eq!(summary.steps_modified, 4);
}

#[test]
fn outcome_serializes_snake_case() {
    let json = serde_json::to_string(&WorkoutOutcome::SkippedFilter).expect("serialize");
    assert_eq!(json, "\"skipped_filter\"");
}

#[test]
fn report_json_omits_empty_traces() {
    let mut report = RunReport::new(tool(), policy());
    report.record(workout(9, WorkoutOutcome::Updated, 1));
    let json = serde_json::to_value(&report).expect("serialize");
    assert!(json["workouts"][0].get("steps").is_none());
    assert_eq!(json["workouts"][0]["id"], serde_json::json!(9));
}

#[test]
fn abort_keeps_recorded_workouts() {
    let mut report = RunReport::new(tool(), policy());
    report.record(workout(1, WorkoutOutcome::Updated, 2));
    report.abort("fetch workout 2: gone");

    assert!(report.is_aborted());
    assert!(report.run.ended_at.is_some());
    assert_eq!(report.summary.workouts_updated, 1);

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["run"]["aborted"], serde_json::json!("fetch workout 2: gone"));
}
