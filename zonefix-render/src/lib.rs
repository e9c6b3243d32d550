//! Rendering helpers for human-readable output: console text and markdown.

use zonefix_types::report::{RunReport, StepTrace, WorkoutOutcome, WorkoutReport};
use zonefix_types::workout::WorkoutSummary;

const RULE_WIDTH: usize = 50;

/// `<type> (<duration>) -> target: <target>`
pub fn describe_step(trace: &StepTrace) -> String {
    let step_type = if trace.step_type.is_empty() {
        "?"
    } else {
        trace.step_type.as_str()
    };
    format!(
        "{} ({}) -> target: {}",
        step_type, trace.duration, trace.target
    )
}

/// One verbose line per leaf step, indented by repeat depth.
pub fn render_trace_line(trace: &StepTrace, zone: u32) -> String {
    let indent = "  ".repeat(2 + trace.depth as usize);
    if trace.add_target {
        format!("{}+ {} -> Adding Zone {}", indent, describe_step(trace), zone)
    } else {
        format!("{}- {} -> Skip", indent, describe_step(trace))
    }
}

pub fn render_run_text(report: &RunReport) -> String {
    let zone = report.policy.zone;
    let mut out = String::new();

    if report.policy.dry_run {
        out.push_str("DRY RUN MODE - No changes will be made\n\n");
    }
    out.push_str(&format!("Found {} workouts\n", report.workouts.len()));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for w in &report.workouts {
        match w.outcome {
            WorkoutOutcome::SkippedSport => {
                if report.policy.verbose {
                    out.push_str(&format!(
                        "Skip '{}' ({})\n",
                        w.name,
                        w.message.as_deref().unwrap_or(w.outcome.label())
                    ));
                }
                continue;
            }
            WorkoutOutcome::SkippedFilter => continue,
            _ => {}
        }

        out.push_str(&format!("\nProcessing: {} (ID: {})\n", w.name, w.id));
        for trace in &w.steps {
            out.push_str(&render_trace_line(trace, zone));
            out.push('\n');
        }
        push_outcome_lines(&mut out, w, zone);
    }

    if let Some(reason) = &report.run.aborted {
        out.push_str(&format!("\nAborted: {}\n", reason));
    }

    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&summary_line(report));
    out.push('\n');
    out
}

fn push_outcome_lines(out: &mut String, w: &WorkoutReport, zone: u32) {
    match w.outcome {
        WorkoutOutcome::NoSegments => {
            out.push_str(&format!("  No workout segments found in '{}'\n", w.name));
            return;
        }
        WorkoutOutcome::Unchanged => {
            out.push_str("  No changes needed\n");
            return;
        }
        _ => {}
    }

    out.push_str(&format!(
        "  Modified {} steps to add Zone {} HR target\n",
        w.steps_modified, zone
    ));
    match w.outcome {
        WorkoutOutcome::DryRun => out.push_str("  DRY RUN - would update workout\n"),
        WorkoutOutcome::Updated => out.push_str("  Updated successfully\n"),
        WorkoutOutcome::Failed => {
            out.push_str(&format!(
                "  Failed to update: {}\n",
                w.message.as_deref().unwrap_or("unknown error")
            ));
            out.push_str("     You may need to manually recreate this workout\n");
        }
        _ => {}
    }
}

/// `Summary: N steps modified across M workouts`
pub fn summary_line(report: &RunReport) -> String {
    let s = &report.summary;
    let mut line = format!(
        "Summary: {} steps modified across {} workouts",
        s.steps_modified, s.workouts_updated
    );
    if s.workouts_previewed > 0 {
        line.push_str(&format!(" ({} previewed)", s.workouts_previewed));
    }
    if s.workouts_failed > 0 {
        line.push_str(&format!(" ({} failed)", s.workouts_failed));
    }
    line
}

pub fn render_run_md(report: &RunReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    out.push_str("# zonefix run\n\n");
    out.push_str(&format!("- Zone: {}\n", report.policy.zone));
    out.push_str(&format!("- Dry run: `{}`\n", report.policy.dry_run));
    if let Some(filter) = &report.policy.name_filter {
        out.push_str(&format!("- Name filter: `{}`\n", filter));
    }
    out.push_str(&format!(
        "- Workouts: {} seen, {} skipped, {} unchanged, {} previewed, {} updated, {} failed\n",
        s.workouts_seen,
        s.workouts_skipped,
        s.workouts_unchanged,
        s.workouts_previewed,
        s.workouts_updated,
        s.workouts_failed
    ));
    out.push_str(&format!("- Steps modified: {}\n\n", s.steps_modified));

    out.push_str("## Workouts\n\n");
    if report.workouts.is_empty() {
        out.push_str("_No workouts listed._\n");
        return out;
    }

    for (i, w) in report.workouts.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, w.name));
        out.push_str(&format!("- ID: `{}`\n", w.id));
        out.push_str(&format!("- Outcome: `{}`\n", w.outcome.label()));
        if w.outcome.had_changes() {
            out.push_str(&format!("- Steps modified: {}\n", w.steps_modified));
        }
        if let Some(msg) = &w.message {
            out.push_str(&format!("- Message: {}\n", msg));
        }
        if !w.steps.is_empty() {
            out.push_str("\n**Steps**\n\n");
            for trace in &w.steps {
                let mark = if trace.add_target { "+" } else { "-" };
                out.push_str(&format!(
                    "{}- `{}` {}\n",
                    "  ".repeat(trace.depth as usize),
                    mark,
                    describe_step(trace)
                ));
            }
        }
        out.push('\n');
    }

    out
}

pub fn render_workout_table(workouts: &[WorkoutSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Found {} workouts:\n\n", workouts.len()));
    push_row(&mut out, "ID", "Sport", "Name");
    out.push_str(&"-".repeat(65));
    out.push('\n');
    for w in workouts {
        push_row(&mut out, &w.id.to_string(), &w.sport_key, &w.name);
    }
    out
}

fn push_row(out: &mut String, id: &str, sport: &str, name: &str) {
    let row = format!("{:<12} {:<10} {:<40}", id, sport, name);
    out.push_str(row.trim_end());
    out.push('\n');
}
