use tracing::debug;
use zonefix_types::garmin::DEFAULT_HR_ZONE;
use zonefix_types::report::StepTrace;
use zonefix_types::workout::{LeafStep, Step, Target, Workout};

use crate::classify::classify;

/// The target applied to qualifying steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePolicy {
    pub zone: u32,
}

impl Default for ZonePolicy {
    fn default() -> Self {
        Self {
            zone: DEFAULT_HR_ZONE,
        }
    }
}

/// A workout after the walker ran over every segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    pub workout: Workout,
    /// Leaf steps that gained a target, summed across segments.
    pub modified: usize,
}

/// Walk one step sequence, adding the zone target to every qualifying leaf.
///
/// Repeat groups are descended into and rebuilt with their walked children; nothing else about
/// a group changes. Returns the new sequence and `count` plus the number of leaves mutated.
pub fn walk(steps: Vec<Step>, count: usize, policy: &ZonePolicy) -> (Vec<Step>, usize) {
    let len = steps.len();
    steps
        .into_iter()
        .fold((Vec::with_capacity(len), count), |(mut out, count), step| {
            let (step, count) = match step {
                Step::Repeat(mut group) => {
                    let children = std::mem::take(&mut group.steps);
                    let (children, count) = walk(children, count, policy);
                    group.steps = children;
                    (Step::Repeat(group), count)
                }
                Step::Leaf(mut leaf) => {
                    if classify(&leaf).add_target {
                        apply_zone(&mut leaf, policy);
                        (Step::Leaf(leaf), count + 1)
                    } else {
                        (Step::Leaf(leaf), count)
                    }
                }
            };
            out.push(step);
            (out, count)
        })
}

/// Give `leaf` the heart-rate-zone target. Only the target changes.
pub fn apply_zone(leaf: &mut LeafStep, policy: &ZonePolicy) {
    debug!(
        step_type = %leaf.step_type.key,
        zone = policy.zone,
        "adding heart rate zone target"
    );
    leaf.target = Some(Target::heart_rate_zone(policy.zone));
}

/// Run [`walk`] over every segment of `workout`, each starting from a zero count.
pub fn annotate_workout(mut workout: Workout, policy: &ZonePolicy) -> Annotated {
    let mut modified = 0;
    for segment in &mut workout.segments {
        let steps = std::mem::take(&mut segment.steps);
        let (steps, count) = walk(steps, 0, policy);
        segment.steps = steps;
        modified += count;
    }
    Annotated { workout, modified }
}

/// Describe every leaf under `steps` as the classifier sees it, in traversal order.
pub fn trace_steps(steps: &[Step], depth: u32) -> Vec<StepTrace> {
    let mut traces = Vec::new();
    collect_traces(steps, depth, &mut traces);
    traces
}

pub fn trace_workout(workout: &Workout) -> Vec<StepTrace> {
    workout
        .segments
        .iter()
        .flat_map(|segment| trace_steps(&segment.steps, 0))
        .collect()
}

fn collect_traces(steps: &[Step], depth: u32, out: &mut Vec<StepTrace>) {
    for step in steps {
        match step {
            Step::Repeat(group) => collect_traces(&group.steps, depth + 1, out),
            Step::Leaf(leaf) => out.push(StepTrace {
                depth,
                step_type: leaf.step_type.key.clone(),
                duration: leaf.end_condition_label(),
                target: leaf.target_label(),
                add_target: classify(leaf).add_target,
            }),
        }
    }
}
