use zonefix_types::garmin::{COOLDOWN_STEP_ID, INTERVAL_STEP_ID, RECOVERY_STEP_ID, WARMUP_STEP_ID};
use zonefix_types::workout::LeafStep;

/// Description substrings that mark a step as hard regardless of its type.
pub const HARD_MARKERS: [&str; 7] = [
    "pushing",
    "fast",
    "hard",
    "tempo",
    "threshold",
    "race",
    "sprint",
];

/// Description substrings that make an interval step easy.
pub const EASY_MARKERS: [&str; 3] = ["conversational", "easy", "slow"];

const EASY_STEP_KEYS: [&str; 3] = ["warmup", "cooldown", "recovery"];
const EASY_STEP_IDS: [u32; 3] = [WARMUP_STEP_ID, COOLDOWN_STEP_ID, RECOVERY_STEP_ID];
const INTERVAL_STEP_KEY: &str = "interval";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effort {
    /// The description names a hard-effort marker.
    Hard { marker: &'static str },
    Easy { reason: EasyReason },
    NotEasy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasyReason {
    /// Warmup, cooldown or recovery, by key or id.
    StepType,
    /// Interval step whose description names an easy marker.
    Marker(&'static str),
}

/// Decision for a single leaf step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub effort: Effort,
    pub has_target: bool,
    pub add_target: bool,
}

impl Classification {
    pub fn is_easy(&self) -> bool {
        matches!(self.effort, Effort::Easy { .. })
    }
}

/// Classify a leaf step. Rules are evaluated in order and the first match wins; the hard-marker
/// check comes before anything that looks at the step type.
pub fn classify(step: &LeafStep) -> Classification {
    let effort = effort(step);
    let has_target = !has_no_target(step);
    Classification {
        effort,
        has_target,
        add_target: matches!(effort, Effort::Easy { .. }) && !has_target,
    }
}

pub fn is_easy(step: &LeafStep) -> bool {
    matches!(effort(step), Effort::Easy { .. })
}

/// True when the step carries no target. The sentinel "no target" form is folded into `None`
/// when the step is read off the wire.
pub fn has_no_target(step: &LeafStep) -> bool {
    step.target.is_none()
}

fn effort(step: &LeafStep) -> Effort {
    let description = step
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    if let Some(marker) = find_marker(&description, &HARD_MARKERS) {
        return Effort::Hard { marker };
    }

    let key = step.step_type.key.to_lowercase();
    let key = key.as_str();
    let id = step.step_type.id;

    if EASY_STEP_KEYS.contains(&key) || id.is_some_and(|id| EASY_STEP_IDS.contains(&id)) {
        return Effort::Easy {
            reason: EasyReason::StepType,
        };
    }

    if key == INTERVAL_STEP_KEY || id == Some(INTERVAL_STEP_ID) {
        return match find_marker(&description, &EASY_MARKERS) {
            Some(marker) => Effort::Easy {
                reason: EasyReason::Marker(marker),
            },
            None => Effort::NotEasy,
        };
    }

    Effort::NotEasy
}

fn find_marker(description: &str, markers: &[&'static str]) -> Option<&'static str> {
    markers.iter().copied().find(|m| description.contains(m))
}
