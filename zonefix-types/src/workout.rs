//! Domain workout tree.
//!
//! A [`Workout`] is an ordered list of [`Segment`]s; a segment is an ordered list of [`Step`]s;
//! a step is either a [`LeafStep`] or a [`RepeatGroup`] of further steps. Only leaf steps carry
//! a target.
//!
//! Each level keeps an `extra` map holding the remote fields zonefix does not model. They are
//! round-tripped verbatim by [`crate::wire`].

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

use crate::garmin::{HR_ZONE_TARGET_TYPE_ID, HR_ZONE_TARGET_TYPE_KEY, NO_TARGET_TYPE_ID};

/// Remote fields not modeled by zonefix.
pub type Extra = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub u64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing entry for a workout; enough to decide whether to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: WorkoutId,
    pub name: String,
    pub sport_key: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SportType {
    pub id: Option<u32>,
    pub key: String,
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub name: String,
    pub sport: SportType,
    pub segments: Vec<Segment>,
    pub extra: Extra,
}

impl Workout {
    pub fn summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            id: self.id,
            name: self.name.clone(),
            sport_key: self.sport.key.clone(),
        }
    }

    /// Number of leaf steps across all segments, at any depth.
    pub fn leaf_count(&self) -> usize {
        self.segments
            .iter()
            .flat_map(|s| s.steps.iter())
            .map(Step::leaf_count)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub steps: Vec<Step>,
    pub extra: Extra,
}

impl Segment {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Leaf(LeafStep),
    Repeat(RepeatGroup),
}

impl Step {
    pub fn repeat(steps: Vec<Step>) -> Self {
        Step::Repeat(RepeatGroup {
            steps,
            extra: Extra::new(),
        })
    }

    pub fn as_leaf(&self) -> Option<&LeafStep> {
        match self {
            Step::Leaf(leaf) => Some(leaf),
            Step::Repeat(_) => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Step::Leaf(_) => 1,
            Step::Repeat(group) => group.steps.iter().map(Step::leaf_count).sum(),
        }
    }

    /// Leaves plus repeat groups.
    pub fn node_count(&self) -> usize {
        match self {
            Step::Leaf(_) => 1,
            Step::Repeat(group) => 1 + group.steps.iter().map(Step::node_count).sum::<usize>(),
        }
    }
}

impl From<LeafStep> for Step {
    fn from(leaf: LeafStep) -> Self {
        Step::Leaf(leaf)
    }
}

/// A container of child steps. Never carries a target of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeatGroup {
    pub steps: Vec<Step>,
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepType {
    pub id: Option<u32>,
    pub key: String,
    pub extra: Extra,
}

impl StepType {
    pub fn new(id: Option<u32>, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            extra: Extra::new(),
        }
    }
}

/// How a step ends: condition key (`time`, `distance`, `lap.button`, ...) plus its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndCondition {
    pub key: String,
    pub value: Option<Number>,
    pub extra: Extra,
}

impl EndCondition {
    pub fn time(seconds: u64) -> Self {
        Self {
            key: "time".to_string(),
            value: Some(Number::from(seconds)),
            extra: Extra::new(),
        }
    }

    pub fn distance(meters: u64) -> Self {
        Self {
            key: "distance".to_string(),
            value: Some(Number::from(meters)),
            extra: Extra::new(),
        }
    }

    /// Short label: `m:ss` for time, `<n>m` for distance, the condition key otherwise.
    pub fn label(&self) -> String {
        let value = self.value.as_ref().and_then(Number::as_f64).filter(|v| *v > 0.0);
        match (self.key.as_str(), value) {
            ("time", Some(secs)) => {
                let secs = secs as u64;
                format!("{}:{:02}", secs / 60, secs % 60)
            }
            ("distance", Some(_)) => format!("{}m", self.value_text()),
            _ if self.key.is_empty() => "?".to_string(),
            _ => self.key.clone(),
        }
    }

    fn value_text(&self) -> String {
        self.value.as_ref().map(Number::to_string).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetType {
    pub id: u32,
    pub key: String,
    pub extra: Extra,
}

/// A populated performance target. "No target" is `Option::None` on the step, never a
/// `Target` with the sentinel id; use [`Target::normalized`] when building from raw parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetType,
    pub value_one: Option<Number>,
    pub value_two: Option<Number>,
    /// Zone number as sent; the service is not consistent about integer vs float encoding.
    pub zone: Option<Number>,
}

impl Target {
    /// Heart-rate-zone target for `zone`.
    pub fn heart_rate_zone(zone: u32) -> Self {
        Self {
            kind: TargetType {
                id: HR_ZONE_TARGET_TYPE_ID,
                key: HR_ZONE_TARGET_TYPE_KEY.to_string(),
                extra: Extra::new(),
            },
            value_one: Some(Number::from(zone)),
            value_two: None,
            zone: Some(Number::from(zone)),
        }
    }

    /// Zone number as an integer, accepting integral floats such as `2.0`.
    pub fn zone_index(&self) -> Option<u64> {
        let zone = self.zone.as_ref()?;
        zone.as_u64().or_else(|| {
            zone.as_f64()
                .filter(|z| *z >= 0.0 && z.fract() == 0.0)
                .map(|z| z as u64)
        })
    }

    /// `None` when the type id is missing or is the "no target" sentinel.
    pub fn normalized(
        id: Option<u32>,
        key: Option<String>,
        extra: Extra,
        value_one: Option<Number>,
        value_two: Option<Number>,
        zone: Option<Number>,
    ) -> Option<Self> {
        let id = id.filter(|id| *id != NO_TARGET_TYPE_ID)?;
        Some(Self {
            kind: TargetType {
                id,
                key: key.unwrap_or_default(),
                extra,
            },
            value_one,
            value_two,
            zone,
        })
    }

    pub fn label(&self) -> String {
        match &self.value_one {
            Some(v) => format!("{} {}", self.kind.key, v),
            None => self.kind.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafStep {
    pub step_type: StepType,
    pub description: Option<String>,
    pub end_condition: Option<EndCondition>,
    pub target: Option<Target>,
    pub extra: Extra,
}

impl LeafStep {
    pub fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_end_condition(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = Some(end_condition);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn end_condition_label(&self) -> String {
        self.end_condition
            .as_ref()
            .map(EndCondition::label)
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn target_label(&self) -> String {
        self.target
            .as_ref()
            .map(Target::label)
            .unwrap_or_else(|| "none".to_string())
    }
}
