use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};

use crate::garmin::NO_TARGET_TYPE_ID;
use crate::wire::WireError;
use crate::workout::{
    EndCondition, Extra, LeafStep, RepeatGroup, Segment, SportType, Step, StepType, Target,
    TargetType, Workout, WorkoutId, WorkoutSummary,
};

/// Step keys that describe a target. When a step has no target, whatever the service sent under
/// these keys is parked in the step's `extra` map and written back unchanged.
const PARKED_TARGET_KEYS: [&str; 4] = [
    "targetType",
    "targetValueOne",
    "targetValueTwo",
    "zoneNumber",
];

/// A workout document as returned by the workout service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<SportTypeV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_segments: Option<Vec<SegmentV1>>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportTypeV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type_key: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_steps: Option<Vec<StepV1>>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Any step object carrying `workoutSteps` is a repeat group; everything else is executable.
///
/// A group whose children do not parse is an error, not a leaf. A `null` `workoutSteps` stays on
/// the executable step's `extra`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepV1 {
    Repeat(RepeatGroupV1),
    Executable(ExecutableStepV1),
}

impl<'de> Deserialize<'de> for StepV1 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Extra::deserialize(deserializer)?;
        let step = if object.get("workoutSteps").is_some_and(|v| !v.is_null()) {
            serde_json::from_value(Value::Object(object)).map(StepV1::Repeat)
        } else {
            serde_json::from_value(Value::Object(object)).map(StepV1::Executable)
        };
        step.map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroupV1 {
    pub workout_steps: Vec<StepV1>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStepV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type: Option<StepTypeV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition: Option<EndConditionV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition_value: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetTypeV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_one: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value_two: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_number: Option<Number>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type_key: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndConditionV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_type_key: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetTypeV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_target_type_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_target_type_key: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl TargetTypeV1 {
    fn is_set(&self) -> bool {
        self.workout_target_type_id
            .is_some_and(|id| id != NO_TARGET_TYPE_ID)
    }
}

// ── wire -> domain ───────────────────────────────────────────────────────

impl TryFrom<&WorkoutV1> for WorkoutSummary {
    type Error = WireError;

    fn try_from(wire: &WorkoutV1) -> Result<Self, Self::Error> {
        let id = wire.workout_id.ok_or(WireError::MissingField {
            context: "workout",
            field: "workoutId",
        })?;
        Ok(Self {
            id: WorkoutId(id),
            name: wire
                .workout_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            sport_key: wire
                .sport_type
                .as_ref()
                .and_then(|s| s.sport_type_key.clone())
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<WorkoutV1> for Workout {
    type Error = WireError;

    fn try_from(wire: WorkoutV1) -> Result<Self, Self::Error> {
        let id = wire.workout_id.ok_or(WireError::MissingField {
            context: "workout",
            field: "workoutId",
        })?;

        let segments = wire
            .workout_segments
            .unwrap_or_default()
            .into_iter()
            .map(segment_from_wire)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: WorkoutId(id),
            name: wire.workout_name.unwrap_or_else(|| "Unknown".to_string()),
            sport: wire
                .sport_type
                .map(|s| SportType {
                    id: s.sport_type_id,
                    key: s.sport_type_key.unwrap_or_default(),
                    extra: s.extra,
                })
                .unwrap_or_default(),
            segments,
            extra: wire.extra,
        })
    }
}

fn segment_from_wire(wire: SegmentV1) -> Result<Segment, WireError> {
    Ok(Segment {
        steps: steps_from_wire(wire.workout_steps.unwrap_or_default())?,
        extra: wire.extra,
    })
}

fn steps_from_wire(steps: Vec<StepV1>) -> Result<Vec<Step>, WireError> {
    steps
        .into_iter()
        .map(|step| match step {
            StepV1::Repeat(group) => Ok(Step::Repeat(RepeatGroup {
                steps: steps_from_wire(group.workout_steps)?,
                extra: group.extra,
            })),
            StepV1::Executable(leaf) => leaf_from_wire(leaf).map(Step::Leaf),
        })
        .collect()
}

fn leaf_from_wire(wire: ExecutableStepV1) -> Result<LeafStep, WireError> {
    let ExecutableStepV1 {
        step_type,
        description,
        end_condition,
        end_condition_value,
        target_type,
        target_value_one,
        target_value_two,
        zone_number,
        mut extra,
    } = wire;

    let step_type = step_type
        .map(|st| StepType {
            id: st.step_type_id,
            key: st.step_type_key.unwrap_or_default(),
            extra: st.extra,
        })
        .unwrap_or_default();

    let end_condition = match (end_condition, end_condition_value) {
        (None, None) => None,
        (ec, value) => {
            let ec = ec.unwrap_or_default();
            Some(EndCondition {
                key: ec.condition_type_key.unwrap_or_default(),
                value,
                extra: ec.extra,
            })
        }
    };

    let target = match target_type {
        Some(tt) if tt.is_set() => Target::normalized(
            tt.workout_target_type_id,
            tt.workout_target_type_key,
            tt.extra,
            target_value_one,
            target_value_two,
            zone_number,
        ),
        unset => {
            if let Some(tt) = unset {
                extra.insert("targetType".to_string(), serde_json::to_value(tt)?);
            }
            park(&mut extra, "targetValueOne", target_value_one.map(Value::Number));
            park(&mut extra, "targetValueTwo", target_value_two.map(Value::Number));
            park(&mut extra, "zoneNumber", zone_number.map(Value::Number));
            None
        }
    };

    Ok(LeafStep {
        step_type,
        description,
        end_condition,
        target,
        extra,
    })
}

fn park(extra: &mut Extra, key: &str, value: Option<Value>) {
    if let Some(v) = value {
        extra.insert(key.to_string(), v);
    }
}

// ── domain -> wire ───────────────────────────────────────────────────────

impl From<&Workout> for WorkoutV1 {
    fn from(workout: &Workout) -> Self {
        let sport_type = (workout.sport != SportType::default()).then(|| SportTypeV1 {
            sport_type_id: workout.sport.id,
            sport_type_key: Some(workout.sport.key.clone()).filter(|k| !k.is_empty()),
            extra: workout.sport.extra.clone(),
        });

        let workout_segments = (!workout.segments.is_empty()).then(|| {
            workout
                .segments
                .iter()
                .map(|segment| SegmentV1 {
                    workout_steps: Some(steps_to_wire(&segment.steps))
                        .filter(|steps| !steps.is_empty()),
                    extra: segment.extra.clone(),
                })
                .collect()
        });

        Self {
            workout_id: Some(workout.id.0),
            workout_name: Some(workout.name.clone()),
            sport_type,
            workout_segments,
            extra: workout.extra.clone(),
        }
    }
}

fn steps_to_wire(steps: &[Step]) -> Vec<StepV1> {
    steps
        .iter()
        .map(|step| match step {
            Step::Repeat(group) => StepV1::Repeat(RepeatGroupV1 {
                workout_steps: steps_to_wire(&group.steps),
                extra: group.extra.clone(),
            }),
            Step::Leaf(leaf) => StepV1::Executable(ExecutableStepV1::from(leaf)),
        })
        .collect()
}

impl From<&LeafStep> for ExecutableStepV1 {
    fn from(leaf: &LeafStep) -> Self {
        let mut extra = leaf.extra.clone();

        let (target_type, target_value_one, target_value_two, zone_number) = match &leaf.target {
            Some(target) => {
                for key in PARKED_TARGET_KEYS {
                    extra.remove(key);
                }
                (
                    Some(TargetTypeV1::from(&target.kind)),
                    target.value_one.clone(),
                    target.value_two.clone(),
                    target.zone.clone(),
                )
            }
            None => (None, None, None, None),
        };

        let (end_condition, end_condition_value) = match &leaf.end_condition {
            Some(ec) => {
                let wire = EndConditionV1 {
                    condition_type_key: Some(ec.key.clone()).filter(|k| !k.is_empty()),
                    extra: ec.extra.clone(),
                };
                let present = wire.condition_type_key.is_some() || !wire.extra.is_empty();
                (present.then_some(wire), ec.value.clone())
            }
            None => (None, None),
        };

        let step_type = (leaf.step_type != StepType::default()).then(|| StepTypeV1 {
            step_type_id: leaf.step_type.id,
            step_type_key: Some(leaf.step_type.key.clone()).filter(|k| !k.is_empty()),
            extra: leaf.step_type.extra.clone(),
        });

        Self {
            step_type,
            description: leaf.description.clone(),
            end_condition,
            end_condition_value,
            target_type,
            target_value_one,
            target_value_two,
            zone_number,
            extra,
        }
    }
}

impl From<&TargetType> for TargetTypeV1 {
    fn from(kind: &TargetType) -> Self {
        Self {
            workout_target_type_id: Some(kind.id),
            workout_target_type_key: Some(kind.key.clone()),
            extra: kind.extra.clone(),
        }
    }
}
