//! Wire representation of the remote workout service's JSON.
//!
//! The wire structs mirror the service's camelCase documents and keep unknown keys in flattened
//! `extra` maps. Conversions into [`crate::workout`] normalize the "no target" duality; conversions
//! back restore whatever the domain did not change.

pub mod workout_v1;

pub use workout_v1::{
    EndConditionV1, ExecutableStepV1, RepeatGroupV1, SegmentV1, SportTypeV1, StepTypeV1, StepV1,
    TargetTypeV1, WorkoutV1,
};

/// Errors emitted while converting between wire and domain models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    MissingField {
        context: &'static str,
        field: &'static str,
    },
    Json {
        message: String,
    },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::MissingField { context, field } => {
                write!(f, "missing {} in {}", field, context)
            }
            WireError::Json { message } => write!(f, "json error: {}", message),
        }
    }
}

impl std::error::Error for WireError {}

impl From<serde_json::Error> for WireError {
    fn from(err: serde_json::Error) -> Self {
        WireError::Json {
            message: err.to_string(),
        }
    }
}
