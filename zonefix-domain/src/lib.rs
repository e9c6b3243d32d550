//! Domain logic: decide which workout steps are easy and give them a heart-rate-zone target.
//!
//! Everything here is pure. Fetching and pushing workouts belongs to `zonefix-core`.

mod classify;
mod walk;

pub use classify::{
    Classification, EASY_MARKERS, EasyReason, Effort, HARD_MARKERS, classify, has_no_target,
    is_easy,
};
pub use walk::{Annotated, ZonePolicy, annotate_workout, apply_zone, trace_steps, trace_workout, walk};
