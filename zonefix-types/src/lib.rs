//! Shared DTOs (schemas-as-code) for the zonefix workspace.
//!
//! # Design constraints
//! - The domain tree in [`workout`] is what the engine reasons about. It is never serialized
//!   directly; the [`wire`] module owns the remote JSON shape and the conversions.
//! - Unknown remote fields are carried through untouched so a workout can be pushed back
//!   wholesale.
//! - Report types are written to disk; prefer adding optional fields over changing semantics.

pub mod report;
pub mod wire;
pub mod workout;

/// Schema identifiers.
pub mod schema {
    pub const ZONEFIX_REPORT_V1: &str = "zonefix.report.v1";
}

/// Identifiers and keys used by the remote workout service.
pub mod garmin {
    /// Target type id meaning "no target".
    pub const NO_TARGET_TYPE_ID: u32 = 1;
    pub const HR_ZONE_TARGET_TYPE_ID: u32 = 4;
    pub const HR_ZONE_TARGET_TYPE_KEY: &str = "heart.rate.zone";

    pub const RUNNING_SPORT_KEY: &str = "running";

    pub const WARMUP_STEP_ID: u32 = 1;
    pub const COOLDOWN_STEP_ID: u32 = 2;
    pub const INTERVAL_STEP_ID: u32 = 3;
    pub const RECOVERY_STEP_ID: u32 = 4;

    /// Heart-rate zones the service accepts.
    pub const MIN_HR_ZONE: u32 = 1;
    pub const MAX_HR_ZONE: u32 = 5;
    pub const DEFAULT_HR_ZONE: u32 = 2;
}
