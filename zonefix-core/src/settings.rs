//! Clap-free settings for the processing pipeline.

use camino::Utf8PathBuf;
use thiserror::Error;
use zonefix_types::garmin::{DEFAULT_HR_ZONE, MAX_HR_ZONE, MIN_HR_ZONE};

use crate::ports::DEFAULT_LIST_LIMIT;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("heart rate zone must be between {min} and {max}, got {zone}")]
    ZoneOutOfRange { zone: u32, min: u32, max: u32 },
}

/// Settings for one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSettings {
    pub zone: u32,

    /// Case-insensitive substring the workout name must contain. Empty means no filter.
    pub name_filter: Option<String>,
    pub dry_run: bool,
    /// Record a trace line per step.
    pub verbose: bool,
    pub limit: usize,

    /// Where `report.json` and `report.md` go, if anywhere.
    pub out_dir: Option<Utf8PathBuf>,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            zone: DEFAULT_HR_ZONE,
            name_filter: None,
            dry_run: false,
            verbose: false,
            limit: DEFAULT_LIST_LIMIT,
            out_dir: None,
        }
    }
}

impl ProcessSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_HR_ZONE..=MAX_HR_ZONE).contains(&self.zone) {
            return Err(SettingsError::ZoneOutOfRange {
                zone: self.zone,
                min: MIN_HR_ZONE,
                max: MAX_HR_ZONE,
            });
        }
        Ok(())
    }

    /// The name filter, if one is set and non-empty.
    pub fn effective_filter(&self) -> Option<&str> {
        self.name_filter.as_deref().filter(|f| !f.is_empty())
    }
}
