//! Configuration file loading for zonefix.
//!
//! Discovers and loads `zonefix.toml` from the working directory, or from an explicit path.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use zonefix_core::ports::DEFAULT_LIST_LIMIT;
use zonefix_store::DEFAULT_BACKUP_SUFFIX;
use zonefix_types::garmin::DEFAULT_HR_ZONE;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "zonefix.toml";

/// Store directory used when neither the CLI nor the config file names one.
pub const DEFAULT_STORE_DIR: &str = "workouts";

/// Top-level configuration from zonefix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZonefixConfig {
    pub run: RunConfig,
    pub store: StoreConfig,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Heart rate zone applied to easy steps.
    pub zone: Option<u32>,

    /// How many workouts to list.
    pub limit: Option<usize>,

    /// Only process workouts whose name contains this (case-insensitive).
    pub filter: Option<String>,

    /// Preview changes without pushing.
    pub dry_run: bool,
}

/// Store section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of `<workoutId>.json` documents.
    pub dir: Option<Utf8PathBuf>,

    /// Whether to keep a copy of each document before its first overwrite.
    pub backup: bool,

    /// Suffix for backup files.
    pub backup_suffix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            backup: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the zonefix.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a zonefix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ZonefixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ZonefixConfig> {
    let config: ZonefixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load `explicit` if given (it must exist), else discover in `dir`, else defaults.
pub fn load_or_default(
    dir: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<ZonefixConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(ZonefixConfig::default()),
    }
}

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub store: Option<Utf8PathBuf>,
    pub zone: Option<u32>,
    pub limit: Option<usize>,
    pub filter: Option<String>,
    pub dry_run: bool,
    pub no_backup: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub store_dir: Utf8PathBuf,
    pub zone: u32,
    pub limit: usize,
    pub filter: Option<String>,
    pub dry_run: bool,

    /// Backup suffix, or `None` when backups are off.
    pub backup_suffix: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ZonefixConfig,
}

impl ConfigMerger {
    pub fn new(config: ZonefixConfig) -> Self {
        Self { config }
    }

    /// CLI values replace config values; boolean flags OR with the config; defaults come last.
    pub fn merge(self, cli: CliOverrides) -> MergedConfig {
        let ZonefixConfig { run, store } = self.config;

        let backup = store.backup && !cli.no_backup;

        MergedConfig {
            store_dir: cli
                .store
                .or(store.dir)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_DIR)),
            zone: cli.zone.or(run.zone).unwrap_or(DEFAULT_HR_ZONE),
            limit: cli.limit.or(run.limit).unwrap_or(DEFAULT_LIST_LIMIT),
            filter: cli.filter.or(run.filter).filter(|f| !f.is_empty()),
            dry_run: cli.dry_run || run.dry_run,
            backup_suffix: backup.then_some(store.backup_suffix),
        }
    }
}
