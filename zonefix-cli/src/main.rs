mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CliOverrides, ConfigMerger};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use zonefix_core::adapters::{FsSession, FsWorkoutStore, FsWritePort};
use zonefix_core::pipeline::{ToolError, run_list, run_process, write_report_artifacts};
use zonefix_core::ports::ListQuery;
use zonefix_core::settings::ProcessSettings;
use zonefix_render::{render_run_text, render_workout_table};
use zonefix_types::report::ToolInfo;

/// Exit code when the run finished but at least one workout could not be pushed.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "zonefix",
    version,
    about = "Adds heart-rate-zone targets to the easy steps of structured running workouts."
)]
struct Cli {
    /// Path to a zonefix.toml (default: ./zonefix.toml if present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add the heart rate zone target to every easy step without one.
    Run(RunArgs),
    /// List workouts in the store.
    List(ListArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Directory of <workoutId>.json workout documents (default: ./workouts).
    #[arg(long)]
    store: Option<Utf8PathBuf>,

    /// Heart rate zone to apply, 1-5 (default: 2).
    #[arg(short = 'z', long)]
    zone: Option<u32>,

    /// Show what would change without pushing anything.
    #[arg(short = 'd', long, default_value_t = false)]
    dry_run: bool,

    /// Print the decision for every step and enable debug logging.
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,

    /// Maximum number of workouts to list (default: 30).
    #[arg(short = 'l', long)]
    limit: Option<usize>,

    /// Only process workouts whose name contains this text (case-insensitive).
    #[arg(short = 'f', long)]
    filter: Option<String>,

    /// Also write report.json and report.md to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Do not keep a copy of each workout document before overwriting it.
    #[arg(long, default_value_t = false)]
    no_backup: bool,
}

#[derive(Debug, Parser)]
struct ListArgs {
    /// Directory of <workoutId>.json workout documents (default: ./workouts).
    #[arg(long)]
    store: Option<Utf8PathBuf>,

    /// Maximum number of workouts to list (default: 30).
    #[arg(short = 'l', long)]
    limit: Option<usize>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(matches!(&cli.cmd, Command::Run(args) if args.verbose));

    match real_main(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .from_env_lossy()
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.cmd {
        Command::Run(args) => cmd_run(config_path, args),
        Command::List(args) => cmd_list(config_path, args),
    }
}

fn cmd_run(config_path: Option<&Utf8Path>, args: RunArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(Utf8Path::new("."), config_path)
        .context("load zonefix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge(CliOverrides {
        store: args.store,
        zone: args.zone,
        limit: args.limit,
        filter: args.filter,
        dry_run: args.dry_run,
        no_backup: args.no_backup,
    });

    debug!(
        "merged config: store={}, zone={}, limit={}, filter={:?}, dry_run={}, backup={:?}",
        merged.store_dir,
        merged.zone,
        merged.limit,
        merged.filter,
        merged.dry_run,
        merged.backup_suffix
    );

    let mut store = FsWorkoutStore::new(merged.store_dir.clone());
    if let Some(suffix) = &merged.backup_suffix {
        store = store.with_backup(suffix.clone());
    }
    let session = FsSession::new(merged.store_dir.clone());

    let settings = ProcessSettings {
        zone: merged.zone,
        name_filter: merged.filter,
        dry_run: merged.dry_run,
        verbose: args.verbose,
        limit: merged.limit,
        out_dir: args.out_dir,
    };

    let outcome = match run_process(&settings, &session, &store, tool_info()) {
        Ok(outcome) => outcome,
        Err(ToolError::Aborted { error, report }) => {
            print!("{}", render_run_text(&report));
            return Err(error);
        }
        Err(err) => return Err(err.into()),
    };
    print!("{}", render_run_text(&outcome.report));

    if let Some(out_dir) = &settings.out_dir {
        write_report_artifacts(&outcome, out_dir, &FsWritePort)?;
        info!("wrote report to {}", out_dir);
    }

    if outcome.has_failures() {
        return Ok(ExitCode::from(EXIT_PARTIAL_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_list(config_path: Option<&Utf8Path>, args: ListArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(Utf8Path::new("."), config_path)
        .context("load zonefix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge(CliOverrides {
        store: args.store,
        limit: args.limit,
        ..CliOverrides::default()
    });

    let session = FsSession::new(merged.store_dir.clone());
    let store = FsWorkoutStore::new(merged.store_dir);
    let workouts = run_list(
        &session,
        &store,
        &ListQuery {
            limit: merged.limit,
        },
    )?;

    match args.format {
        OutputFormat::Text => print!("{}", render_workout_table(&workouts)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&workouts).context("serialize workouts")?;
            println!("{}", json);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "zonefix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
