//! End-to-end tests for the zonefix binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES: [&str; 5] = [
    "910001.json",
    "910002.json",
    "910003.json",
    "910004.json",
    "910005.json",
];

fn zonefix() -> Command {
    Command::cargo_bin("zonefix").expect("zonefix binary")
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures/workouts")
}

/// A temp dir holding a `workouts/` store seeded with the recorded documents.
fn create_temp_store() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let store = td.path().join("workouts");
    fs::create_dir_all(&store).unwrap();
    for name in FIXTURES {
        fs::copy(fixtures_dir().join(name), store.join(name)).unwrap();
    }
    td
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_run_updates_store_in_place() {
    let temp = create_temp_store();
    let store = temp.path().join("workouts");

    zonefix()
        .current_dir(temp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing: Runna - 6x400m Intervals (ID: 910001)"))
        .stdout(predicate::str::contains("Skip '").not())
        .stdout(predicate::str::contains(
            "Summary: 4 steps modified across 2 workouts",
        ));

    let saved = read_json(&store.join("910001.json"));
    let warmup = &saved["workoutSegments"][0]["workoutSteps"][0];
    assert_eq!(warmup["targetType"]["workoutTargetTypeKey"], "heart.rate.zone");
    assert_eq!(warmup["zoneNumber"], 2);
    assert!(store.join("910001.json.zonefix.bak").is_file());
    assert!(!store.join("910004.json.zonefix.bak").exists());
}

#[test]
fn test_dry_run_leaves_store_untouched() {
    let temp = create_temp_store();
    let store = temp.path().join("workouts");
    let before = fs::read_to_string(store.join("910001.json")).unwrap();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("DRY RUN MODE"))
        .stdout(predicate::str::contains("  DRY RUN - would update workout"))
        .stdout(predicate::str::contains(
            "Summary: 4 steps modified across 0 workouts (2 previewed)",
        ));

    assert_eq!(fs::read_to_string(store.join("910001.json")).unwrap(), before);
    assert!(!store.join("910001.json.zonefix.bak").exists());
}

#[test]
fn test_short_flags() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "-d", "-v", "-z", "4", "-l", "2", "-f", "runna"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "    + warmup (10:00) -> target: none -> Adding Zone 4",
        ))
        .stdout(predicate::str::contains("-> Skip"))
        .stdout(predicate::str::contains("Found 2 workouts"));
}

#[test]
fn test_verbose_run_lists_sport_skips() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skip 'Zwift - Sweet Spot' (sport: cycling)"));
}

#[test]
fn test_filter_limits_processing() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--dry-run", "--filter", "CONVERSATIONAL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing: Runna - Conversational Easy Run"))
        .stdout(predicate::str::contains("Processing: Runna - 6x400m Intervals").not())
        .stdout(predicate::str::contains("Summary: 1 steps modified"));
}

#[test]
fn test_no_backup_flag() {
    let temp = create_temp_store();
    let store = temp.path().join("workouts");

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--no-backup"])
        .assert()
        .success();

    assert!(!store.join("910001.json.zonefix.bak").exists());
}

#[test]
fn test_second_run_needs_no_changes() {
    let temp = create_temp_store();

    zonefix().current_dir(temp.path()).arg("run").assert().success();
    zonefix()
        .current_dir(temp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Summary: 0 steps modified across 0 workouts",
        ));
}

#[test]
fn test_zone_out_of_range_fails() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--zone", "6"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_store_fails() {
    let temp = tempfile::tempdir().expect("tempdir");

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--store", "nowhere"])
        .assert()
        .code(1);
}

#[test]
fn test_out_dir_writes_report() {
    let temp = create_temp_store();
    let out = temp.path().join("out");

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--dry-run", "--out-dir"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out.join("report.json"));
    assert_eq!(report["schema"], "zonefix.report.v1");
    assert_eq!(report["policy"]["dry_run"], true);
    assert_eq!(report["summary"]["workouts_previewed"], 2);
    assert!(out.join("report.md").is_file());
}

#[test]
fn test_config_file_is_used() {
    let temp = create_temp_store();
    fs::rename(temp.path().join("workouts"), temp.path().join("mine")).unwrap();
    fs::write(
        temp.path().join("zonefix.toml"),
        "[run]\nzone = 3\ndry_run = true\n\n[store]\ndir = \"mine\"\n",
    )
    .unwrap();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding Zone 3"))
        .stdout(predicate::str::contains("DRY RUN - would update workout"));
}

#[test]
fn test_explicit_config_path() {
    let temp = create_temp_store();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[run]\nzone = 5\n").unwrap();

    zonefix()
        .current_dir(temp.path())
        .args(["run", "-d", "-v", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding Zone 5"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = create_temp_store();
    fs::write(temp.path().join("zonefix.toml"), "[run\n").unwrap();

    zonefix()
        .current_dir(temp.path())
        .arg("run")
        .assert()
        .code(1);
}

#[cfg(unix)]
#[test]
fn test_push_failure_exits_with_two() {
    let temp = create_temp_store();
    let store = temp.path().join("workouts");
    // A dangling backup symlink makes the pre-write backup copy fail.
    std::os::unix::fs::symlink(
        temp.path().join("missing").join("target"),
        store.join("910001.json.zonefix.bak"),
    )
    .unwrap();

    zonefix()
        .current_dir(temp.path())
        .arg("run")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failed to update:"))
        .stdout(predicate::str::contains("Summary: 4 steps modified across 1 workouts (1 failed)"));
}

#[test]
fn test_list_text() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 5 workouts:"))
        .stdout(predicate::str::contains(
            "910001       running    Runna - 6x400m Intervals",
        ));
}

#[test]
fn test_list_json() {
    let temp = create_temp_store();

    let output = zonefix()
        .current_dir(temp.path())
        .args(["list", "--format", "json", "--limit", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<u64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![910001, 910002, 910003]);
}

#[test]
fn test_unknown_format_is_usage_error() {
    let temp = create_temp_store();

    zonefix()
        .current_dir(temp.path())
        .args(["list", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
