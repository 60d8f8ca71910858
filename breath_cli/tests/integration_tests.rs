//! Integration tests for the breathe binary.
//!
//! These tests verify end-to-end behavior including:
//! - Catalog listing and filtering
//! - Deterministic simulation of sessions
//! - Real-time runs driven by the ticker
//! - Configuration overrides and custom exercises

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temp dir holding a config file with `contents`
fn setup_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

/// Helper to get the CLI binary pointed at an isolated config file
fn cli(config: &PathBuf) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("breathe"));
    cmd.arg("--config").arg(config);
    cmd
}

fn simulate_json(config: &PathBuf, id: &str, ticks: u64) -> serde_json::Value {
    let output = cli(config)
        .args(["simulate", id, "--ticks", &ticks.to_string(), "--json"])
        .output()
        .expect("Failed to run simulate");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("simulate --json prints JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("breathe"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guided breathing exercise pacer"));
}

#[test]
fn test_list_all() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("box"))
        .stdout(predicate::str::contains("4-7-8-0"))
        .stdout(predicate::str::contains("ujjayi"));
}

#[test]
fn test_list_by_category() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["list", "--category", "sleep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4-7-8 Breathing"))
        .stdout(predicate::str::contains("Box Breathing").not());
}

#[test]
fn test_list_unknown_category_is_empty() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["list", "--category", "nap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises match"));
}

#[test]
fn test_show_exercise() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["show", "4-7-8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle:     19s"))
        .stdout(predicate::str::contains("Helps with sleep"));
}

#[test]
fn test_unknown_exercise_fails() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Exercise not found: missing"));

    cli(&config)
        .args(["simulate", "missing", "--ticks", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Exercise not found: missing"));
}

#[test]
fn test_simulate_box_full_cycle() {
    let (_dir, config) = setup_config("");
    let snapshot = simulate_json(&config, "box", 16);

    assert_eq!(snapshot["exercise_id"], "box");
    assert_eq!(snapshot["phase"], "inhale");
    assert_eq!(snapshot["time_remaining"], 4);
    assert_eq!(snapshot["cycle_count"], 1);
    assert_eq!(snapshot["total_elapsed"], 16);
    assert_eq!(snapshot["is_active"], true);
    assert_eq!(snapshot["visual_size"], 100.0);
}

#[test]
fn test_simulate_no_holds() {
    let (_dir, config) = setup_config("");
    let snapshot = simulate_json(&config, "deep", 5);

    assert_eq!(snapshot["phase"], "exhale");
    assert_eq!(snapshot["time_remaining"], 5);
    assert_eq!(snapshot["cycle_count"], 0);
    assert_eq!(snapshot["instruction"], "Breathe out...");
}

#[test]
fn test_simulate_text_reports_transitions() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["simulate", "4-7-8", "--ticks", "19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tick    4: inhale -> hold"))
        .stdout(predicate::str::contains("tick   19: exhale -> inhale  (cycle complete)"));
}

#[test]
fn test_display_sizes_from_config() {
    let (_dir, config) = setup_config("[display]\nmin_size = 0.0\nmax_size = 10.0\n");
    let snapshot = simulate_json(&config, "box", 5);

    assert_eq!(snapshot["phase"], "hold1");
    assert_eq!(snapshot["visual_size"], 10.0);
}

#[test]
fn test_invalid_config_rejected() {
    let (_dir, config) = setup_config("[display]\nmin_size = 300.0\n");

    cli(&config).arg("list").assert().failure();
}

#[test]
fn test_custom_exercises() {
    let (_dir, config) = setup_config(
        r#"
[[exercises.custom]]
id = "square-6"
name = "Six Square"
category = "focus"
inhale = 6
hold1 = 6
exhale = 6
hold2 = 6

[[exercises.custom]]
id = "broken"
name = "Broken"
category = "calm"
inhale = 0
exhale = 4

[[exercises.custom]]
id = "neg"
name = "Negative"
category = "calm"
inhale = -4
exhale = 4

[[exercises.custom]]
id = "instant"
name = "Instant"
category = "energize"
inhale = 1
exhale = 1
recommended_minutes = 0
"#,
    );

    cli(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("square-6"))
        .stdout(predicate::str::contains("6-6-6-6"))
        .stdout(predicate::str::contains("broken").not())
        .stdout(predicate::str::contains("Negative").not())
        .stdout(predicate::str::contains("Instant").not())
        .stderr(predicate::str::contains("Rejected custom exercise"))
        .stderr(predicate::str::contains("got -4"))
        .stderr(predicate::str::contains("3 custom exercise(s) were rejected"));

    cli(&config)
        .args(["show", "neg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Exercise not found: neg"));

    let snapshot = simulate_json(&config, "square-6", 24);
    assert_eq!(snapshot["cycle_count"], 1);
}

#[test]
fn test_run_counts_cycles() {
    let (_dir, config) = setup_config("");

    cli(&config)
        .args(["run", "stimulating", "--cycles", "2", "--interval-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Breathe out..."))
        .stdout(predicate::str::contains("Session complete: 2 cycle(s) in 00:04"));
}

#[test]
fn test_run_uses_default_exercise() {
    let (_dir, config) = setup_config("[session]\ndefault_exercise = \"deep\"\n");

    cli(&config)
        .args(["run", "--cycles", "1", "--interval-ms", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deep Breathing"))
        .stdout(predicate::str::contains("Session complete: 1 cycle(s) in 00:10"));
}
