//! Integration tests for the meetbook binary.
//!
//! These tests verify end-to-end behavior including:
//! - Program numbering and the persisted custom order
//! - Heat seeding and CSV export
//! - Result ranking and medal tables

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("meetbook"))
}

/// Writes a minimal config and a small two-race meet into `dir`
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let config_path = dir.join("config.toml");
    fs::write(&config_path, "[heats]\ntie_break = \"swimmer_id\"\n").unwrap();

    let meet = serde_json::json!({
        "event": {
            "id": "spring24",
            "name": "Spring Invitational",
            "event_date": "2024-04-20",
            "category_system": "AGE_GROUP",
            "lanes_per_heat": 8
        },
        "swimmers": [
            {"id": "a", "name": "Ari", "date_of_birth": "2013-01-01", "gender": "male", "club": "Orca"},
            {"id": "b", "name": "Bima", "date_of_birth": "2013-01-01", "gender": "male", "club": "Marlin"},
            {"id": "c", "name": "Candra", "date_of_birth": "2013-01-01", "gender": "male", "club": "Orca"},
            {"id": "d", "name": "Dewa", "date_of_birth": "2013-01-01", "gender": "male", "club": "Marlin"},
            {"id": "e", "name": "Eka", "date_of_birth": "2016-01-01", "gender": "female", "club": "Orca"}
        ],
        "entries": [
            {"swimmer_id": "a", "event_id": "spring24", "style": "Freestyle", "distance": 50, "seed_time": "00:59.00", "final_time": "00:58.00"},
            {"swimmer_id": "b", "event_id": "spring24", "style": "Freestyle", "distance": 50, "seed_time": "00:58.50", "final_time": "00:58.00"},
            {"swimmer_id": "c", "event_id": "spring24", "style": "Freestyle", "distance": 50, "seed_time": "01:00.00", "final_time": "00:59.00"},
            {"swimmer_id": "d", "event_id": "spring24", "style": "Freestyle", "distance": 50, "seed_time": "01:01.00", "final_time": "01:00.00"},
            {"swimmer_id": "e", "event_id": "spring24", "style": "Backstroke", "distance": 25, "seed_time": "00:30.00", "remark": "DNS"}
        ]
    });
    let meet_path = dir.join("meet.json");
    fs::write(&meet_path, serde_json::to_string_pretty(&meet).unwrap()).unwrap();

    (config_path, meet_path)
}

/// CLI invocation with isolated config and data directory
fn meetbook(dir: &Path, config: &Path) -> Command {
    let mut cmd = cli();
    cmd.arg("--config")
        .arg(config)
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Swim meet program and results engine",
        ));
}

#[test]
fn test_program_lists_numbered_races() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .arg("program")
        .arg("--meet")
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring Invitational (2024-04-20)"))
        .stdout(predicate::str::contains(
            "Acara   1  25m Backstroke Female 9 & under",
        ))
        .stdout(predicate::str::contains(
            "Acara   2  50m Freestyle Male 10-11",
        ));
}

#[test]
fn test_move_persists_custom_order() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .args(["move", "--acara", "2", "--up", "--meet"])
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Program order saved"));

    let saved = temp_dir.path().join("data/program_order/spring24.json");
    assert!(saved.exists());
    let contents = fs::read_to_string(&saved).unwrap();
    assert!(contents.contains("spring24"));

    // Order survives into the next run
    meetbook(temp_dir.path(), &config)
        .arg("program")
        .arg("--meet")
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Acara   1  50m Freestyle Male 10-11",
        ));

    // And reset restores the default order
    meetbook(temp_dir.path(), &config)
        .args(["program", "--reset", "--meet"])
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom order cleared"))
        .stdout(predicate::str::contains(
            "Acara   1  25m Backstroke Female 9 & under",
        ));
}

#[test]
fn test_move_requires_direction() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .args(["move", "--acara", "1", "--meet"])
        .arg(&meet)
        .assert()
        .failure();
}

#[test]
fn test_move_unknown_acara_fails() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .args(["move", "--acara", "7", "--down", "--meet"])
        .arg(&meet)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No acara 7"));
}

#[test]
fn test_heats_and_csv_export() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());
    let csv_path = temp_dir.path().join("sheets/heats.csv");

    meetbook(temp_dir.path(), &config)
        .args(["heats", "--acara", "2", "--meet"])
        .arg(&meet)
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Heat 1"))
        .stdout(predicate::str::contains("Lane 4  Bima"))
        .stdout(predicate::str::contains("Wrote 4 lanes"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "acara,race,heat,lane,swimmer,club,seed");
    // Lane order: Candra (3), Bima (4), Ari (5), Dewa (6)
    assert!(lines[1].starts_with("2,50m Freestyle Male 10-11,1,3,Candra,"));
    assert!(lines[2].starts_with("2,50m Freestyle Male 10-11,1,4,Bima,"));
}

#[test]
fn test_results_show_ties_and_medals() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    let output = meetbook(temp_dir.path(), &config)
        .args(["results", "--meet"])
        .arg(&meet)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let ranked: Vec<&str> = stdout
        .lines()
        .filter(|l| l.contains("Orca") || l.contains("Marlin"))
        .collect();

    // Eka did not start: listed, unranked, no medal
    assert!(ranked[0].contains("Eka") && ranked[0].contains("DNS"));
    assert!(ranked[0].trim_start().starts_with('-'));
    assert!(ranked[1].contains("Ari") && ranked[1].contains("Gold"));
    assert!(ranked[2].contains("Bima") && ranked[2].contains("Gold"));
    assert!(ranked[3].contains("Candra") && ranked[3].contains("Bronze"));
    assert!(ranked[4].trim_start().starts_with('4'));
}

#[test]
fn test_medal_tables() {
    let temp_dir = setup_test_dir();
    let (config, meet) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .args(["medals", "--clubs", "--meet"])
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains("Club medal table"))
        .stdout(predicate::str::is_match(r"1\s+Orca\s+G1 S0 B1 \(2\)").unwrap())
        .stdout(predicate::str::is_match(r"2\s+Marlin\s+G1 S0 B0 \(1\)").unwrap());

    meetbook(temp_dir.path(), &config)
        .args(["medals", "--best", "--meet"])
        .arg(&meet)
        .assert()
        .success()
        .stdout(predicate::str::contains("50m").not())
        .stdout(predicate::str::contains("10-11 Male"));
}

#[test]
fn test_missing_meet_file_fails() {
    let temp_dir = setup_test_dir();
    let (config, _) = write_fixtures(temp_dir.path());

    meetbook(temp_dir.path(), &config)
        .args(["program", "--meet"])
        .arg(temp_dir.path().join("nope.json"))
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_rejected() {
    let temp_dir = setup_test_dir();
    let (_, meet) = write_fixtures(temp_dir.path());
    let bad = temp_dir.path().join("bad.toml");
    fs::write(&bad, "[program]\nstyle_priority = [\"free\", \"Freestyle\"]\n").unwrap();

    meetbook(temp_dir.path(), &bad)
        .args(["program", "--meet"])
        .arg(&meet)
        .assert()
        .failure()
        .stderr(predicate::str::contains("listed twice"));
}
