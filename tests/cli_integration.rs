//! Integration tests for the birda-activity binary.

#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn write_detections(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Command with an isolated config file and quiet output.
fn command(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("birda-activity");
    cmd.arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--no-progress")
        .arg("-q")
        .env_remove("RUST_LOG");
    cmd
}

const TWO_HOURS_APART: &str = "timestamp,species,confidence\n\
                               2024-05-01 10:00:00,Bird A,0.9\n\
                               2024-05-01 12:00:00,Bird A,0.8\n";

#[test]
fn test_activity_csv_is_zero_filled_with_bom() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);
    let out = dir.path().join("out");

    command(&dir).arg(&input).arg("-o").arg(&out).assert().success();

    let bytes = std::fs::read(out.join("activity.csv")).unwrap();
    assert!(bytes.starts_with(BOM));
    let content = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
    assert_eq!(
        content,
        "Time bin,Species,Count\n\
         2024-05-01 10:00,Bird A,1\n\
         2024-05-01 11:00,Bird A,0\n\
         2024-05-01 12:00,Bird A,1\n"
    );
}

#[test]
fn test_species_flag_adds_absent_species() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);

    command(&dir)
        .arg(&input)
        .args(["--species", "Bird A,Bird B", "--no-csv-bom", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("activity.csv")).unwrap();
    let bird_b: Vec<&str> = content.lines().filter(|l| l.contains("Bird B")).collect();
    assert_eq!(bird_b.len(), 3);
    assert!(bird_b.iter().all(|l| l.ends_with(",0")));
}

#[test]
fn test_json_format_only() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);

    command(&dir)
        .arg(&input)
        .args(["-f", "json", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("activity.csv").exists());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("activity.json")).unwrap())
            .unwrap();
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["settings"]["bin"], "1h");
}

#[test]
fn test_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(
        dir.path(),
        "d.csv",
        "timestamp,species\n2024-05-01 10:00:00,Bird A\n",
    );

    command(&dir)
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column: confidence"));
}

#[test]
fn test_nothing_above_threshold_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);

    command(&dir)
        .arg(&input)
        .args(["-c", "0.95", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("activity.csv").exists());
}

#[test]
fn test_compare_with_one_species_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);

    command(&dir)
        .arg("compare")
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 species"));
}

#[test]
fn test_compare_writes_matrix() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(
        dir.path(),
        "d.csv",
        "timestamp,species,confidence\n\
         2024-05-01 10:00:00,A,0.9\n\
         2024-05-01 10:30:00,B,0.9\n\
         2024-05-01 11:00:00,A,0.9\n",
    );

    command(&dir)
        .arg("compare")
        .arg(&input)
        .args(["--no-csv-bom", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("co_occurrence.csv")).unwrap();
    assert_eq!(content, "Species,A,B\nA,2,1\nB,1,1\n");
}

#[test]
fn test_summary_subcommand() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(dir.path(), "d.csv", TWO_HOURS_APART);

    command(&dir)
        .arg("summary")
        .arg(&input)
        .args(["--no-csv-bom", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("summary.csv")).unwrap();
    assert!(content.starts_with("Species,Detections,"));
    assert!(content.contains("Bird A,2,0.8500,0.9000,2024-05-01 10:00,2024-05-01 12:00,2"));
}

#[cfg(feature = "solar")]
#[test]
fn test_location_writes_nights() {
    let dir = TempDir::new().unwrap();
    let input = write_detections(
        dir.path(),
        "d.csv",
        "timestamp,species,confidence\n\
         2024-05-01 10:00:00,Tawny Owl,0.9\n\
         2024-05-02 10:00:00,Tawny Owl,0.9\n",
    );

    command(&dir)
        .arg(&input)
        .args(["--lat", "60.17", "--lon", "24.94", "--no-csv-bom", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    let nights = std::fs::read_to_string(dir.path().join("nights.csv")).unwrap();
    assert!(nights.starts_with("Night start,Night end\n"));
    assert!(nights.lines().count() >= 2);
}

#[test]
fn test_config_path_uses_explicit_file() {
    let dir = TempDir::new().unwrap();

    command(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();

    command(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    command(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_invalid_bin_is_rejected() {
    let dir = TempDir::new().unwrap();

    command(&dir)
        .args(["d.csv", "-b", "7min"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("7min"));
}
