//! CLI integration tests for swipedeck
//!
//! These drive the binary end to end through `replay`, `log` and `config`.
//! The interactive `swipe` command needs a terminal and is covered by the
//! unit tests of the terminal front end.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn swipedeck_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("swipedeck"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

const ITEMS: &str = r#"{"id": "A", "title": "Team lunch"}
{"id": "B", "title": "Design review"}
{"id": "C", "title": "Offsite"}
{"id": "D", "title": "Book club"}
{"id": "E", "title": "Hackathon"}
"#;

/// Drag A past the threshold, let it settle, then button-reject B
const SCRIPT: &str = r#"# A goes right by drag
{"kind": "down", "at_ms": 0, "x": 0, "y": 0}
{"kind": "move", "at_ms": 50, "x": 120, "y": 10}
{"kind": "up", "at_ms": 100}
{"kind": "tick", "at_ms": 400}
# B goes left by button
{"kind": "swipe", "at_ms": 500, "direction": "left"}
{"kind": "tick", "at_ms": 800}
"#;

fn setup(items: &str, script: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let items_path = dir.path().join("items.jsonl");
    let script_path = dir.path().join("script.jsonl");
    fs::write(&items_path, items).unwrap();
    fs::write(&script_path, script).unwrap();
    (dir, items_path, script_path)
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn test_replay_walkthrough() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("committed  A (accept)"))
        .stdout(predicate::str::contains("committed  B (reject)"))
        .stdout(predicate::str::contains("advanced   (cursor=2)"))
        .stdout(predicate::str::contains(
            "2 decision(s); cursor 2; visible: C, D, E",
        ))
        .stdout(predicate::str::contains("All done.").not());
}

#[test]
fn test_replay_json_report() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);

    let output = swipedeck_cmd(dir.path())
        .args(["--format", "json", "replay"])
        .arg(&items)
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "invites");
    assert_eq!(report["cursor"], 2);
    assert_eq!(report["visible"], serde_json::json!(["C", "D", "E"]));
    assert_eq!(report["decisions"][0]["item_id"], "A");
    assert_eq!(report["decisions"][0]["direction"], "right");
    assert_eq!(report["decisions"][1]["verdict"], "reject");
}

#[test]
fn test_replay_people_deck_labels() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);

    swipedeck_cmd(dir.path())
        .args(["replay", "--kind", "people"])
        .arg(&items)
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("committed  A (invite)"))
        .stdout(predicate::str::contains("committed  B (pass)"));
}

#[test]
fn test_replay_exhausts_deck() {
    let (dir, items, script) = setup(
        "{\"id\": \"A\"}\n{\"id\": \"B\"}\n",
        "{\"kind\": \"swipe\", \"at_ms\": 0, \"direction\": \"right\"}\n\
         {\"kind\": \"swipe\", \"at_ms\": 10, \"direction\": \"right\"}\n",
    );

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("exhausted"))
        .stdout(predicate::str::contains("visible: (none)"))
        .stdout(predicate::str::contains("All done."));
}

#[test]
fn test_replay_duplicate_ids_fail() {
    let (dir, items, script) = setup(
        "{\"id\": \"A\"}\n{\"id\": \"A\"}\n",
        "{\"kind\": \"tick\", \"at_ms\": 0}\n",
    );

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate item ID: A"));
}

#[test]
fn test_replay_bad_script_fails() {
    let (dir, items, script) = setup(ITEMS, "{\"kind\": \"pinch\", \"at_ms\": 0}\n");

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_simulated_failure_still_advances() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);

    swipedeck_cmd(dir.path())
        .args(["replay", "--simulate-failure", "A"])
        .arg(&items)
        .arg(&script)
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not accept A"))
        .stdout(predicate::str::contains("cursor 2"));
}

// =============================================================================
// Decision log
// =============================================================================

#[test]
fn test_decisions_land_in_log() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);
    let log = dir.path().join("decisions.jsonl");

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .arg("--log")
        .arg(&log)
        .assert()
        .success();

    let lines: Vec<serde_json::Value> = fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["item_id"], "A");
    assert_eq!(lines[0]["verdict"], "accept");
    assert_eq!(lines[1]["item_id"], "B");
    assert_eq!(lines[1]["verdict"], "reject");

    swipedeck_cmd(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("accept"))
        .stdout(predicate::str::contains("2 decision(s)"));

    swipedeck_cmd(dir.path())
        .args(["log", "--kind", "people"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No decisions recorded"));
}

#[test]
fn test_failed_decision_not_logged() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);
    let log = dir.path().join("decisions.jsonl");

    swipedeck_cmd(dir.path())
        .args(["replay", "--simulate-failure", "B"])
        .arg(&items)
        .arg(&script)
        .arg("--log")
        .arg(&log)
        .assert()
        .success();

    let content = fs::read_to_string(&log).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\"A\""));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    swipedeck_cmd(dir.path())
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("commit_threshold_px = 100.0"))
        .stdout(predicate::str::contains("max_rotation_degrees = 30.0"))
        .stdout(predicate::str::contains("settle_delay_ms = 300"))
        .stdout(predicate::str::contains("stack_depth = 3"));
}

#[test]
fn test_project_config_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("swipedeck.toml"),
        "default_kind = \"people\"\n\n[people]\nsettle_delay_ms = 150\n",
    )
    .unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();

    swipedeck_cmd(&nested)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project ("))
        .stdout(predicate::str::contains("default_kind = \"people\""))
        .stdout(predicate::str::contains("settle_delay_ms = 150"));
}

#[test]
fn test_invalid_config_rejected() {
    let (dir, items, script) = setup(ITEMS, SCRIPT);
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[invites]\ncommit_threshold_px = 0.0\n").unwrap();

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn test_config_init_writes_template() {
    let dir = TempDir::new().unwrap();

    swipedeck_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));
    assert!(dir.path().join("swipedeck.toml").is_file());

    swipedeck_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .failure();

    swipedeck_cmd(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_replay_rejects_out_of_range_time() {
    let (dir, items, script) = setup(
        ITEMS,
        "{\"kind\": \"tick\", \"at_ms\": 18446744073709551000}\n",
    );

    swipedeck_cmd(dir.path())
        .arg("replay")
        .arg(&items)
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}
