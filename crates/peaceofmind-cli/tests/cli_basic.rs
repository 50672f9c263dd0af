//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and checks the output.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_peaceofmind-cli"))
        .args(args)
        .env("PEACEOFMIND_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_worry_add_list_edit_remove() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    run_ok(data, &["worry", "add", "  first  "]);
    run_ok(data, &["worry", "add", "second"]);
    assert!(run_ok(data, &["worry", "add", "   "]).contains("nothing to add"));

    let items = parse_json(&run_ok(data, &["worry", "list", "--json"]));
    assert_eq!(items.as_array().map(Vec::len), Some(2));
    assert_eq!(items[0]["text"], "second");
    assert_eq!(items[1]["text"], "first");

    run_ok(data, &["worry", "edit", "2", "first, edited"]);
    let items = parse_json(&run_ok(data, &["worry", "list", "--json"]));
    assert_eq!(items[1]["text"], "first, edited");

    assert!(run_ok(data, &["worry", "remove", "1"]).contains("second"));
    let (_, stderr, code) = run_cli(data, &["worry", "remove", "5"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_worry_clear_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    run_ok(data, &["worry", "add", "keep me"]);

    let (_, _, code) = run_cli(data, &["worry", "clear"]);
    assert_ne!(code, 0);
    assert!(run_ok(data, &["worry", "list"]).contains("keep me"));

    run_ok(data, &["worry", "clear", "--yes"]);
    assert!(run_ok(data, &["worry", "list"]).contains("Inbox is empty."));
}

#[test]
fn test_worry_commit_archives_decisions() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    run_ok(data, &["worry", "add", "exam"]);
    run_ok(data, &["worry", "add", "noise"]);

    let out = run_ok(
        data,
        &[
            "worry",
            "commit",
            "--open-anyway",
            "--important",
            "2",
            "--let-go",
            "1",
        ],
    );
    assert!(out.contains("archived 2 decision(s), 0 left in inbox"));

    let archived = parse_json(&run_ok(
        data,
        &["archive", "list", "worry_decisions", "--json"],
    ));
    let decisions = &archived[0]["decisions"];
    assert_eq!(decisions[0]["text"], "exam");
    assert_eq!(decisions[0]["decision"], "Important");
    assert_eq!(decisions[1]["text"], "noise");
    assert_eq!(decisions[1]["decision"], "LetGo");

    let listing = run_ok(data, &["archive", "list", "worry_decisions"]);
    assert!(listing.contains("• noise — Let go"));
}

#[test]
fn test_empty_commit_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    assert!(run_ok(data, &["worry", "commit", "--open-anyway"]).contains("nothing selected"));
    let listing = run_ok(data, &["archive", "list", "worry_decisions"]);
    assert!(listing.contains("No entries yet."));
}

#[test]
fn test_window_set_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let out = run_ok(data, &["window", "set", "07:30", "abc"]);
    assert!(out.contains("saved: 07:30 for 15m"));

    let status = parse_json(&run_ok(data, &["window", "status", "--json"]));
    assert_eq!(status["status"]["duration_minutes"], 15);
    assert_eq!(status["overridden"], false);

    let (_, _, code) = run_cli(data, &["window", "set", "25:99", "10"]);
    assert_ne!(code, 0);
}

#[test]
fn test_log_and_filter_archive() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    run_ok(
        data,
        &[
            "log", "reframe", "--fact", "no reply yet", "--friend", "they are busy",
        ],
    );
    run_ok(data, &["log", "reframe", "--fact", "missed the train"]);

    let hits = parse_json(&run_ok(
        data,
        &["archive", "list", "reframes_fast", "--filter", "TRAIN", "--json"],
    ));
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["fact"], "missed the train");

    let listing = run_ok(data, &["archive", "list", "reframes_fast"]);
    assert!(listing.contains("Worst: (blank)"));

    let (_, _, code) = run_cli(data, &["archive", "list", "dreams"]);
    assert_ne!(code, 0);
}

#[test]
fn test_log_mood_clamps_energy() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    run_ok(
        data,
        &[
            "log",
            "mood",
            "--at",
            "2025-05-01T18:30",
            "--before",
            "0",
            "--after",
            "lots",
            "--win",
            "walked",
        ],
    );
    let moods = parse_json(&run_ok(data, &["archive", "list", "mood", "--json"]));
    assert_eq!(moods[0]["energyBefore"], 1);
    assert_eq!(moods[0]["energyAfter"], 5);
    assert_eq!(moods[0]["datetime"], "2025-05-01T18:30");
}

#[test]
fn test_senses_draft_and_archive() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    run_ok(data, &["senses", "set", "see", "lamp", " ", "window"]);

    let draft = parse_json(&run_ok(data, &["senses", "show", "--json"]));
    assert_eq!(draft["see"][0], "lamp");
    assert_eq!(draft["see"][1], "window");
    assert_eq!(draft["see"].as_array().map(Vec::len), Some(5));

    assert!(run_ok(data, &["log", "senses"]).contains("See: lamp, window"));
    run_ok(data, &["senses", "reset"]);
    let draft = parse_json(&run_ok(data, &["senses", "show", "--json"]));
    assert_eq!(draft["see"][0], "");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    assert_eq!(run_ok(data, &["config", "get", "breath.inhale_secs"]).trim(), "4");
    run_ok(data, &["config", "set", "breath.inhale_secs", "5"]);
    assert_eq!(run_ok(data, &["config", "get", "breath.inhale_secs"]).trim(), "5");
    assert!(data.join("config.toml").exists());

    let (_, _, code) = run_cli(data, &["config", "get", "breath.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_last_destination_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    assert_eq!(run_ok(data, &["last"]).trim(), "(none)");
    run_ok(data, &["worry", "list"]);
    assert_eq!(run_ok(data, &["last"]).trim(), "worry");
}

#[test]
fn test_breath_runs_requested_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();
    let out = run_ok(
        data,
        &[
            "breath", "--inhale", "1", "--hold", "0", "--exhale", "1", "--cycles", "1",
        ],
    );
    assert!(out.starts_with("Inhale 1s · Hold 0s · Exhale 1s"));
    assert!(out.contains("-- cycle 1 --"));
    assert!(out.contains("Paused"));
    assert!(out.contains("1 cycle(s) completed"));
}
