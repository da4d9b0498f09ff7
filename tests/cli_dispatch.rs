#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    _temp: TempDir,
    root: PathBuf,
    settings: PathBuf,
    request: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let settings = root.join("settings.json");
        let request = root.join("a.http");
        fs::write(&request, "GET https://example.com\n").unwrap();
        Self {
            _temp: temp,
            root,
            settings,
            request,
        }
    }

    fn with_settings(self, json: &str) -> Self {
        fs::write(&self.settings, json).unwrap();
        self
    }

    fn configured(self) -> Self {
        let tool = self.root.join("http-snap");
        fs::create_dir_all(&tool).unwrap();
        let json = settings_json(&[("http-snap.path", tool.to_str().unwrap())]);
        self.with_settings(&json)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("snaprun").unwrap();
        cmd.current_dir(&self.root)
            .env_remove("HTTP_SNAP_SETTINGS")
            .env_remove("RUST_LOG")
            .arg("--settings")
            .arg(&self.settings);
        cmd
    }
}

fn settings_json(pairs: &[(&str, &str)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect();
    serde_json::Value::Object(map).to_string()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn dry_run_test_prints_exact_command_line() {
    let ws = Workspace::new().configured();

    ws.cmd()
        .args(["--dry-run", "test"])
        .arg(&ws.request)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "cargo run -- test --path {}\n",
            path_str(&ws.request)
        )));
}

#[test]
fn dry_run_update_includes_mode_and_environment() {
    let ws = Workspace::new();
    let tool = ws.root.join("http-snap");
    fs::create_dir_all(&tool).unwrap();
    let ws = ws.with_settings(&settings_json(&[
        ("http-snap.path", path_str(&tool)),
        ("http-snap.environment", "staging"),
    ]));

    ws.cmd()
        .args(["--dry-run", "update", "--mode", "append"])
        .arg(&ws.request)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "cargo run -- update --path {} --update-mode append --detectors all --environment staging\n",
            path_str(&ws.request)
        )));
}

#[test]
fn empty_client_options_are_left_out() {
    let ws = Workspace::new();
    let tool = ws.root.join("http-snap");
    fs::create_dir_all(&tool).unwrap();
    let ws = ws.with_settings(&settings_json(&[
        ("http-snap.path", path_str(&tool)),
        ("http-snap.client-options", ""),
    ]));

    ws.cmd()
        .args(["--dry-run", "test"])
        .arg(&ws.request)
        .assert()
        .success()
        .stdout(predicate::str::contains("--client-options").not());
}

#[test]
fn missing_file_argument_reports_no_active_file() {
    let ws = Workspace::new().configured();

    ws.cmd()
        .args(["--dry-run", "test"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No active file open."));
}

#[test]
fn unset_tool_path_is_reported() {
    let ws = Workspace::new().with_settings("{}");

    ws.cmd()
        .args(["--dry-run", "test"])
        .arg(&ws.request)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "CLI tool path is not set in settings.",
        ));
}

#[test]
fn file_that_cannot_be_saved_is_reported() {
    let ws = Workspace::new().configured();

    ws.cmd()
        .args(["--dry-run", "update"])
        .arg(ws.root.join("missing.http"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to save the current file."));
}

#[test]
fn exec_runs_registered_command_ids() {
    let ws = Workspace::new().configured();

    ws.cmd()
        .args(["--dry-run", "exec", "http-snap-runner.runUpdateOverwrite"])
        .arg(&ws.request)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--update-mode overwrite --detectors all",
        ));
}

#[test]
fn exec_rejects_unknown_ids() {
    let ws = Workspace::new().configured();

    ws.cmd()
        .args(["--dry-run", "exec", "http-snap-runner.deploy"])
        .arg(&ws.request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command"));
}

#[test]
fn commands_lists_all_identifiers() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("commands")
        .assert()
        .success()
        .stdout(predicate::str::contains("http-snap-runner.runTest"))
        .stdout(predicate::str::contains("http-snap-runner.runUpdateOverwrite"))
        .stdout(predicate::str::contains("http-snap-runner.runUpdateAppend"));
}

#[test]
fn config_set_then_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "http-snap.environment", "env/dev.json"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "http-snap.environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http-snap.environment = env/dev.json"));

    ws.cmd()
        .args(["config", "http-snap.environment", "--unset"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "http-snap.environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn config_rejects_unknown_keys() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "http-snap.colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
    assert!(!ws.settings.exists());
}

#[test]
fn shell_mode_dispatches_each_line_in_order() {
    let ws = Workspace::new().configured();
    let input = format!(
        "# comment\n\ntest {file}\nupdate-append {file}\nhttp-snap-runner.runTest {file}\n",
        file = path_str(&ws.request)
    );

    let output = ws
        .cmd()
        .args(["--dry-run", "shell"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("cargo run -- test --path"));
    assert!(lines[1].contains("--update-mode append"));
    assert!(lines[2].starts_with("cargo run -- test --path"));
}

#[test]
fn shell_mode_keeps_going_after_a_failed_line() {
    let ws = Workspace::new().configured();
    let input = format!(
        "deploy {file}\ntest\ntest {file}\n",
        file = path_str(&ws.request)
    );

    ws.cmd()
        .args(["--dry-run", "shell"])
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("cargo run -- test --path"))
        .stderr(predicate::str::contains("Unknown command: deploy"))
        .stderr(predicate::str::contains("No active file open."));
}
