//! Integration tests for the greenlight binary against a local backend.
//!
//! Every test runs the binary with HOME and the working directory pointed at
//! a temp dir so user config files cannot leak in.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;

use axum::Router;
use axum::extract::Path as UrlPath;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

const LIST_BODY: &str = r#"{
    "0": {"name": "unit", "id": 0, "up_to_date": true, "returncode": 0, "mtime": 1690000000000,
          "args": ["cargo", "test"]},
    "1": {"name": "lint", "id": 1, "up_to_date": true, "returncode": 2, "mtime": 1690000001000},
    "2": {"name": "docs", "id": 2, "up_to_date": false}
}"#;

const DETAIL_BODY: &str = r#"{"name": "unit", "id": 0, "up_to_date": true, "returncode": 0,
    "mtime": 1690000000000, "args": ["cargo", "test"],
    "out": "test result: ok. 4 passed", "err": ""}"#;

fn json(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn list_projects() -> Response {
    json(LIST_BODY)
}

async fn show_project(UrlPath(id): UrlPath<String>) -> Response {
    if id == "0" {
        json(DETAIL_BODY)
    } else {
        (StatusCode::NOT_FOUND, "not found").into_response()
    }
}

/// Start the fake backend on its own runtime thread and return its base URL.
fn spawn_backend() -> String {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");

        runtime.block_on(async move {
            let app = Router::new()
                .route("/api/projects", get(list_projects))
                .route("/api/projects/:id", get(show_project));

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind");
            tx.send(listener.local_addr().expect("No local addr"))
                .expect("Failed to report addr");
            axum::serve(listener, app).await.expect("Server failed");
        });
    });

    let addr = rx.recv().expect("Backend did not start");
    format!("http://{}", addr)
}

fn greenlight(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_greenlight"));
    command
        .current_dir(dir)
        .env("HOME", dir)
        .env_remove("GREENLIGHT_API_URL")
        .env("RUST_LOG", "greenlight=error");
    command
}

fn run(dir: &Path, args: &[&str]) -> Output {
    greenlight(dir)
        .args(args)
        .output()
        .expect("Failed to execute greenlight")
}

#[test]
fn test_list_json_outputs_projects_with_status() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["--url", &base, "list", "--json"]);
    assert!(
        output.status.success(),
        "greenlight list --json failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let projects: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    let projects = projects.as_array().expect("JSON output should be an array");

    let statuses: Vec<&str> = projects
        .iter()
        .map(|p| p["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["success", "failed", "never_run"]);
    assert_eq!(projects[0]["id"], "0");
    assert_eq!(projects[0]["name"], "unit");
}

#[test]
fn test_list_prints_table() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["list", "--url", &base]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("│ ID │ Name"), "unexpected table: {}", stdout);
    assert!(stdout.contains("success"));
    assert!(stdout.contains("failed"));
    assert!(stdout.contains("never run"));
    assert!(stdout.contains("2023-07-22 04:26:40"));
}

#[test]
fn test_show_prints_captured_output() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["--url", &base, "show", "0"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unit (0)"));
    assert!(stdout.contains("Command:     cargo test"));
    assert!(stdout.contains("--- stdout ---\ntest result: ok. 4 passed"));
}

#[test]
fn test_show_unknown_project_fails() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["--url", &base, "show", "42"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Project '42' not found"),
        "unexpected stderr: {}",
        stderr
    );
}

#[test]
fn test_show_rejects_invalid_id() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["show", "not an id"]);
    assert!(!output.status.success());
}

#[test]
fn test_unreachable_backend_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run(
        temp_dir.path(),
        &["--url", &format!("http://{}", addr), "list"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to list projects"));
}

#[test]
fn test_invalid_url_flag_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run(temp_dir.path(), &["--url", "ftp://ci.local", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"));
}

#[test]
fn test_env_url_used_without_flag() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = greenlight(temp_dir.path())
        .env("GREENLIGHT_API_URL", &base)
        .args(["list", "--json"])
        .output()
        .expect("Failed to execute greenlight");
    assert!(output.status.success());
}

#[test]
fn test_project_config_file_sets_url() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".greenlight");
    fs::create_dir_all(&config_dir).expect("Failed to create .greenlight dir");
    fs::write(
        config_dir.join("config.toml"),
        format!("[api]\nbase_url = \"{}\"\n", base),
    )
    .expect("Failed to write config");

    let output = run(temp_dir.path(), &["list", "--json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Warning: Could not load config"));
}

#[test]
fn test_config_warning_on_invalid_toml() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".greenlight");
    fs::create_dir_all(&config_dir).expect("Failed to create .greenlight dir");
    fs::write(config_dir.join("config.toml"), "invalid toml [[[")
        .expect("Failed to write invalid config");

    // Falls back to defaults, the flag still points at the backend
    let output = run(temp_dir.path(), &["--url", &base, "list"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Warning: Could not load config"),
        "Expected warning in stderr, got: {}",
        stderr
    );
    assert!(stderr.contains("Tip: Check"));
}

#[test]
fn test_watch_json_streams_snapshots() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut child = greenlight(temp_dir.path())
        .args(["--url", &base, "watch", "--json", "--interval", "50"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn greenlight watch");

    let stdout = child.stdout.take().expect("No stdout");
    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .expect("Failed to read snapshot");

    child.kill().expect("Failed to stop watch");
    child.wait().expect("Failed to reap watch");

    let snapshot: serde_json::Value =
        serde_json::from_str(&line).expect("snapshot line should be valid JSON");
    assert_eq!(snapshot.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_url_flag_wins_over_invalid_env_url() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = greenlight(temp_dir.path())
        .env("GREENLIGHT_API_URL", "ftp://ci.local")
        .args(["--url", &base, "list", "--json"])
        .output()
        .expect("Failed to execute greenlight");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_invalid_env_url_is_reported_not_replaced() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = greenlight(temp_dir.path())
        .env("GREENLIGHT_API_URL", "ftp://ci.local")
        .args(["list"])
        .output()
        .expect("Failed to execute greenlight");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"));
    assert!(!stderr.contains("Using defaults"));
}

#[test]
fn test_long_interval_in_config_keeps_file_url() {
    let base = spawn_backend();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join(".greenlight");
    fs::create_dir_all(&config_dir).expect("Failed to create .greenlight dir");
    fs::write(
        config_dir.join("config.toml"),
        format!("[api]\nbase_url = \"{}\"\n\n[poll]\ninterval_ms = 60000\n", base),
    )
    .expect("Failed to write config");

    let output = run(temp_dir.path(), &["list", "--json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Warning: Could not load config"));
}
