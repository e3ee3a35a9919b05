//! Integration tests for the `pawmart` CLI binary.
//!
//! Argument parsing, help output, completions and config errors run with
//! no server. The API-backed tests point `--api-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pawmart` binary with env isolation.
///
/// Clears all `PAWMART_*` env vars and points home and XDG directories at
/// `home` so tests never touch the user's real configuration or session.
fn pawmart_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pawmart");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("PAWMART_PROFILE")
        .env_remove("PAWMART_API_URL")
        .env_remove("PAWMART_OUTPUT")
        .env_remove("PAWMART_TIMEOUT")
        .env_remove("PAWMART_STATE_DIR")
        .env_remove("PAWMART_EMAIL")
        .env_remove("PAWMART_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = pawmart_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("PawMart")
            .and(predicate::str::contains("pets"))
            .and(predicate::str::contains("cart"))
            .and(predicate::str::contains("appointments")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pawmart"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .arg("kennels")
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pawmart"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_config_explains_setup() {
    let home = tempfile::tempdir().unwrap();
    let output = pawmart_cmd(home.path())
        .args(["pets", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No API URL configured"), "got:\n{text}");
    assert!(text.contains("pawmart config init"), "got:\n{text}");
}

#[test]
fn test_unknown_profile_flag() {
    let home = tempfile::tempdir().unwrap();
    let output = pawmart_cmd(home.path())
        .args(["--profile", "staging", "pets", "list"])
        .output()
        .unwrap();
    let text = combined_output(&output);
    assert!(text.contains("Profile 'staging' not found"), "got:\n{text}");
}

#[test]
fn test_config_path_prints_locations() {
    let home = tempfile::tempdir().unwrap();
    let state = home.path().join("state");
    pawmart_cmd(home.path())
        .args(["config", "path", "--state-dir"])
        .arg(&state)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("config.toml")
                .and(predicate::str::contains(state.display().to_string())),
        );
}

#[test]
fn test_config_profiles_empty() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_whoami_without_session() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:1", "whoami"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_bad_filter_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    pawmart_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:1", "pets", "list", "--filter", "dog"])
        .assert()
        .code(2);
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_pets_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "petId": 1, "name": "Rex", "species": "dog" },
            { "petId": 2, "name": "Mimi", "species": "cat" }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = pawmart_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "-o", "json-compact"])
        .args(["pets", "list", "--filter", "species=cat"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let listed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(listed, json!([{ "petId": 2, "name": "Mimi", "species": "cat" }]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_404_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Pet not found" })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = pawmart_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "pets", "show", "9"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Pet not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_api_exits_connection() {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = pawmart_cmd(home.path());
    cmd.args(["--api-url", "http://127.0.0.1:1", "--timeout", "2", "blogs", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_session_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-1",
            "user": { "_id": "u1", "email": "ada@pawmart.test", "role": "customer" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/mine"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "o1", "status": "pending", "totalAmount": 42 }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let state = home.path().join("state");

    let mut login = pawmart_cmd(home.path());
    login
        .args(["--api-url", &server.uri(), "--state-dir"])
        .arg(&state)
        .args(["login", "--email", "ada@pawmart.test"])
        .env("PAWMART_PASSWORD", "hunter2");
    let output = run(login).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Logged in successfully"));

    let mut orders = pawmart_cmd(home.path());
    orders
        .args(["--api-url", &server.uri(), "--state-dir"])
        .arg(&state)
        .args(["-o", "plain", "orders", "list", "--mine"]);
    let output = run(orders).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "o1");

    let mut whoami = pawmart_cmd(home.path());
    whoami
        .args(["--api-url", &server.uri(), "--state-dir"])
        .arg(&state)
        .args(["-o", "plain", "whoami"]);
    let output = run(whoami).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ada@pawmart.test");
}
