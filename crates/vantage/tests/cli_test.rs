//! Integration tests for the `vantage` CLI binary.
//!
//! Config files are written to temp dirs; datacenters are wiremock
//! servers or closed local ports.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vantage` binary with env isolation.
fn vantage_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vantage");
    cmd.env("HOME", "/tmp/vantage-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vantage-cli-test-nonexistent")
        .env_remove("VANTAGE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vantage_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_subcommands() {
    vantage_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("check-config")
            .and(predicate::str::contains("poll"))
            .and(predicate::str::contains("run")),
    );
}

// ── check-config ────────────────────────────────────────────────────

#[test]
fn test_missing_config_file_exits_with_config_code() {
    let output = vantage_cmd()
        .args(["--config", "/tmp/vantage-cli-test-nonexistent/config.toml"])
        .arg("check-config")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("not found"));
}

#[test]
fn test_check_config_lists_datacenters_and_roles() {
    let file = write_config(
        r#"
        [dashboard]
        refresh_interval_secs = 30

        [[datacenters]]
        name = "east"
        url = "http://sensu-east.local:4567"
        user = "admin"
        password = "secret"

        [[datacenters]]
        name = "west"
        url = "http://sensu-west.local:4567"

        [[roles]]
        name = "operators"
        datacenters = ["east"]
        "#,
    );

    vantage_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("check-config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("east")
                .and(predicate::str::contains("west"))
                .and(predicate::str::contains("operators"))
                .and(predicate::str::contains("basic (admin)"))
                .and(predicate::str::contains("refresh every 30s"))
                .and(predicate::str::contains("secret").not()),
        );
}

#[test]
fn test_role_with_unknown_datacenter_is_rejected() {
    let file = write_config(
        r#"
        [[datacenters]]
        name = "east"
        url = "http://sensu-east.local:4567"

        [[roles]]
        name = "operators"
        datacenters = ["north"]
        "#,
    );

    let output = vantage_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("check-config")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("north"));
}

#[test]
fn test_config_without_datacenters_is_rejected() {
    let file = write_config("[dashboard]\npoll_timeout_secs = 2\n");
    let output = vantage_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("check-config")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// ── poll ────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_poll_json_reports_reachable_datacenter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let file = write_config(&format!(
        r#"
        [dashboard]
        poll_timeout_secs = 2

        [[datacenters]]
        name = "east"
        url = "{}"
        "#,
        server.uri()
    ));

    let output = vantage_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["poll", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["health"]["ok"], json!(true));
    assert_eq!(
        report["health"]["datacenters"]["east"]["health"],
        json!("reachable")
    );
    assert_eq!(report["metrics"]["datacenters_reachable"], json!(1));
}

#[test]
fn test_poll_unreachable_datacenter_exits_with_connection_code() {
    let file = write_config(
        r#"
        [dashboard]
        poll_timeout_secs = 1

        [[datacenters]]
        name = "east"
        url = "http://127.0.0.1:9"
        "#,
    );

    let output = vantage_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["--color", "never", "poll"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(text.contains("unreachable"), "{text}");
}
