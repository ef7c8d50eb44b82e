//! End-to-end runs of the `courier` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn courier(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("courier").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("COURIER_CONFIG")
        .env_remove("COURIER_LOG")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn get_status_with_echo() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .args(["call", "get_status", "--echo", "42"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"{"status":"ok","retcode":0,"data":{"good":true,"online":true,"uptime_secs":"#))
        .stdout(predicate::str::ends_with("\"message\":\"\",\"echo\":\"42\"}\n"));
}

#[test]
fn unknown_action_fails_with_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .args(["call", "bogus_action", "--echo", "b"])
        .assert()
        .code(1)
        .stdout(
            "{\"status\":\"failed\",\"retcode\":10002,\"data\":{},\
             \"message\":\"unsupported action [bogus_action]\",\"echo\":\"b\"}\n",
        );
}

#[test]
fn test_action_echoes_mixed_params() {
    let dir = tempfile::tempdir().unwrap();
    let output = courier(&dir)
        .args([
            "call",
            "test",
            "--params",
            r#"{"message":[{"type":"text"}]}"#,
            "-p",
            "group_id=10086",
            "-p",
            "auto_escape=false",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        envelope["data"],
        serde_json::json!({
            "auto_escape": false,
            "group_id": 10086,
            "message": [{"type": "text"}],
        })
    );
}

#[test]
fn malformed_params_are_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .args(["call", "test", "--params", "{not json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""retcode":10001"#));
}

#[test]
fn param_flag_requires_key_value() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .args(["call", "test", "-p", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn actions_lists_builtins() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .arg("actions")
        .assert()
        .success()
        .stdout("get_status\nget_supported_actions\nget_version\nget_version_info\ntest\n");
}

#[test]
fn default_config_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("courier.toml"), "[dispatch]\ntimeout_ms = \"soon\"\n").unwrap();
    courier(&dir)
        .arg("actions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    courier(&dir)
        .args(["--config", "missing.toml", "actions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}
