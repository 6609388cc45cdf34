use assert_cmd::Command;
use predicates::str::contains;
use std::fs;

#[test]
fn test_help_mentions_ntp() {
    let mut cmd = Command::cargo_bin("stratumd").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("NTP"));
}

#[test]
fn test_print_config_defaults() {
    let mut cmd = Command::cargo_bin("stratumd").unwrap();
    cmd.arg("--print-config")
        .assert()
        .success()
        .stdout(contains("port = 123"))
        .stdout(contains("listen = \"0.0.0.0\""));
}

#[test]
fn test_flags_override_config_file() {
    let path = std::env::temp_dir().join(format!("stratumd-cli-{}.toml", std::process::id()));
    fs::write(&path, "[server]\nport = 4123\nlisten = \"127.0.0.1\"\n[log]\nlevel = \"warn\"\n")
        .unwrap();

    let mut cmd = Command::cargo_bin("stratumd").unwrap();
    cmd.arg("--config")
        .arg(&path)
        .arg("--port")
        .arg("5123")
        .arg("--print-config")
        .assert()
        .success()
        .stdout(contains("port = 5123"))
        .stdout(contains("listen = \"127.0.0.1\""))
        .stdout(contains("level = \"warn\""));

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_config_file_fails() {
    let mut cmd = Command::cargo_bin("stratumd").unwrap();
    cmd.arg("--nocolor")
        .arg("--config")
        .arg("/nonexistent/stratumd.toml")
        .assert()
        .code(2)
        .stderr(contains("Error:"));
}

#[test]
fn test_pretty_requires_json() {
    let mut cmd = Command::cargo_bin("stratumd").unwrap();
    cmd.arg("--nocolor")
        .arg("--pretty")
        .assert()
        .code(2)
        .stderr(contains("Error:"));
}
