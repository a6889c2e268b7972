//! Integration tests for the `iwf-license` binary.
//!
//! Argument parsing, help output, shell completions, config commands and
//! error exit codes -- all without a live iWorkflow controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `iwf-license` binary with env isolation.
///
/// Clears every `IWF_*` variable and points config directories at a
/// nonexistent path so tests never read the user's real configuration.
fn iwf_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("iwf-license");
    cmd.env("HOME", "/tmp/iwf-license-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/iwf-license-test-nonexistent")
        .env_remove("RUST_LOG");
    for var in [
        "IWF_PROFILE",
        "IWF_CONTROLLER",
        "IWF_USERNAME",
        "IWF_PASSWORD",
        "IWF_AUTH",
        "IWF_LOGIN_PROVIDER",
        "IWF_OUTPUT",
        "IWF_INSECURE",
        "IWF_TIMEOUT",
        "IWF_POLL_INTERVAL",
        "IWF_POLL_ATTEMPTS",
        "IWF_DEFAULT_PROFILE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = iwf_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    iwf_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("license pool")
            .and(predicate::str::contains("member"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    iwf_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("iwf-license"));
}

#[test]
fn test_member_help_lists_options() {
    iwf_cmd().args(["member", "--help"]).assert().success().stdout(
        predicate::str::contains("--pool")
            .and(predicate::str::contains("--device"))
            .and(predicate::str::contains("--state"))
            .and(predicate::str::contains("--check"))
            .and(predicate::str::contains("absent")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    iwf_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    iwf_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // Falls back to the default config when no file exists.
    iwf_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_show_redacts_password() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("iwf-license");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[profiles.default]
controller = "https://iwf.example.net"
username = "admin"
password = "hunter2"
"#,
    )
    .unwrap();

    iwf_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://iwf.example.net")
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_path() {
    iwf_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = iwf_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_member_requires_pool_and_device() {
    iwf_cmd().args(["member", "--pool", "prod"]).assert().code(2);
    iwf_cmd().args(["member", "--device", "bigip1"]).assert().code(2);
}

#[test]
fn test_member_rejects_unknown_state() {
    iwf_cmd()
        .args(["member", "--pool", "prod", "--device", "a", "--state", "licensed"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

#[test]
fn test_member_rejects_blank_device() {
    iwf_cmd()
        .args(["member", "--pool", "prod", "--device", "a,"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("device"));
}

#[test]
fn test_member_rejects_zero_poll_attempts() {
    iwf_cmd()
        .args(["member", "--pool", "prod", "--device", "a", "--poll-attempts", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_member_no_controller() {
    iwf_cmd()
        .args(["member", "--pool", "prod", "--device", "bigip1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("controller"));
}

#[test]
fn test_member_missing_credentials() {
    iwf_cmd()
        .args([
            "--controller",
            "https://127.0.0.1:1",
            "member",
            "--pool",
            "prod",
            "--device",
            "bigip1",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_member_connection_refused() {
    iwf_cmd()
        .args([
            "--controller",
            "http://127.0.0.1:1",
            "--username",
            "admin",
            "--password",
            "admin",
            "--timeout",
            "2",
            "member",
            "--pool",
            "prod",
            "--device",
            "bigip1",
        ])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_output_format() {
    let output = iwf_cmd()
        .args(["--output", "invalid", "config", "show"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}
