//! Integration tests for the key store commands
//!
//! Each test gets its own config directory configured for the file secret
//! backend, so no system keyring is needed.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const OTPCTL_BINARY: &str = env!("CARGO_BIN_EXE_otpctl");
const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

fn config_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nissuer = \"Acme\"\n\n[storage]\nbackend = \"file\"\n",
    )
    .expect("Failed to write config file");
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(OTPCTL_BINARY)
        .args(args)
        .env("OTPCTL_CONFIG_DIR", dir)
        .output()
        .expect("Failed to run otpctl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_counter_key_advances_between_invocations() {
    let dir = config_dir();

    let added = run(
        dir.path(),
        &["add", "bank", "--secret", RFC_SECRET, "--kind", "counter"],
    );
    assert!(added.status.success(), "{}", String::from_utf8_lossy(&added.stderr));

    for expected in ["755224", "287082", "359152"] {
        let output = run(dir.path(), &["code", "bank"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), expected);
    }

    let list = stdout(&run(dir.path(), &["list"]));
    assert!(list.contains("bank"));
    assert!(list.contains("#3"));
}

#[test]
fn test_time_key_code_format() {
    let dir = config_dir();
    assert!(run(dir.path(), &["add", "github", "--generate"]).status.success());

    let output = run(dir.path(), &["code", "github"]);
    assert!(output.status.success());
    let code = stdout(&output);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert!(String::from_utf8_lossy(&output.stderr).contains("valid for"));
}

#[test]
fn test_uri_command() {
    let dir = config_dir();
    run(dir.path(), &["add", "github", "--secret", "jbsw y3dp ehpk 3pxp"]);

    let output = run(dir.path(), &["uri", "github"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "otpauth://totp/Acme:github?secret=JBSWY3DPEHPK3PXP&issuer=Acme&algorithm=SHA1&digits=6&period=30"
    );
}

#[test]
fn test_verify_command() {
    let dir = config_dir();
    run(
        dir.path(),
        &["add", "bank", "--secret", RFC_SECRET, "--kind", "counter"],
    );

    let accepted = run(dir.path(), &["verify", "bank", "287082"]);
    assert!(accepted.status.success());

    // counter 1 was consumed, replaying it fails
    let replayed = run(dir.path(), &["verify", "bank", "287082"]);
    assert_eq!(replayed.status.code(), Some(1));

    // the next generated code continues after the verified counter
    assert_eq!(stdout(&run(dir.path(), &["code", "bank"])), "359152");
}

#[test]
fn test_remove_command() {
    let dir = config_dir();
    run(dir.path(), &["add", "github", "--generate"]);

    assert!(run(dir.path(), &["remove", "github"]).status.success());

    let missing = run(dir.path(), &["code", "github"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Key not found"));
}

#[test]
fn test_add_rejects_invalid_secret() {
    let dir = config_dir();
    let output = run(dir.path(), &["add", "bad", "--secret", "!!!"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&run(dir.path(), &["list"])).contains("No keys stored"));
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["init"]);
    assert!(output.status.success());

    let contents = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("[defaults]"));
    assert!(contents.contains("digits = 6"));
}

#[test]
fn test_uri_rejects_issuer_with_colon() {
    let dir = config_dir();
    run(dir.path(), &["add", "github", "--generate"]);

    let output = run(dir.path(), &["uri", "github", "--issuer", "Acme:Corp"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_add_strips_secret_separators() {
    let dir = config_dir();
    assert!(run(dir.path(), &["add", "github", "--secret", "JBSW-Y3DP-EHPK-3PXP"])
        .status
        .success());

    let uri = stdout(&run(dir.path(), &["uri", "github"]));
    assert!(uri.contains("secret=JBSWY3DPEHPK3PXP&"), "{}", uri);
}

#[test]
fn test_add_rejects_name_with_colon() {
    let dir = config_dir();
    let output = run(dir.path(), &["add", "acme:alice", "--generate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot contain ':'"));
}
