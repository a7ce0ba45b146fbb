//! Integration tests for the metarouter binary.
//!
//! Command output goes to stdout; logs stay on stderr.

use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_metarouter");
    Command::new(bin)
        .env_remove("METAROUTER_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "metarouter should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_decode_json() {
    let output = run(&["decode", "#televet/pets/0//side:chat", "--format", "json"]);
    let decoded: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(decoded["outlet"], "televet/pets/0");
    assert_eq!(decoded["side"], "chat");
}

#[test]
fn test_encode_entries() {
    let output = run(&["encode", "side=b/c", "outlet=a"]);
    assert_eq!(stdout(&output).trim_end(), "a//side:b/c");
}

#[test]
fn test_encode_rejects_malformed_entry() {
    let output = run(&["encode", "no-equals-sign"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("outlet=route"));
}

#[test]
fn test_simulate_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("metarouter.toml");
    fs::write(
        &config_path,
        r#"
additional_height = 10

[[routes]]
path = "televet"
app = "https://televet.example"

[[routes]]
path = "chat"
app = "https://chat.example"
outlet = "side"
"#,
    )
    .unwrap();

    let output = run(&[
        "--config",
        config_path.to_str().unwrap(),
        "simulate",
        "--go",
        "chat/rooms/7",
        "--format",
        "json",
    ]);
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["hash"], "televet//side:chat/rooms/7");
    assert_eq!(report["active"], "chat");
    assert_eq!(report["frames"].as_array().unwrap().len(), 2);
    assert_eq!(report["messages"][0]["message"], "sub-route");
    assert_eq!(report["messages"][0]["route"], "rooms/7");
}

#[test]
fn test_simulate_without_config_fails() {
    let output = run(&["simulate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--config"));
}
