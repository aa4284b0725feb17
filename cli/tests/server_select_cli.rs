//! Runs the built `server-select` binary against local server files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const SERVERS: &str = r#"[
  {"name": "United States #1", "domain": "us1.nordvpn.com", "flag": "US",
   "location": {"lat": 40.0, "long": -75.0},
   "categories": [{"name": "Standard VPN servers"}, {"name": "P2P"}],
   "features": {"openvpn_udp": true}},
  {"name": "United States #2", "domain": "us2.nordvpn.com", "flag": "US",
   "location": {"lat": 41.0, "long": -74.0},
   "categories": [{"name": "Standard VPN servers"}, {"name": "P2P"}],
   "features": {"openvpn_udp": true}}
]"#;

const STATS: &str = r#"{"us1.nordvpn.com": {"percent": 10}, "us2.nordvpn.com": {"percent": 90}}"#;

fn command(dir: &Path) -> Command {
    let servers = dir.join("servers.json");
    let stats = dir.join("stats.json");
    fs::write(&servers, SERVERS).unwrap();
    fs::write(&stats, STATS).unwrap();
    // An explicit (empty) config file keeps the user's own config out of the test.
    let config = dir.join("config.json5");
    fs::write(&config, "{}").unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_server-select"));
    // Every flag also reads SERVER_SELECT_*; the test shell must not leak into it.
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("SERVER_SELECT_") {
            cmd.env_remove(key);
        }
    }
    cmd.arg("--config")
        .arg(&config)
        .arg("--server-list")
        .arg(&servers)
        .arg("--server-stats")
        .arg(&stats)
        .args(["--log-level", "warn"]);
    cmd
}

fn run(dir: &Path, extra: &[&str]) -> Output {
    command(dir).args(extra).output().expect("failed to run server-select")
}

#[test]
fn test_selects_closest_under_load_limit() {
    let dir = tempdir().unwrap();
    let out = run(dir.path(), &["-g", "40.0,-75.0", "-l", "50"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let picks = json.as_array().unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0]["id"], "us1.nordvpn.com");
}

#[test]
fn test_count_returns_ascending_distance() {
    let dir = tempdir().unwrap();
    let out = run(dir.path(), &["-g", "40.0,-75.0", "-n", "2"]);
    assert_eq!(out.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let picks = json.as_array().unwrap();
    assert_eq!(picks[0]["id"], "us1.nordvpn.com");
    assert_eq!(picks[1]["id"], "us2.nordvpn.com");
    assert!(picks[0]["distance"].as_f64().unwrap() < picks[1]["distance"].as_f64().unwrap());
}

#[test]
fn test_no_match_prints_empty_and_exits_1() {
    let dir = tempdir().unwrap();
    let out = run(dir.path(), &["-l", "5"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "[]");
}

#[test]
fn test_bad_config_exits_2() {
    let dir = tempdir().unwrap();
    let out = run(dir.path(), &["-l", "101"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_output_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("pick.json");
    let out = run(dir.path(), &["-g", "40.0,-75.0", "-o", target.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(target).unwrap()).unwrap();
    assert_eq!(json[0]["id"], "us1.nordvpn.com");
}

#[test]
fn test_env_sets_options_and_flags_win() {
    let dir = tempdir().unwrap();
    let out = command(dir.path())
        .env("SERVER_SELECT_LOCATION", "40.0,-75.0")
        .env("SERVER_SELECT_COUNT", "2")
        .output()
        .expect("failed to run server-select");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);

    let out = command(dir.path())
        .env("SERVER_SELECT_COUNT", "2")
        .args(["-g", "40.0,-75.0", "-n", "1"])
        .output()
        .expect("failed to run server-select");
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}
