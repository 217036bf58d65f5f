//! CLI Integration Tests
//!
//! These tests run the `pasitos` binary against temporary databases and
//! configuration files. The map screen needs a real terminal and is not
//! exercised here.
//!
//! ```
//! cargo test --package pasitos-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

use pasitos_store::Store;

/// Run pasitos with a throwaway configuration file.
fn run_pasitos(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.toml");
    if !config.exists() {
        std::fs::write(
            &config,
            format!(
                "[storage]\npath = {:?}\n\n[location]\nnmea_path = {:?}\n",
                dir.join("default.db"),
                dir.join("gps.nmea")
            ),
        )
        .expect("Failed to write config");
    }

    Command::new(env!("CARGO_BIN_EXE_pasitos"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run pasitos")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pasitos(dir.path(), &["--help"]);

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("run"));
    assert!(help.contains("record"));
    assert!(help.contains("list"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pasitos(dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.db");
    let output = run_pasitos(dir.path(), &["--database", db.to_str().unwrap(), "list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No recorded locations"));
    assert!(db.exists());
}

#[test]
fn test_list_recorded_locations() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("history.db");
    {
        let store = Store::open(&db).unwrap();
        store.insert_location(40.0, -3.0, 80).unwrap();
        store.insert_location(40.5, -3.5, 12).unwrap();
    }

    let output = run_pasitos(dir.path(), &["--database", db.to_str().unwrap(), "list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let listing = stdout(&output);
    assert!(listing.contains("Recorded locations (2)"));
    assert!(listing.contains("40.00000"));
    assert!(listing.contains("-3.50000"));
    assert!(listing.contains("12%"));
}

#[test]
fn test_list_uses_configured_database() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(dir.path().join("default.db")).unwrap();
        store.insert_location(1.0, 2.0, 50).unwrap();
    }

    let output = run_pasitos(dir.path(), &["list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Recorded locations (1)"));
}

#[test]
fn test_invalid_interval_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pasitos(dir.path(), &["record", "--interval", "1"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("sampling.interval_secs"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pasitos"))
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("list")
        .output()
        .expect("Failed to run pasitos");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read config file"));
}
