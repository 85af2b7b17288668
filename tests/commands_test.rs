//! Tests for command dispatch

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use retrotree::cli::commands::execute_command;
use retrotree::cli::{Cli, CliError};
use retrotree::exitcode;

const VALID_ROUTE: &str = r#"{
  "score": 0.9,
  "molecules": [{"smiles": "B", "catalog_entries": [
    {"vendor_id": "EN-1", "catalog_name": "Enamine", "lead_time_weeks": 1.0}
  ]}],
  "reactions": [{"name": "Amide coupling", "target": "A", "sources": ["B", "C"]}]
}"#;

const CYCLIC_ROUTE: &str = r#"{
  "score": 0.8,
  "molecules": [],
  "reactions": [
    {"name": "Step1", "target": "A", "sources": ["B"]},
    {"name": "Step2", "target": "B", "sources": ["C"]},
    {"name": "Step3", "target": "C", "sources": ["B"]}
  ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(config_dir: &Path, args: &[&str]) -> Result<(), CliError> {
    let mut argv = vec!["retrotree", "-C", config_dir.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    execute_command(&cli)
}

#[test]
fn given_file_with_invalid_route_when_validating_then_fails_with_invalid_routes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write(
        &temp,
        "routes.json",
        &format!("[{}, {}]", VALID_ROUTE, CYCLIC_ROUTE),
    );

    // Act
    let err = run(temp.path(), &["validate", file.to_str().unwrap()]).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        CliError::InvalidRoutes {
            invalid: 1,
            total: 2
        }
    ));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_file_with_valid_routes_when_validating_then_succeeds() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write(&temp, "routes.json", &format!("[{}]", VALID_ROUTE));

    // Act
    let result = run(temp.path(), &["validate", file.to_str().unwrap()]);

    // Assert
    assert!(result.is_ok());
}

#[rstest]
#[case::tree(&["tree"])]
#[case::tree_json(&["tree", "--json"])]
#[case::tree_min_score(&["tree", "--min-score", "0.85"])]
#[case::summary(&["summary", "-n", "1"])]
fn given_mixed_route_file_when_rendering_then_invalid_routes_do_not_fail(#[case] args: &[&str]) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write(
        &temp,
        "routes.json",
        &format!("[{}, {}]", CYCLIC_ROUTE, VALID_ROUTE),
    );
    let mut argv = args.to_vec();
    argv.insert(1, file.to_str().unwrap());

    // Act
    let result = run(temp.path(), &argv);

    // Assert
    assert!(result.is_ok());
}

#[test]
fn given_missing_route_file_when_rendering_tree_then_fails_with_noinput() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.json");

    // Act
    let err = run(temp.path(), &["tree", missing.to_str().unwrap()]).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_malformed_local_config_when_running_command_then_fails_with_config_code() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".retrotree.toml"), "[limits\n").unwrap();
    let file = write(&temp, "routes.json", &format!("[{}]", VALID_ROUTE));

    // Act
    let err = run(temp.path(), &["summary", file.to_str().unwrap()]).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[rstest]
#[case::results(&["status", "--current", "pending", "--results", "3"])]
#[case::terminal(&["status", "--current", "completed", "--complete"])]
#[case::error(&["status", "--error", "timeout"])]
fn given_status_signals_when_running_status_then_succeeds(#[case] args: &[&str]) {
    // Arrange
    let temp = TempDir::new().unwrap();

    // Act
    let result = run(temp.path(), args);

    // Assert
    assert!(result.is_ok());
}

#[test]
fn given_update_file_when_running_update_then_succeeds() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write(
        &temp,
        "update.json",
        &format!(
            r#"{{"routes": [{}], "is_complete": false, "error_message": null}}"#,
            VALID_ROUTE
        ),
    );

    // Act
    let result = run(
        temp.path(),
        &["update", file.to_str().unwrap(), "--smiles", "CCO", "--current", "in_progress"],
    );

    // Assert
    assert!(result.is_ok());
}

#[test]
fn given_update_without_smiles_when_parsing_then_is_rejected() {
    // Act
    let result = Cli::try_parse_from(["retrotree", "update", "update.json"]);

    // Assert
    assert!(result.is_err());
}

#[test]
fn given_unknown_status_when_parsing_then_is_rejected() {
    // Act
    let result = Cli::try_parse_from(["retrotree", "status", "--current", "running"]);

    // Assert
    assert!(result.is_err());
}

#[test]
fn given_no_command_when_executing_then_fails_with_usage() {
    // Arrange
    let temp = TempDir::new().unwrap();

    // Act
    let err = run(temp.path(), &[]).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[rstest]
#[case::show(&["config", "show"])]
#[case::init(&["config", "init"])]
#[case::path(&["config", "path"])]
fn given_config_subcommand_when_executing_then_succeeds(#[case] args: &[&str]) {
    // Arrange
    let temp = TempDir::new().unwrap();

    // Act
    let result = run(temp.path(), args);

    // Assert
    assert!(result.is_ok());
}
