//! Tests for loading routes from JSON files

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use retrotree::cli::CliError;
use retrotree::exitcode;
use retrotree::infrastructure::traits::{load_update, JsonFileRouteSource, RouteSource};
use retrotree::infrastructure::InfraError;

const ROUTES_JSON: &str = r#"[
  {
    "score": 0.85,
    "molecules": [
      {"smiles": "A", "catalog_entries": []},
      {"smiles": "C", "catalog_entries": [
        {"vendor_id": "EN-1", "catalog_name": "Enamine", "lead_time_weeks": 1.5}
      ]}
    ],
    "reactions": [
      {"name": "Step1", "target": "B", "sources": ["C", "D"]},
      {"name": "Step2", "target": "A", "sources": ["B", "C"]}
    ]
  }
]"#;

const UPDATE_JSON: &str = r#"{
  "routes": [
    {"score": 0.5, "molecules": [], "reactions": [
      {"name": "r1", "target": "X", "sources": ["Y"]}
    ]}
  ],
  "is_complete": true,
  "error_message": null
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_route_array_file_when_loading_then_routes_are_parsed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "routes.json", ROUTES_JSON);

    // Act
    let routes = JsonFileRouteSource::new(&path).load_routes().unwrap();

    // Assert
    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.score, 0.85);
    assert_eq!(route.reactions[1].sources, vec!["B", "C"]);
    assert_eq!(route.molecules[1].catalog_entries[0].lead_time_weeks, 1.5);
    assert!(route.molecules[1].is_purchasable());
    assert!(!route.molecules[0].is_purchasable());
}

#[test]
fn given_update_file_when_loading_routes_then_update_routes_are_returned() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "update.json", UPDATE_JSON);

    // Act
    let routes = JsonFileRouteSource::new(&path).load_routes().unwrap();

    // Assert
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].reactions[0].target, "X");
}

#[test]
fn given_update_file_when_loading_update_then_flags_are_read() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "update.json", UPDATE_JSON);

    // Act
    let update = load_update(&path).unwrap();

    // Assert
    assert!(update.is_complete);
    assert!(update.error_message.is_none());
    assert_eq!(update.routes.len(), 1);
}

#[test]
fn given_malformed_json_when_loading_then_fails_with_parse_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "broken.json", r#"[{"score": "high"}]"#);

    // Act
    let err = JsonFileRouteSource::new(&path).load_routes().unwrap_err();

    // Assert
    assert!(matches!(err, InfraError::Parse { .. }));
    assert_eq!(CliError::from(err).exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_file_when_loading_then_fails_with_noinput() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = JsonFileRouteSource::new(temp.path().join("absent.json"));

    // Act
    let err = source.load_routes().unwrap_err();

    // Assert
    assert!(matches!(err, InfraError::Io { .. }));
    assert_eq!(CliError::from(err).exit_code(), exitcode::NOINPUT);
}
