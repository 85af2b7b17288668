//! Tests for the search lifecycle

use rstest::rstest;

use retrotree::domain::{
    next_status, Molecule, Reaction, Route, SearchRecord, SearchStatus, SearchUpdate,
};

fn one_route() -> Route {
    Route {
        score: 0.9,
        molecules: vec![Molecule::new("A", vec![])],
        reactions: vec![Reaction::new("r1", "A", ["B"])],
    }
}

fn batch(routes: usize, is_complete: bool, error_message: Option<&str>) -> SearchUpdate {
    SearchUpdate {
        routes: (0..routes).map(|_| one_route()).collect(),
        is_complete,
        error_message: error_message.map(str::to_string),
    }
}

#[rstest]
#[case::results_arrive(SearchStatus::Pending, 2, false, None, SearchStatus::InProgress)]
#[case::final_batch(SearchStatus::InProgress, 1, true, None, SearchStatus::Completed)]
#[case::error_wins_over_completion(SearchStatus::Pending, 0, true, Some("timeout"), SearchStatus::Failed)]
#[case::empty_batch_keeps_status(SearchStatus::InProgress, 0, false, None, SearchStatus::InProgress)]
#[case::empty_batch_keeps_pending(SearchStatus::Pending, 0, false, None, SearchStatus::Pending)]
#[case::complete_without_results(SearchStatus::Pending, 0, true, None, SearchStatus::Completed)]
#[case::error_with_results(SearchStatus::InProgress, 3, false, Some("boom"), SearchStatus::Failed)]
fn given_batch_signals_when_computing_next_status_then_first_rule_wins(
    #[case] current: SearchStatus,
    #[case] results: usize,
    #[case] is_complete: bool,
    #[case] error: Option<&str>,
    #[case] expected: SearchStatus,
) {
    // Act
    let update = next_status(current, results, is_complete, error);

    // Assert
    assert_eq!(update.status, expected);
    assert_eq!(update.error_message.as_deref(), error);
}

#[test]
fn given_terminal_status_when_new_results_arrive_then_transition_is_not_guarded() {
    // Act
    let update = next_status(SearchStatus::Completed, 4, false, None);

    // Assert
    assert_eq!(update.status, SearchStatus::InProgress);
}

#[test]
fn given_pending_record_when_applying_batches_then_status_follows_lifecycle() {
    // Arrange
    let mut record = SearchRecord::new("CC(=O)O");
    let created = record.created_at;

    // Act
    let first = record.apply(&batch(2, false, None));
    let second = record.apply(&batch(0, false, None));
    let last = record.apply(&batch(1, true, None));

    // Assert
    assert_eq!(first.status, SearchStatus::InProgress);
    assert_eq!(second.status, SearchStatus::InProgress);
    assert_eq!(last.status, SearchStatus::Completed);
    assert_eq!(record.status, SearchStatus::Completed);
    assert_eq!(record.created_at, created);
    assert!(record.updated_at >= created);
    assert!(record.error_message.is_none());
}

#[test]
fn given_worker_error_when_applying_batch_then_record_fails_with_message() {
    // Arrange
    let mut record = SearchRecord::new("CCO");

    // Act
    let outcome = record.apply(&batch(0, true, Some("planner crashed")));

    // Assert
    assert_eq!(outcome.status, SearchStatus::Failed);
    assert_eq!(record.status, SearchStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some("planner crashed"));
}

#[test]
fn given_update_json_without_optional_fields_when_parsing_then_defaults_apply() {
    // Arrange
    let json = r#"{"routes": []}"#;

    // Act
    let update: SearchUpdate = serde_json::from_str(json).unwrap();

    // Assert
    assert!(update.routes.is_empty());
    assert!(!update.is_complete);
    assert!(update.error_message.is_none());
}

#[rstest]
#[case("pending", SearchStatus::Pending)]
#[case("in_progress", SearchStatus::InProgress)]
#[case("completed", SearchStatus::Completed)]
#[case("failed", SearchStatus::Failed)]
fn given_wire_name_when_parsing_status_then_display_matches(
    #[case] name: &str,
    #[case] expected: SearchStatus,
) {
    // Act
    let status: SearchStatus = name.parse().unwrap();

    // Assert
    assert_eq!(status, expected);
    assert_eq!(status.to_string(), name);
}
