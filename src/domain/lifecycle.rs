//! Search lifecycle: how a search's status evolves as result batches arrive.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::SearchUpdate;
use crate::domain::error::DomainError;

/// Status of a retrosynthesis search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Pending => "pending",
            SearchStatus::InProgress => "in_progress",
            SearchStatus::Completed => "completed",
            SearchStatus::Failed => "failed",
        }
    }

    /// `Completed` and `Failed` end a search.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStatus::Completed | SearchStatus::Failed)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SearchStatus::Pending),
            "in_progress" => Ok(SearchStatus::InProgress),
            "completed" => Ok(SearchStatus::Completed),
            "failed" => Ok(SearchStatus::Failed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome of one lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: SearchStatus,
    pub error_message: Option<String>,
}

/// Next status of a search given the signals of one incoming batch.
///
/// First matching rule wins:
/// 1. an error message fails the search, carrying the message
/// 2. completion completes it
/// 3. new results mark it in progress
/// 4. otherwise the current status stands
///
/// An empty error message counts as absent. Terminal states are not guarded:
/// callers that must not leave `Completed`/`Failed` check that themselves.
pub fn next_status(
    current: SearchStatus,
    new_result_count: usize,
    is_complete: bool,
    error_message: Option<&str>,
) -> StatusUpdate {
    let (status, error_message) = match error_message.filter(|m| !m.is_empty()) {
        Some(message) => (SearchStatus::Failed, Some(message.to_string())),
        None if is_complete => (SearchStatus::Completed, None),
        None if new_result_count > 0 => (SearchStatus::InProgress, None),
        None => (current, None),
    };
    StatusUpdate {
        status,
        error_message,
    }
}

/// A search as tracked by the service: identity, target and status history stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: Uuid,
    pub smiles: String,
    pub status: SearchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl SearchRecord {
    /// New pending search for `smiles`.
    pub fn new(smiles: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            smiles: smiles.into(),
            status: SearchStatus::Pending,
            created_at: now,
            updated_at: now,
            error_message: None,
        }
    }

    /// Fold one worker batch into the record.
    pub fn apply(&mut self, update: &SearchUpdate) -> StatusUpdate {
        let outcome = next_status(
            self.status,
            update.routes.len(),
            update.is_complete,
            update.error_message.as_deref(),
        );
        debug!(
            "search {}: {} -> {} ({} routes, complete={})",
            self.id,
            self.status,
            outcome.status,
            update.routes.len(),
            update.is_complete
        );
        self.status = outcome.status;
        self.error_message = outcome.error_message.clone();
        self.updated_at = Utc::now();
        outcome
    }
}
