//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Why a flat route cannot be turned into a tree.
///
/// The `Display` texts are matched on by existing consumers and must not change.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStructureError {
    #[error("Found 0 or multiple potential root smiles. A valid retrosynthesis tree must have exactly one root.")]
    AmbiguousRoot,

    #[error("Cycle detected. A valid retrosynthesis tree cannot contain cycles.")]
    CycleDetected,
}

/// A configured build ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildLimit {
    MaxNodes(usize),
    MaxDepth(usize),
}

impl fmt::Display for BuildLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildLimit::MaxNodes(n) => write!(f, "max_nodes={}", n),
            BuildLimit::MaxDepth(n) => write!(f, "max_depth={}", n),
        }
    }
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    InvalidRouteStructure(#[from] RouteStructureError),

    #[error("route expansion exceeded {limit} at smiles: {smiles}")]
    BuildLimitExceeded { limit: BuildLimit, smiles: String },

    #[error("unknown search status: {0}")]
    UnknownStatus(String),
}

impl DomainError {
    /// The structural cause, if this is a structural failure.
    pub fn structure(&self) -> Option<RouteStructureError> {
        match self {
            DomainError::InvalidRouteStructure(cause) => Some(*cause),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
