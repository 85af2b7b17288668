//! Domain entities: the flat route as delivered by the search worker

use serde::{Deserialize, Serialize};

/// One vendor offer for a molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub vendor_id: String,
    pub catalog_name: String,
    /// Non-negative delivery estimate
    pub lead_time_weeks: f64,
}

/// A molecule of a route, keyed by its SMILES string.
///
/// SMILES are compared by exact string equality, never chemically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub smiles: String,
    pub catalog_entries: Vec<CatalogEntry>,
}

impl Molecule {
    pub fn new(smiles: impl Into<String>, catalog_entries: Vec<CatalogEntry>) -> Self {
        Self {
            smiles: smiles.into(),
            catalog_entries,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        !self.catalog_entries.is_empty()
    }
}

/// One reaction step: `sources` react to give `target`.
///
/// The order of `sources` is significant: it becomes the reactant order in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    pub target: String,
    pub sources: Vec<String>,
}

impl Reaction {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        target: impl Into<String>,
        sources: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }
}

/// One candidate synthesis route: a score plus an unordered graph of molecules and reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub score: f64,
    pub molecules: Vec<Molecule>,
    pub reactions: Vec<Reaction>,
}

/// A batch of routes posted back by the search worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchUpdate {
    pub routes: Vec<Route>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}
