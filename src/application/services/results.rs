//! Result assembly service
//!
//! Turns the stored routes of a search into trees for display: filter by score,
//! order best first, build each tree and skip the ones that are structurally invalid.

use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{DomainError, RetrosynthesisTree, Route, TreeBuilder};

/// Trees for one search, best score first.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub total_routes: usize,
    pub routes: Vec<RetrosynthesisTree>,
    #[serde(skip)]
    pub skipped: Vec<SkippedRoute>,
}

/// A route that could not be turned into a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRoute {
    /// Position in the input slice
    pub index: usize,
    pub score: f64,
    pub error: DomainError,
}

/// Headline numbers of one tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub score: f64,
    pub target: String,
    pub steps: usize,
    pub molecules: usize,
    pub purchasable: usize,
}

/// Service assembling search results from flat routes.
pub struct ResultsService {
    builder: TreeBuilder,
    parallel: bool,
}

impl ResultsService {
    /// Create a new results service.
    pub fn new(builder: TreeBuilder, parallel: bool) -> Self {
        Self { builder, parallel }
    }

    /// Build a single route.
    pub fn build(&self, route: &Route) -> ApplicationResult<RetrosynthesisTree> {
        Ok(self.builder.build(route)?)
    }

    /// Build all routes scoring at least `min_score`, best first.
    ///
    /// Invalid routes are logged and reported in `skipped`; they never fail the batch.
    #[instrument(level = "debug", skip(self, routes), fields(routes = routes.len()))]
    pub fn assemble(&self, routes: &[Route], min_score: Option<f64>) -> SearchResults {
        let selected: Vec<(usize, &Route)> = routes
            .iter()
            .enumerate()
            .filter(|(_, route)| min_score.map_or(true, |min| route.score >= min))
            .sorted_by(|(_, a), (_, b)| b.score.total_cmp(&a.score))
            .collect();
        debug!("assemble: {} of {} routes selected", selected.len(), routes.len());

        let built: Vec<(usize, &Route, Result<RetrosynthesisTree, DomainError>)> = if self.parallel {
            selected
                .par_iter()
                .map(|&(index, route)| (index, route, self.builder.build(route)))
                .collect()
        } else {
            selected
                .iter()
                .map(|&(index, route)| (index, route, self.builder.build(route)))
                .collect()
        };

        let mut trees = Vec::with_capacity(built.len());
        let mut skipped = Vec::new();
        for (index, route, result) in built {
            match result {
                Ok(tree) => trees.push(tree),
                Err(error) => {
                    warn!("Failed to build tree for route {}: {}", index, error);
                    skipped.push(SkippedRoute {
                        index,
                        score: route.score,
                        error,
                    });
                }
            }
        }

        SearchResults {
            total_routes: trees.len(),
            routes: trees,
            skipped,
        }
    }

    /// Steps and distinct molecule counts of a tree.
    pub fn summarize(tree: &RetrosynthesisTree) -> RouteSummary {
        let count = tree.count_molecules();
        RouteSummary {
            score: tree.score,
            target: tree.root.smiles.clone(),
            steps: tree.count_steps(),
            molecules: count.total,
            purchasable: count.purchasable,
        }
    }
}

impl Default for ResultsService {
    fn default() -> Self {
        Self::new(TreeBuilder::new(), true)
    }
}
