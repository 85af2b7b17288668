//! I/O boundary traits for testability
//!
//! Route data reaches the services through these traits, so services can be
//! tested with in-memory routes.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Route, SearchUpdate};
use crate::infrastructure::{InfraError, InfraResult};

/// Source of flat routes.
pub trait RouteSource: Send + Sync {
    /// Load all routes.
    fn load_routes(&self) -> InfraResult<Vec<Route>>;
}

/// Accepted layouts of a route file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RouteFile {
    Routes(Vec<Route>),
    Update(SearchUpdate),
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// JSON file holding either an array of routes or one search update.
#[derive(Debug, Clone)]
pub struct JsonFileRouteSource {
    path: PathBuf,
}

impl JsonFileRouteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteSource for JsonFileRouteSource {
    fn load_routes(&self) -> InfraResult<Vec<Route>> {
        let content = read_file(&self.path)?;
        let routes = match serde_json::from_str::<RouteFile>(&content)
            .map_err(|e| InfraError::parse(self.path.display().to_string(), e))?
        {
            RouteFile::Routes(routes) => routes,
            RouteFile::Update(update) => update.routes,
        };
        debug!("loaded {} routes from {}", routes.len(), self.path.display());
        Ok(routes)
    }
}

/// Routes held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteSource {
    routes: Vec<Route>,
}

impl InMemoryRouteSource {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }
}

impl RouteSource for InMemoryRouteSource {
    fn load_routes(&self) -> InfraResult<Vec<Route>> {
        Ok(self.routes.clone())
    }
}

/// Read a search update JSON file.
pub fn load_update(path: &Path) -> InfraResult<SearchUpdate> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| InfraError::parse(path.display().to_string(), e))
}

fn read_file(path: &Path) -> InfraResult<String> {
    std::fs::read_to_string(path).map_err(|e| InfraError::io(format!("read {}", path.display()), e))
}
