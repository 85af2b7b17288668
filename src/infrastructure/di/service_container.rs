//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::ResultsService;
use crate::config::Settings;
use crate::domain::TreeBuilder;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Tree builder configured with the settings' limits
    pub builder: TreeBuilder,

    /// Result assembly
    pub results: ResultsService,
}

impl ServiceContainer {
    /// Create a new service container from settings.
    pub fn new(settings: Settings) -> Self {
        let builder = TreeBuilder::with_limits(settings.limits);
        let results = ResultsService::new(builder, settings.results.parallel);

        Self {
            settings: Arc::new(settings),
            builder,
            results,
        }
    }
}
