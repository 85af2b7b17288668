//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services receive already-loaded routes; I/O stays in the infrastructure layer.

mod results;

pub use results::{ResultsService, RouteSummary, SearchResults, SkippedRoute};
