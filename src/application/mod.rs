//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic for batches of routes and search updates.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
