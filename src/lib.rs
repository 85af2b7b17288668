//! retrotree: retrosynthesis route trees
//!
//! Converts flat route graphs (molecules plus reactions referencing them by
//! SMILES) into single-rooted trees, tracks search status as result batches
//! arrive, and summarizes trees for display.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_tree, next_status, RetrosynthesisTree, Route, SearchStatus, TreeBuilder};
