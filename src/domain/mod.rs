//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod tree;

pub use builder::{build_tree, BuildLimits, TreeBuilder};
pub use entities::*;
pub use error::{BuildLimit, DomainError, DomainResult, RouteStructureError};
pub use lifecycle::{next_status, SearchRecord, SearchStatus, StatusUpdate};
pub use tree::{
    MoleculeCount, MoleculeNode, ReactionNode, RetrosynthesisTree, TreeIterator, TreeNodeConvert,
};
