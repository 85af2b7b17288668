//! Tree builder: turns a flat route graph into a single-rooted retrosynthesis tree.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::entities::{CatalogEntry, Molecule, Reaction, Route};
use crate::domain::error::{BuildLimit, DomainError, DomainResult, RouteStructureError};
use crate::domain::tree::{MoleculeNode, ReactionNode, RetrosynthesisTree};

/// Optional ceilings on tree expansion.
///
/// Reconverging routes are expanded once per path, so node count can grow
/// exponentially with the number of reconvergence points. Both limits are
/// off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildLimits {
    /// Maximum number of molecule node instances in one tree
    pub max_nodes: Option<usize>,
    /// Maximum number of molecules on any root-to-node path
    pub max_depth: Option<usize>,
}

impl BuildLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Lookup tables over one route.
struct RouteIndex<'r> {
    molecules: HashMap<&'r str, &'r Molecule>,
    reactions_by_target: HashMap<&'r str, Vec<&'r Reaction>>,
}

impl<'r> RouteIndex<'r> {
    fn new(route: &'r Route) -> Self {
        // Duplicate smiles: last one wins
        let molecules = route
            .molecules
            .iter()
            .map(|m| (m.smiles.as_str(), m))
            .collect();

        let mut reactions_by_target: HashMap<&str, Vec<&Reaction>> = HashMap::new();
        for reaction in &route.reactions {
            reactions_by_target
                .entry(reaction.target.as_str())
                .or_default()
                .push(reaction);
        }

        Self {
            molecules,
            reactions_by_target,
        }
    }

    /// The one smiles that is produced but never consumed.
    fn root(route: &'r Route) -> DomainResult<&'r str> {
        let targets: HashSet<&str> = route.reactions.iter().map(|r| r.target.as_str()).collect();
        let sources: HashSet<&str> = route
            .reactions
            .iter()
            .flat_map(|r| r.sources.iter().map(String::as_str))
            .collect();

        let roots: Vec<&str> = targets.difference(&sources).copied().collect();
        match roots.as_slice() {
            &[root] => Ok(root),
            _ => {
                debug!("expected exactly one root, found {}: {:?}", roots.len(), roots);
                Err(RouteStructureError::AmbiguousRoot.into())
            }
        }
    }
}

/// Constructs retrosynthesis trees from flat routes.
///
/// Holds no state between builds; one builder can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    limits: BuildLimits,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: BuildLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> BuildLimits {
        self.limits
    }

    /// Build the tree for `route`.
    ///
    /// Fails with `InvalidRouteStructure` when the route does not have exactly
    /// one root or when a smiles is its own ancestor; no partial tree is returned.
    /// Smiles missing from the molecule list become nodes without catalog entries.
    #[instrument(level = "debug", skip_all, fields(score = route.score, reactions = route.reactions.len()))]
    pub fn build(&self, route: &Route) -> DomainResult<RetrosynthesisTree> {
        let root_smiles = RouteIndex::root(route)?;
        let index = RouteIndex::new(route);
        debug!("root: {}", root_smiles);

        let mut expansion = Expansion {
            index: &index,
            limits: self.limits,
            nodes: 0,
            on_path: HashSet::new(),
        };
        let root = expansion.expand(root_smiles)?;
        debug!("built tree with {} nodes", expansion.nodes);

        Ok(RetrosynthesisTree {
            score: route.score,
            root,
        })
    }
}

/// State of a single build.
///
/// Expansion is depth-first over an explicit stack of [`Frame`]s, so route
/// depth is bounded by heap rather than by the thread's stack.
struct Expansion<'i, 'r> {
    index: &'i RouteIndex<'r>,
    limits: BuildLimits,
    nodes: usize,
    /// Smiles of the frames currently on the stack
    on_path: HashSet<&'r str>,
}

/// A molecule whose reactions are being expanded.
struct Frame<'i, 'r> {
    smiles: &'r str,
    catalog_entries: Vec<CatalogEntry>,
    producing: &'i [&'r Reaction],
    reaction: usize,
    source: usize,
    reactants: Vec<MoleculeNode>,
    reactions: Vec<ReactionNode>,
}

impl<'i, 'r> Frame<'i, 'r> {
    /// Next source to expand, closing every reaction whose sources are all built.
    fn next_source(&mut self) -> Option<&'r str> {
        while let Some(&reaction) = self.producing.get(self.reaction) {
            if let Some(source) = reaction.sources.get(self.source) {
                self.source += 1;
                return Some(source.as_str());
            }
            self.reactions.push(ReactionNode {
                name: reaction.name.clone(),
                reactants: std::mem::take(&mut self.reactants),
            });
            self.reaction += 1;
            self.source = 0;
        }
        None
    }

    fn finish(self) -> MoleculeNode {
        MoleculeNode::new(self.smiles, self.catalog_entries, self.reactions)
    }
}

impl<'i, 'r> Expansion<'i, 'r> {
    fn expand(&mut self, smiles: &'r str) -> DomainResult<MoleculeNode> {
        let mut root = self.enter(smiles, 1)?;
        // Frames below the root, deepest last
        let mut stack: Vec<Frame<'i, 'r>> = Vec::new();

        loop {
            let top = stack.last_mut().unwrap_or(&mut root);
            if let Some(source) = top.next_source() {
                let frame = self.enter(source, stack.len() + 2)?;
                stack.push(frame);
                continue;
            }

            match stack.pop() {
                Some(done) => {
                    self.on_path.remove(done.smiles);
                    let node = done.finish();
                    stack.last_mut().unwrap_or(&mut root).reactants.push(node);
                }
                None => return Ok(root.finish()),
            }
        }
    }

    /// Open a frame for `smiles` at `depth` (root = 1).
    fn enter(&mut self, smiles: &'r str, depth: usize) -> DomainResult<Frame<'i, 'r>> {
        if self.on_path.contains(smiles) {
            debug!("cycle at smiles: {}", smiles);
            return Err(RouteStructureError::CycleDetected.into());
        }
        self.check_limits(smiles, depth)?;
        trace!("expand {} at depth {}", smiles, depth);
        self.on_path.insert(smiles);

        let index = self.index;
        Ok(Frame {
            smiles,
            catalog_entries: index
                .molecules
                .get(smiles)
                .map(|m| m.catalog_entries.clone())
                .unwrap_or_default(),
            producing: index
                .reactions_by_target
                .get(smiles)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            reaction: 0,
            source: 0,
            reactants: Vec::new(),
            reactions: Vec::new(),
        })
    }

    fn check_limits(&mut self, smiles: &str, depth: usize) -> DomainResult<()> {
        self.nodes += 1;
        if let Some(max) = self.limits.max_nodes {
            if self.nodes > max {
                return Err(DomainError::BuildLimitExceeded {
                    limit: BuildLimit::MaxNodes(max),
                    smiles: smiles.to_string(),
                });
            }
        }
        if let Some(max) = self.limits.max_depth {
            if depth > max {
                return Err(DomainError::BuildLimitExceeded {
                    limit: BuildLimit::MaxDepth(max),
                    smiles: smiles.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Build a tree with no expansion limits.
pub fn build_tree(route: &Route) -> DomainResult<RetrosynthesisTree> {
    TreeBuilder::new().build(route)
}
