//! Retrosynthesis tree: the hierarchical form of a route, plus traversal helpers.
//!
//! A smiles reached through several branches appears once per branch, so every
//! count here states whether it counts node instances or distinct smiles.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::CatalogEntry;

/// A molecule in the tree together with the reactions producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeNode {
    pub smiles: String,
    pub catalog_entries: Vec<CatalogEntry>,
    pub is_purchasable: bool,
    pub reactions: Vec<ReactionNode>,
}

/// A reaction with one child node per source, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionNode {
    pub name: String,
    pub reactants: Vec<MoleculeNode>,
}

/// Root of a built route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrosynthesisTree {
    pub score: f64,
    pub root: MoleculeNode,
}

/// Distinct molecules in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoleculeCount {
    pub total: usize,
    pub purchasable: usize,
}

impl MoleculeNode {
    /// Build a node; `is_purchasable` is derived from the catalog entries.
    pub fn new(
        smiles: impl Into<String>,
        catalog_entries: Vec<CatalogEntry>,
        reactions: Vec<ReactionNode>,
    ) -> Self {
        let is_purchasable = !catalog_entries.is_empty();
        Self {
            smiles: smiles.into(),
            catalog_entries,
            is_purchasable,
            reactions,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Child molecule nodes across all reactions, in order.
    pub fn reactants(&self) -> impl Iterator<Item = &MoleculeNode> {
        self.reactions.iter().flat_map(|r| r.reactants.iter())
    }

    /// Reaction levels on the longest root-to-leaf path.
    #[instrument(level = "trace", skip(self), fields(smiles = %self.smiles))]
    pub fn count_steps(&self) -> usize {
        let mut walk = self.iter();
        let mut steps = 0;
        while let Some((node, level)) = walk.next_with_level() {
            // a reaction without reactants still counts as a step
            steps = steps.max(level + usize::from(!node.is_leaf()));
        }
        steps
    }

    /// Molecules on the longest root-to-leaf path; a lone node has depth 1.
    pub fn depth(&self) -> usize {
        let mut walk = self.iter();
        let mut depth = 0;
        while let Some((_, level)) = walk.next_with_level() {
            depth = depth.max(level + 1);
        }
        depth
    }

    /// Number of node instances, repeated smiles included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Distinct smiles; a repeated smiles takes purchasability from its first pre-order occurrence.
    #[instrument(level = "debug", skip(self), fields(smiles = %self.smiles))]
    pub fn count_molecules(&self) -> MoleculeCount {
        let mut seen = HashSet::new();
        let mut count = MoleculeCount::default();
        for node in self.iter() {
            if seen.insert(node.smiles.as_str()) {
                count.total += 1;
                if node.is_purchasable {
                    count.purchasable += 1;
                }
            }
        }
        count
    }

    /// Leaf smiles in pre-order, duplicates kept.
    pub fn leaves(&self) -> Vec<String> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.smiles.clone())
            .collect()
    }

    /// Pre-order, left-to-right in reactant order.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }
}

impl RetrosynthesisTree {
    pub fn count_steps(&self) -> usize {
        self.root.count_steps()
    }

    pub fn count_molecules(&self) -> MoleculeCount {
        self.root.count_molecules()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaves(&self) -> Vec<String> {
        self.root.leaves()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        self.root.iter()
    }
}

/// Pre-order walk over an explicit stack.
pub struct TreeIterator<'a> {
    stack: Vec<(&'a MoleculeNode, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(root: &'a MoleculeNode) -> Self {
        Self {
            stack: vec![(root, 0)],
        }
    }

    /// Next node with its level below the start node (start = 0).
    pub fn next_with_level(&mut self) -> Option<(&'a MoleculeNode, usize)> {
        let (current, level) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(
            current
                .reactions
                .iter()
                .rev()
                .flat_map(|r| r.reactants.iter().rev())
                .map(|child| (child, level + 1)),
        );
        Some((current, level))
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a MoleculeNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_with_level().map(|(node, _)| node)
    }
}

// Unlinks children before they drop so deep trees do not recurse.
impl Drop for MoleculeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.reactions);
        while let Some(mut reaction) = pending.pop() {
            for mut reactant in reaction.reactants.drain(..) {
                pending.append(&mut reactant.reactions);
            }
        }
    }
}

/// Rendering for display; recursive, so meant for trees a terminal can show.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for MoleculeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.is_purchasable {
            format!("{} [purchasable]", self.smiles)
        } else {
            self.smiles.clone()
        };

        let leaves: Vec<_> = self
            .reactions
            .iter()
            .map(|reaction| {
                Tree::new(format!("⟵ {}", reaction.name)).with_leaves(
                    reaction
                        .reactants
                        .iter()
                        .map(|reactant| reactant.to_tree_string()),
                )
            })
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for RetrosynthesisTree {
    fn to_tree_string(&self) -> Tree<String> {
        self.root.to_tree_string()
    }
}
