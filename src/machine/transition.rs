//! Exit and entry chains of a transition.

use crate::core::{StateId, StateTree};

/// The ordered callback chains a transition crosses.
///
/// Computed purely from the tree; the machine then runs the exit actions of
/// `exits` followed by the entry actions of `entries`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    /// The deepest node both leaves share. It stays active throughout.
    pub ancestor: StateId,
    /// From the old leaf up to, not including, the ancestor.
    pub exits: Vec<StateId>,
    /// From just below the ancestor down to, and including, the new leaf.
    pub entries: Vec<StateId>,
}

impl TransitionPlan {
    /// Plan the move from leaf `before` to leaf `after`.
    ///
    /// Both chains are empty for a self-transition.
    pub fn between(tree: &StateTree, before: StateId, after: StateId) -> Self {
        let ancestor = tree.common_ancestor(before, after);
        let exits = tree
            .ancestors(before)
            .take_while(|node| *node != ancestor)
            .collect();
        let mut entries: Vec<StateId> = tree
            .ancestors(after)
            .take_while(|node| *node != ancestor)
            .collect();
        entries.reverse();
        Self {
            ancestor,
            exits,
            entries,
        }
    }

    /// Plan the initial entry from the top of the tree down to `leaf`.
    pub fn entering(tree: &StateTree, leaf: StateId) -> Self {
        Self::between(tree, tree.root(), leaf)
    }

    pub fn is_empty(&self) -> bool {
        self.exits.is_empty() && self.entries.is_empty()
    }
}
