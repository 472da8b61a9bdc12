//! Structural checks run once while a machine is finalized.

use crate::builder::error::GraphConsistencyError;
use crate::core::{StateId, StateTree};

/// Every node below the top of the tree must have a handler.
///
/// Nodes are checked depth-first, so for a lone `TopA_SubB` the missing
/// outer state `TopA` is reported.
pub(crate) fn check_handlers(tree: &StateTree) -> Result<(), GraphConsistencyError> {
    match tree
        .iter()
        .filter(|id| *id != tree.root())
        .find(|id| !tree.node(*id).has_handler())
    {
        Some(loose) => Err(GraphConsistencyError::MissingHandler {
            path: tree.path(loose),
        }),
        None => Ok(()),
    }
}

/// Pick the init child of every composite node.
///
/// A single child is the init child whether or not it carries the marker.
/// With two or more children exactly one must be marked.
pub(crate) fn assign_init_children(tree: &mut StateTree) -> Result<(), GraphConsistencyError> {
    if tree.children(tree.root()).is_empty() {
        return Err(GraphConsistencyError::NoStates);
    }

    let mut assignments: Vec<(StateId, StateId)> = Vec::new();
    for id in tree.iter() {
        match tree.children(id) {
            [] => {}
            [only] => assignments.push((id, *only)),
            children => {
                let mut marked = children
                    .iter()
                    .copied()
                    .filter(|child| tree.node(*child).is_init_marked());
                let init = marked.next();
                if marked.next().is_some() {
                    return Err(GraphConsistencyError::MultipleInitStates {
                        path: tree.path(id),
                    });
                }
                match init {
                    Some(init) => assignments.push((id, init)),
                    None if id == tree.root() => {
                        return Err(GraphConsistencyError::NoTopLevelInit)
                    }
                    None => {
                        return Err(GraphConsistencyError::NoInitState {
                            path: tree.path(id),
                        })
                    }
                }
            }
        }
    }

    for (parent, init) in assignments {
        tree.set_init_child(parent, init);
    }
    Ok(())
}
