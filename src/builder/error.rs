//! Build errors raised while finalizing a state machine.

use crate::core::{InvalidPath, StatePath};
use std::fmt;
use thiserror::Error;

/// Kind of callback attached to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Entry,
    Exit,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// The registered states do not form a valid state tree.
///
/// Raised once by [`StateMachineBuilder::build`](crate::StateMachineBuilder::build);
/// no machine exists when this is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphConsistencyError {
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    #[error("state `{path}` registered more than once")]
    DuplicateState { path: StatePath },

    #[error("`{verb}_{path}` registered more than once")]
    DuplicateAction { verb: Verb, path: StatePath },

    #[error("missing handler for `{path}`")]
    MissingHandler { path: StatePath },

    #[error("no corresponding state for `{verb}_{path}`")]
    NoCorrespondingState { verb: Verb, path: StatePath },

    #[error("no init state below `{path}`: mark exactly one substate as init")]
    NoInitState { path: StatePath },

    #[error("only one init allowed below `{path}`")]
    MultipleInitStates { path: StatePath },

    #[error("no top-level init state: mark exactly one top-level state as init")]
    NoTopLevelInit,

    #[error("no states registered")]
    NoStates,

    #[error("annotation refers to unregistered state `{path}`")]
    UnregisteredState { path: StatePath },
}
