//! Core types of the state machine.
//!
//! This module contains the structural model the dispatch engine runs on:
//! - State keys via the `State` trait
//! - Paths naming a state's position in the hierarchy
//! - The frozen state tree and its pure queries
//! - The closed set of handler outcomes
//!
//! Nothing in here invokes user callbacks.

mod outcome;
mod path;
mod state;
mod tree;

pub use outcome::Outcome;
pub use path::{InvalidPath, StatePath};
pub use state::State;
pub use tree::{
    Ancestors, Annotations, DepthFirst, StateId, StateNode, StateTree, TransitionNote,
};
