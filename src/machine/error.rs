//! Errors raised by a running state machine.

use thiserror::Error;

/// A state key that is not part of this machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("state `{state}` is not a state of this state machine")]
pub struct InvalidStateReference {
    /// Debug rendering of the offending key.
    pub state: String,
}

/// Errors that can occur while dispatching a signal.
///
/// The machine keeps its previous state whenever one of these is returned and
/// may keep receiving signals.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("signal {signal} was not handled by `{path}` or any of its outer states")]
    UnhandledSignal { signal: String, path: String },

    #[error("handler returned an invalid transition target: {0}")]
    InvalidTarget(#[from] InvalidStateReference),
}
