//! Builder for constructing state machines.

use crate::builder::error::{GraphConsistencyError, Verb};
use crate::builder::validate;
use crate::core::{Outcome, State, StateId, StateTree, TransitionNote};
use crate::logger::{HsmLogger, TracingLogger};
use crate::machine::{Callbacks, EntryAction, ExitAction, Handler, StateMachine};

struct Registration<S: State, C, E> {
    key: S,
    handler: Handler<S, C, E>,
    init: bool,
}

enum Note<S> {
    Transition { from: S, to: S, when: String },
    ExitWhen { state: S, when: String },
    Describe { verb: Verb, state: S, text: String },
}

/// Builder for constructing state machines with a fluent API.
///
/// States are registered by key; a key's name is its full path, so
/// registering `Top_Busy` places it below `Top`. Nothing is checked until
/// [`build`](Self::build), which validates the whole tree at once.
///
/// # Example
///
/// ```rust
/// use hsm::{Outcome, StateMachineBuilder};
///
/// let mut machine = StateMachineBuilder::<&str, u32, &str>::new()
///     .state("Top", |_, _| Outcome::Unhandled)
///     .init_state("Top_Idle", |_, signal| match *signal {
///         "go" => Outcome::transition("Top_Busy"),
///         _ => Outcome::Unhandled,
///     })
///     .state("Top_Busy", |_, signal| match *signal {
///         "go" => Outcome::NoChange,
///         _ => Outcome::Unhandled,
///     })
///     .entry("Top_Busy", |count, _| *count += 1)
///     .build(0)
///     .unwrap();
///
/// machine.dispatch(&"go").unwrap();
/// assert_eq!(*machine.current_state(), "Top_Busy");
/// assert_eq!(*machine.context(), 1);
///
/// // Nobody handles "stop": the machine reports it and stays put.
/// assert!(machine.dispatch(&"stop").is_err());
/// assert_eq!(*machine.current_state(), "Top_Busy");
/// ```
pub struct StateMachineBuilder<S: State, C, E> {
    states: Vec<Registration<S, C, E>>,
    entries: Vec<(S, EntryAction<C, E>)>,
    exits: Vec<(S, ExitAction<C>)>,
    notes: Vec<Note<S>>,
    logger: Option<Box<dyn HsmLogger>>,
}

impl<S: State, C, E> StateMachineBuilder<S, C, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            entries: Vec::new(),
            exits: Vec::new(),
            notes: Vec::new(),
            logger: None,
        }
    }

    /// Register a state and its signal handler.
    pub fn state<F>(self, key: S, handler: F) -> Self
    where
        F: Fn(&mut C, &E) -> Outcome<S> + Send + Sync + 'static,
    {
        self.register(key, Box::new(handler), false)
    }

    /// Register a state that is the init state among its siblings.
    pub fn init_state<F>(self, key: S, handler: F) -> Self
    where
        F: Fn(&mut C, &E) -> Outcome<S> + Send + Sync + 'static,
    {
        self.register(key, Box::new(handler), true)
    }

    /// Attach an entry action to a registered state.
    pub fn entry<F>(mut self, key: S, action: F) -> Self
    where
        F: Fn(&mut C, &E) + Send + Sync + 'static,
    {
        self.entries.push((key, Box::new(action)));
        self
    }

    /// Attach an exit action to a registered state.
    pub fn exit<F>(mut self, key: S, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.exits.push((key, Box::new(action)));
        self
    }

    /// Document the entry action of `key` for diagrams.
    pub fn describe_entry(mut self, key: S, text: impl Into<String>) -> Self {
        self.notes.push(Note::Describe {
            verb: Verb::Entry,
            state: key,
            text: text.into(),
        });
        self
    }

    /// Document the exit action of `key` for diagrams.
    pub fn describe_exit(mut self, key: S, text: impl Into<String>) -> Self {
        self.notes.push(Note::Describe {
            verb: Verb::Exit,
            state: key,
            text: text.into(),
        });
        self
    }

    /// Annotate a transition `from` → `to` that happens `when` ...
    ///
    /// Annotations are documentation only; dispatch never reads them.
    pub fn transition_note(mut self, from: S, to: S, when: impl Into<String>) -> Self {
        self.notes.push(Note::Transition {
            from,
            to,
            when: when.into(),
        });
        self
    }

    /// Annotate that the chart is left from `key` `when` ...
    pub fn exit_note(mut self, key: S, when: impl Into<String>) -> Self {
        self.notes.push(Note::ExitWhen {
            state: key,
            when: when.into(),
        });
        self
    }

    /// Set the logger receiving dispatch traces (default: [`TracingLogger`]).
    pub fn logger(mut self, logger: impl HsmLogger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Validate the registered states and build the machine.
    ///
    /// The machine starts in the leaf reached by following the init chain
    /// from the top. No entry action runs; see
    /// [`StateMachine::start`](crate::StateMachine::start).
    pub fn build(self, context: C) -> Result<StateMachine<S, C, E>, GraphConsistencyError> {
        let mut tree = StateTree::new();
        let mut handlers: Vec<(StateId, Handler<S, C, E>)> = Vec::with_capacity(self.states.len());
        let mut registered: Vec<(StateId, S)> = Vec::with_capacity(self.states.len());

        for Registration { key, handler, init } in self.states {
            let path = key.path()?;
            if let Some(existing) = tree.find(&path) {
                if tree.node(existing).has_handler() {
                    return Err(GraphConsistencyError::DuplicateState { path });
                }
            }
            let id = tree.insert_path(&path);
            tree.set_handler(id, init);
            handlers.push((id, handler));
            registered.push((id, key));
        }

        validate::check_handlers(&tree)?;

        let mut entries: Vec<(StateId, EntryAction<C, E>)> = Vec::with_capacity(self.entries.len());
        for (key, action) in self.entries {
            let id = find_registered(&tree, &key, Verb::Entry)?;
            if tree.node(id).has_entry() {
                return Err(GraphConsistencyError::DuplicateAction {
                    verb: Verb::Entry,
                    path: tree.path(id),
                });
            }
            tree.set_entry(id);
            entries.push((id, action));
        }

        let mut exits: Vec<(StateId, ExitAction<C>)> = Vec::with_capacity(self.exits.len());
        for (key, action) in self.exits {
            let id = find_registered(&tree, &key, Verb::Exit)?;
            if tree.node(id).has_exit() {
                return Err(GraphConsistencyError::DuplicateAction {
                    verb: Verb::Exit,
                    path: tree.path(id),
                });
            }
            tree.set_exit(id);
            exits.push((id, action));
        }

        validate::assign_init_children(&mut tree)?;

        for note in self.notes {
            match note {
                Note::Transition { from, to, when } => {
                    let from = find_annotated(&tree, &from)?;
                    let target = find_annotated(&tree, &to)?;
                    tree.annotations_mut(from)
                        .transitions
                        .push(TransitionNote { target, when });
                }
                Note::ExitWhen { state, when } => {
                    let id = find_annotated(&tree, &state)?;
                    tree.annotations_mut(id).exit_when = Some(when);
                }
                Note::Describe { verb, state, text } => {
                    let id = find_annotated(&tree, &state)?;
                    let annotations = tree.annotations_mut(id);
                    match verb {
                        Verb::Entry => annotations.entry_doc = Some(text),
                        Verb::Exit => annotations.exit_doc = Some(text),
                    }
                }
            }
        }

        let mut callbacks: Vec<Callbacks<S, C, E>> =
            (0..tree.len()).map(|_| Callbacks::default()).collect();
        for (id, handler) in handlers {
            callbacks[id.index()].handler = Some(handler);
        }
        for (id, action) in entries {
            callbacks[id.index()].entry = Some(action);
        }
        for (id, action) in exits {
            callbacks[id.index()].exit = Some(action);
        }

        let logger = self.logger.unwrap_or_else(|| Box::new(TracingLogger));
        Ok(StateMachine::from_parts(
            tree, callbacks, registered, context, logger,
        ))
    }

    fn register(mut self, key: S, handler: Handler<S, C, E>, init: bool) -> Self {
        self.states.push(Registration { key, handler, init });
        self
    }
}

impl<S: State, C, E> Default for StateMachineBuilder<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_registered<S: State>(
    tree: &StateTree,
    key: &S,
    verb: Verb,
) -> Result<StateId, GraphConsistencyError> {
    let path = key.path()?;
    tree.find(&path)
        .filter(|id| tree.node(*id).has_handler())
        .ok_or(GraphConsistencyError::NoCorrespondingState { verb, path })
}

fn find_annotated<S: State>(tree: &StateTree, key: &S) -> Result<StateId, GraphConsistencyError> {
    let path = key.path()?;
    tree.find(&path)
        .filter(|id| tree.node(*id).has_handler())
        .ok_or(GraphConsistencyError::UnregisteredState { path })
}
