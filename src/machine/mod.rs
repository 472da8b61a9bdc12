//! The running state machine and its dispatch engine.

mod error;
mod transition;

pub use error::{DispatchError, InvalidStateReference};
pub use transition::TransitionPlan;

use crate::core::{Outcome, State, StateId, StatePath, StateTree};
use crate::diagram::{self, DiagramConfig};
use crate::logger::HsmLogger;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

/// Signal handler of one state.
pub type Handler<S, C, E> = Box<dyn Fn(&mut C, &E) -> Outcome<S> + Send + Sync>;

/// Entry action; receives the signal that caused the transition.
pub type EntryAction<C, E> = Box<dyn Fn(&mut C, &E) + Send + Sync>;

/// Exit action.
pub type ExitAction<C> = Box<dyn Fn(&mut C) + Send + Sync>;

pub(crate) struct Callbacks<S: State, C, E> {
    pub(crate) handler: Option<Handler<S, C, E>>,
    pub(crate) entry: Option<EntryAction<C, E>>,
    pub(crate) exit: Option<ExitAction<C>>,
}

impl<S: State, C, E> Default for Callbacks<S, C, E> {
    fn default() -> Self {
        Self {
            handler: None,
            entry: None,
            exit: None,
        }
    }
}

/// What a call to [`StateMachine::dispatch`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchResult<S: State> {
    /// A handler claimed the signal and kept the state.
    NoChange,

    /// A handler claimed the signal and ignored it.
    Ignored { reason: Option<String> },

    /// The machine moved from leaf `from` to leaf `to`. Both are equal for a
    /// self-transition.
    Transitioned {
        from: S,
        to: S,
        reason: Option<String>,
    },
}

/// A finalized hierarchical state machine.
///
/// `S` is the state key, `C` the context every callback may mutate and `E`
/// the signal type. Built with [`StateMachineBuilder`](crate::StateMachineBuilder);
/// after that only the current leaf changes.
pub struct StateMachine<S: State, C, E> {
    tree: StateTree,
    callbacks: Vec<Callbacks<S, C, E>>,
    keys: Vec<Option<S>>,
    ids: HashMap<S, StateId>,
    current: StateId,
    context: C,
    logger: Box<dyn HsmLogger>,
}

impl<S: State, C, E> StateMachine<S, C, E> {
    pub(crate) fn from_parts(
        tree: StateTree,
        callbacks: Vec<Callbacks<S, C, E>>,
        registered: Vec<(StateId, S)>,
        context: C,
        logger: Box<dyn HsmLogger>,
    ) -> Self {
        let mut keys: Vec<Option<S>> = (0..tree.len()).map(|_| None).collect();
        let mut ids = HashMap::with_capacity(registered.len());
        for (id, key) in registered {
            ids.insert(key.clone(), id);
            keys[id.index()] = Some(key);
        }
        let current = tree.resolve_init(tree.root());
        Self {
            tree,
            callbacks,
            keys,
            ids,
            current,
            context,
            logger,
        }
    }

    /// Key of the current leaf state (pure)
    pub fn current_state(&self) -> &S {
        self.key(self.current)
    }

    pub fn current_id(&self) -> StateId {
        self.current
    }

    pub fn current_path(&self) -> StatePath {
        self.tree.path(self.current)
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Replace the logger receiving dispatch traces.
    pub fn set_logger(&mut self, logger: impl HsmLogger + 'static) {
        self.logger = Box::new(logger);
    }

    /// Tree node registered for `state`.
    pub fn state_id(&self, state: &S) -> Result<StateId, InvalidStateReference> {
        self.ids
            .get(state)
            .copied()
            .ok_or_else(|| InvalidStateReference {
                state: format!("{state:?}"),
            })
    }

    /// Key registered for a tree node; `None` for the top of the tree.
    pub fn key_of(&self, id: StateId) -> Option<&S> {
        self.keys.get(id.index()).and_then(Option::as_ref)
    }

    /// Check that every key belongs to this machine.
    pub fn ensure_known(&self, states: &[S]) -> Result<(), InvalidStateReference> {
        states.iter().try_for_each(|state| self.state_id(state).map(|_| ()))
    }

    /// True if the machine is in `state` or in one of its substates.
    pub fn is_state(&self, state: &S) -> Result<bool, InvalidStateReference> {
        let id = self.state_id(state)?;
        Ok(id == self.current || self.tree.is_ancestor_of(id, self.current))
    }

    /// True if [`is_state`](Self::is_state) holds for any of `states`.
    pub fn is_any_state(&self, states: &[S]) -> Result<bool, InvalidStateReference> {
        self.ensure_known(states)?;
        for state in states {
            if self.is_state(state)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Jump to `state` without running any entry or exit action.
    ///
    /// Composite states are resolved through their init chain so the machine
    /// always rests in a leaf.
    pub fn force_state(&mut self, state: &S) -> Result<(), InvalidStateReference> {
        let id = self.state_id(state)?;
        self.current = self.tree.resolve_init(id);
        self.logger
            .log_info(&format!("force_state({})", self.tree.full_name(self.current)));
        Ok(())
    }

    /// Render the state tree as a mermaid `stateDiagram-v2`.
    pub fn to_mermaid(&self, config: &DiagramConfig) -> String {
        diagram::render(&self.tree, config)
    }

    /// Write the diagram as a fenced mermaid block to a markdown file.
    pub fn write_mermaid_md(
        &self,
        path: impl AsRef<Path>,
        config: &DiagramConfig,
    ) -> std::io::Result<()> {
        std::fs::write(path, diagram::render_markdown(&self.tree, config))
    }

    fn key(&self, id: StateId) -> &S {
        self.key_of(id)
            .expect("every state below the top of the tree carries a key")
    }
}

impl<S: State, C, E: Display> StateMachine<S, C, E> {
    /// Deliver `signal` to the current state.
    ///
    /// The signal bubbles from the current leaf towards the top until a
    /// handler claims it. A transition resolves its target to a leaf, runs
    /// the exit actions up to the common ancestor and the entry actions down
    /// to the new leaf, then moves the machine.
    ///
    /// Errors leave the machine in its previous state.
    pub fn dispatch(&mut self, signal: &E) -> Result<DispatchResult<S>, DispatchError> {
        let before = self.current;
        self.logger.log_info(&format!(
            "'{signal}': will be handled by {}",
            self.tree.full_name(before)
        ));

        let mut handling = before;
        let (target, reason) = loop {
            self.logger.log_debug(&format!(
                "calling handler {}({signal})",
                self.tree.full_name(handling)
            ));
            let outcome = match &self.callbacks[handling.index()].handler {
                Some(handler) => handler(&mut self.context, signal),
                None => Outcome::Unhandled,
            };
            match outcome {
                Outcome::Unhandled => match self.tree.parent(handling) {
                    Some(parent) if self.callbacks[parent.index()].handler.is_some() => {
                        handling = parent;
                    }
                    _ => {
                        return Err(DispatchError::UnhandledSignal {
                            signal: signal.to_string(),
                            path: self.tree.full_name(before),
                        });
                    }
                },
                Outcome::NoChange => {
                    self.logger.log_debug("No state change!");
                    return Ok(DispatchResult::NoChange);
                }
                Outcome::Ignore { reason } => {
                    match &reason {
                        Some(why) => self
                            .logger
                            .log_debug(&format!("Empty transition! ({why})")),
                        None => self.logger.log_debug("Empty transition!"),
                    }
                    return Ok(DispatchResult::Ignored { reason });
                }
                Outcome::TransitionTo { target, reason } => break (target, reason),
            }
        };

        self.logger.log_debug(&format!(
            "{signal}: was handled by {}",
            self.tree.full_name(handling)
        ));
        let target_id = self.state_id(&target)?;
        let after = self.tree.resolve_init(target_id);
        if after != target_id {
            self.logger.log_debug(&format!(
                "Init-State for {} is {}.",
                self.tree.full_name(target_id),
                self.tree.full_name(after)
            ));
        }

        let plan = TransitionPlan::between(&self.tree, before, after);
        self.run_plan(&plan, signal);
        self.current = after;

        self.logger.on_state_change(
            &self.tree.path(before),
            &self.tree.path(after),
            reason.as_deref(),
        );
        Ok(DispatchResult::Transitioned {
            from: self.key(before).clone(),
            to: self.key(after).clone(),
            reason,
        })
    }

    /// Run the entry actions from the top of the tree down to the current
    /// leaf, passing `signal` as the triggering signal.
    pub fn start(&mut self, signal: &E) {
        self.logger.log_info(&format!(
            "'{signal}': entering {}",
            self.tree.full_name(self.current)
        ));
        let plan = TransitionPlan::entering(&self.tree, self.current);
        self.run_plan(&plan, signal);
    }

    fn run_plan(&mut self, plan: &TransitionPlan, signal: &E) {
        for node in &plan.exits {
            if let Some(exit) = &self.callbacks[node.index()].exit {
                self.logger
                    .log_debug(&format!("Calling exit_{}", self.tree.full_name(*node)));
                exit(&mut self.context);
            }
        }
        for node in &plan.entries {
            if let Some(entry) = &self.callbacks[node.index()].entry {
                self.logger
                    .log_debug(&format!("Calling entry_{}", self.tree.full_name(*node)));
                entry(&mut self.context, signal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::RecordingLogger;
    use crate::StateMachineBuilder;

    type Machine = StateMachine<&'static str, u32, &'static str>;

    fn machine(logger: &RecordingLogger) -> Machine {
        StateMachineBuilder::<&'static str, u32, &'static str>::new()
            .state("Top", |_, _| Outcome::Unhandled)
            .init_state("Top_Idle", |count, signal| match *signal {
                "go" => {
                    *count += 1;
                    Outcome::transition("Top_Busy")
                }
                _ => Outcome::Unhandled,
            })
            .state("Top_Busy", |_, _| Outcome::transition("Top"))
            .logger(logger.clone())
            .build(0)
            .unwrap()
    }

    #[test]
    fn keys_map_to_tree_nodes() {
        let machine = machine(&RecordingLogger::new());
        let busy = machine.state_id(&"Top_Busy").unwrap();

        assert_eq!(machine.key_of(busy), Some(&"Top_Busy"));
        assert_eq!(machine.key_of(StateId::ROOT), None);
        assert_eq!(machine.current_path().full_name(), "Top_Idle");
        assert!(machine.state_id(&"Top_Gone").is_err());
    }

    #[test]
    fn transition_to_composite_resolves_init_leaf() {
        let mut machine = machine(&RecordingLogger::new());
        machine.dispatch(&"go").unwrap();
        let result = machine.dispatch(&"anything").unwrap();

        assert_eq!(
            result,
            DispatchResult::Transitioned {
                from: "Top_Busy",
                to: "Top_Idle",
                reason: None,
            }
        );
        assert_eq!(machine.into_context(), 1);
    }

    #[test]
    fn set_logger_redirects_traces() {
        let first = RecordingLogger::new();
        let second = RecordingLogger::new();
        let mut machine = machine(&first);

        machine.set_logger(second.clone());
        machine.dispatch(&"go").unwrap();

        assert!(first.lines().is_empty());
        assert_eq!(second.lines()[0], "'go': will be handled by Top_Idle");
    }

    #[test]
    fn unhandled_signal_reports_starting_leaf() {
        let mut machine = machine(&RecordingLogger::new());
        *machine.context_mut() = 7;

        let err = machine.dispatch(&"stop").unwrap_err();
        assert!(matches!(err, DispatchError::UnhandledSignal { ref path, .. } if path == "Top_Idle"));
        assert_eq!(*machine.context(), 7);
    }

    #[test]
    fn mermaid_markdown_is_written_to_disk() {
        let machine = machine(&RecordingLogger::new());
        let file = std::env::temp_dir().join(format!("hsm-diagram-{}.md", std::process::id()));

        machine
            .write_mermaid_md(&file, &DiagramConfig::default())
            .unwrap();
        let written = std::fs::read_to_string(&file).unwrap();
        std::fs::remove_file(&file).unwrap();

        assert!(written.starts_with("```mermaid\nstateDiagram-v2\n"));
        assert!(written.contains("[*] --> Top_Idle"));
    }
}
