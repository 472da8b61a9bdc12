//! Property-based tests for init resolution and transition ordering.
//!
//! These tests use proptest to build random state trees and check that
//! dispatch runs the right callbacks in the right order.

use hsm::{DispatchResult, Outcome, RecordingLogger, StateId, StateMachine, StateMachineBuilder};
use proptest::prelude::*;
use proptest::sample::Index;

type Trace = Vec<String>;
type Machine = StateMachine<String, Trace, String>;

/// Top-level states handle everything; nested states defer to them.
fn top_handler(_: &mut Trace, signal: &String) -> Outcome<String> {
    match signal.as_str() {
        "stay" => Outcome::NoChange,
        "skip" => Outcome::ignore(),
        target => Outcome::transition(target.to_string()),
    }
}

fn defer(_: &mut Trace, _: &String) -> Outcome<String> {
    Outcome::Unhandled
}

/// Full names and init flags of a random tree.
///
/// Node `k` hangs below a node registered before it (or the top); the first
/// child of every node is its init state.
fn state_names(parents: &[Index]) -> Vec<(String, bool)> {
    let mut has_child = vec![false; parents.len() + 1];
    let mut states: Vec<(String, bool)> = Vec::with_capacity(parents.len());
    for (i, choice) in parents.iter().enumerate() {
        let k = i + 1;
        let parent = choice.index(k);
        let name = if parent == 0 {
            format!("S{k}")
        } else {
            format!("{}_S{k}", states[parent - 1].0)
        };
        states.push((name, !has_child[parent]));
        has_child[parent] = true;
    }
    states
}

fn build(states: &[(String, bool)]) -> Machine {
    let mut builder = StateMachineBuilder::<String, Trace, String>::new();
    for (name, init) in states {
        let handler: fn(&mut Trace, &String) -> Outcome<String> = if name.contains('_') {
            defer
        } else {
            top_handler
        };
        builder = if *init {
            builder.init_state(name.clone(), handler)
        } else {
            builder.state(name.clone(), handler)
        };
        let entered = format!("entry {name}");
        let exited = format!("exit {name}");
        builder = builder
            .entry(name.clone(), move |trace: &mut Trace, _: &String| {
                trace.push(entered.clone())
            })
            .exit(name.clone(), move |trace: &mut Trace| trace.push(exited.clone()));
    }
    builder
        .logger(RecordingLogger::new())
        .build(Vec::new())
        .expect("generated trees are consistent")
}

fn parent_name(name: &str) -> Option<&str> {
    name.rsplit_once('_').map(|(parent, _)| parent)
}

fn check_transition(machine: &mut Machine, target: &str) -> Result<(), TestCaseError> {
    let before = machine.current_id();
    let target_id = machine.state_id(&target.to_string()).unwrap();
    let tree = machine.tree();
    let after = tree.resolve_init(target_id);
    let ancestor = tree.common_ancestor(before, after);
    let exit_count = tree.depth(before) - tree.depth(ancestor);
    let entry_count = tree.depth(after) - tree.depth(ancestor);
    let before_name = tree.full_name(before);
    let after_name = tree.full_name(after);

    machine.context_mut().clear();
    let result = machine.dispatch(&target.to_string()).unwrap();
    let moved = matches!(result, DispatchResult::Transitioned { .. });
    prop_assert!(moved);
    prop_assert_eq!(machine.current_id(), after);

    let trace = machine.context();
    let exits: Vec<&str> = trace
        .iter()
        .map_while(|line| line.strip_prefix("exit "))
        .collect();
    let entries: Vec<&str> = trace[exits.len()..]
        .iter()
        .filter_map(|line| line.strip_prefix("entry "))
        .collect();
    prop_assert_eq!(exits.len() + entries.len(), trace.len());
    prop_assert_eq!(exits.len(), exit_count);
    prop_assert_eq!(entries.len(), entry_count);

    // Exits climb from the old leaf, entries descend to the new one.
    if let Some(first) = exits.first() {
        prop_assert_eq!(*first, before_name.as_str());
    }
    for pair in exits.windows(2) {
        prop_assert_eq!(parent_name(pair[0]), Some(pair[1]));
    }
    if let Some(last) = entries.last() {
        prop_assert_eq!(*last, after_name.as_str());
    }
    for pair in entries.windows(2) {
        prop_assert_eq!(Some(pair[0]), parent_name(pair[1]));
    }
    Ok(())
}

prop_compose! {
    fn arbitrary_tree()(parents in prop::collection::vec(any::<Index>(), 1..12)) -> Vec<(String, bool)> {
        state_names(&parents)
    }
}

proptest! {
    #[test]
    fn init_resolution_ends_in_a_leaf(states in arbitrary_tree()) {
        let machine = build(&states);
        let tree = machine.tree();

        for id in tree.iter() {
            let leaf = tree.resolve_init(id);
            prop_assert!(tree.is_leaf(leaf));
            prop_assert_eq!(tree.resolve_init(leaf), leaf);
            prop_assert!(leaf == id || tree.is_ancestor_of(id, leaf));
        }
        prop_assert!(tree.is_leaf(machine.current_id()));
    }

    #[test]
    fn transitions_exit_then_enter_in_tree_order(
        states in arbitrary_tree(),
        targets in prop::collection::vec(any::<Index>(), 1..20),
    ) {
        let mut machine = build(&states);
        for target in targets {
            let (name, _) = target.get(&states);
            check_transition(&mut machine, name)?;
        }
    }

    #[test]
    fn claimed_signals_without_transition_change_nothing(
        states in arbitrary_tree(),
        start in any::<Index>(),
        signal in prop::sample::select(vec!["stay", "skip"]),
    ) {
        let mut machine = build(&states);
        let (name, _) = start.get(&states);
        machine.force_state(name).unwrap();
        let before: StateId = machine.current_id();

        let result = machine.dispatch(&signal.to_string()).unwrap();
        let moved = matches!(result, DispatchResult::Transitioned { .. });
        prop_assert!(!moved);
        prop_assert_eq!(machine.current_id(), before);
        prop_assert!(machine.context().is_empty());
    }

    #[test]
    fn self_transition_runs_no_actions(states in arbitrary_tree(), start in any::<Index>()) {
        let mut machine = build(&states);
        let (name, _) = start.get(&states);
        machine.force_state(name).unwrap();
        let leaf = machine.tree().full_name(machine.current_id());

        let result = machine.dispatch(&leaf).unwrap();
        prop_assert_eq!(
            result,
            DispatchResult::Transitioned {
                from: leaf.clone(),
                to: leaf.clone(),
                reason: None,
            }
        );
        prop_assert!(machine.context().is_empty());
    }
}
