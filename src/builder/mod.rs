//! Builder API for state machine construction.
//!
//! This module provides the fluent builder that collects states, handlers and
//! entry/exit actions, the validation run when the machine is finalized, and
//! the `state_enum!` macro for declaring state keys.

pub mod error;
pub mod machine;
pub mod macros;
mod validate;

pub use error::{GraphConsistencyError, Verb};
pub use machine::StateMachineBuilder;

use crate::core::{Outcome, State};

/// Build a handler from a signal → outcome table.
///
/// The first row whose signal equals the dispatched one wins; signals not in
/// the table are unhandled and bubble to the parent state. The context type
/// comes first so it can be named while the others are inferred.
///
/// # Example
///
/// ```
/// use hsm::builder::rules;
/// use hsm::{Outcome, StateMachineBuilder};
///
/// let machine = StateMachineBuilder::<&str, (), char>::new()
///     .state("Top", rules::<(), _, _>(vec![('r', Outcome::transition("Top_A"))]))
///     .init_state("Top_A", rules::<(), _, _>(vec![('b', Outcome::transition("Top_B"))]))
///     .state("Top_B", rules::<(), _, _>(vec![('b', Outcome::ignore().because("already here"))]))
///     .build(())
///     .unwrap();
///
/// assert_eq!(*machine.current_state(), "Top_A");
/// ```
pub fn rules<C, S, E>(
    table: Vec<(E, Outcome<S>)>,
) -> impl Fn(&mut C, &E) -> Outcome<S> + Send + Sync + 'static
where
    S: State + 'static,
    C: 'static,
    E: PartialEq + Send + Sync + 'static,
{
    move |_: &mut C, signal: &E| {
        table
            .iter()
            .find(|(on, _)| on == signal)
            .map_or(Outcome::Unhandled, |(_, outcome)| outcome.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_pick_first_matching_row() {
        let handler = rules::<(), &str, char>(vec![
            ('a', Outcome::transition("A")),
            ('a', Outcome::transition("B")),
            ('n', Outcome::NoChange),
        ]);

        assert_eq!(handler(&mut (), &'a'), Outcome::transition("A"));
        assert_eq!(handler(&mut (), &'n'), Outcome::NoChange);
    }

    #[test]
    fn rules_leave_unknown_signals_unhandled() {
        let handler = rules::<(), &str, char>(vec![('a', Outcome::transition("A"))]);
        assert_eq!(handler(&mut (), &'z'), Outcome::Unhandled);
    }
}
