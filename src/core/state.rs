//! State keys.
//!
//! Every state registered with a machine is identified by a key. The key is
//! what handlers return to name a transition target and what callers pass to
//! queries such as [`StateMachine::is_state`](crate::StateMachine::is_state).

use super::path::{InvalidPath, StatePath};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state keys.
///
/// The key's [`name`](State::name) is the full name of the state: its path
/// segments joined with `_`. A key named `0_2_1` therefore lives below the
/// keys named `0_2` and `0`, which must be registered as well.
///
/// # Required Traits
///
/// - `Clone`: keys are handed back from handlers and stored in the machine
/// - `Eq` + `Hash`: keys index the key → state map
/// - `Debug`: keys appear in error messages
///
/// # Example
///
/// ```rust
/// use hsm::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Closed,
///     Opened,
///     ClosedLocked,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opened => "Opened",
///             Self::ClosedLocked => "Closed_Locked",
///         }
///     }
/// }
///
/// assert_eq!(Door::ClosedLocked.path().unwrap().len(), 2);
/// ```
///
/// Most key enums are generated with [`state_enum!`](crate::state_enum).
pub trait State: Clone + Eq + Hash + Debug + Send + Sync {
    /// Full name of the state, segments joined with `_`.
    fn name(&self) -> &str;

    /// The state's position in the tree.
    fn path(&self) -> Result<StatePath, InvalidPath> {
        StatePath::parse(self.name())
    }
}

impl State for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Top,
        TopIdle,
        TopBusy,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Top => "Top",
                Self::TopIdle => "Top_Idle",
                Self::TopBusy => "Top_Busy",
            }
        }
    }

    #[test]
    fn state_name_returns_full_name() {
        assert_eq!(TestState::Top.name(), "Top");
        assert_eq!(TestState::TopIdle.name(), "Top_Idle");
        assert_eq!(TestState::TopBusy.name(), "Top_Busy");
    }

    #[test]
    fn path_is_derived_from_name() {
        let path = TestState::TopBusy.path().unwrap();
        assert_eq!(path.segments(), ["Top", "Busy"]);
        assert_eq!(path.parent(), Some(TestState::Top.path().unwrap()));
    }

    #[test]
    fn string_keys_are_states() {
        assert_eq!("0_1".path().unwrap().len(), 2);
        assert_eq!(String::from("0_2_1").name(), "0_2_1");
        assert!("0__1".path().is_err());
    }
}
