//! Handler outcomes.

use super::state::State;

/// Result of delivering a signal to one state's handler.
///
/// The dispatch engine matches on this exhaustively: `Unhandled` bubbles the
/// signal to the parent state, every other variant ends the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<S: State> {
    /// No rule for this signal here; try the parent state.
    Unhandled,

    /// Handled, stay in the current state.
    NoChange,

    /// Handled and deliberately ignored. Behaves like `NoChange`, the reason
    /// only shows up in the log.
    Ignore { reason: Option<String> },

    /// Handled, move to `target`. Composite targets are resolved through
    /// their init chain.
    TransitionTo { target: S, reason: Option<String> },
}

impl<S: State> Outcome<S> {
    pub fn transition(target: S) -> Self {
        Self::TransitionTo {
            target,
            reason: None,
        }
    }

    pub fn ignore() -> Self {
        Self::Ignore { reason: None }
    }

    /// Attach a human readable reason to an `Ignore` or `TransitionTo`.
    /// Other outcomes are returned unchanged.
    ///
    /// ```rust
    /// use hsm::Outcome;
    ///
    /// let outcome: Outcome<&str> = Outcome::transition("Top_Idle").because("timer expired");
    /// assert_eq!(outcome.reason(), Some("timer expired"));
    /// ```
    pub fn because(self, why: impl Into<String>) -> Self {
        match self {
            Self::Ignore { .. } => Self::Ignore {
                reason: Some(why.into()),
            },
            Self::TransitionTo { target, .. } => Self::TransitionTo {
                target,
                reason: Some(why.into()),
            },
            other => other,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ignore { reason } | Self::TransitionTo { reason, .. } => reason.as_deref(),
            Self::Unhandled | Self::NoChange => None,
        }
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn because_sets_reason_on_ignore_and_transition() {
        let ignored: Outcome<&str> = Outcome::ignore().because("weekend");
        assert_eq!(
            ignored,
            Outcome::Ignore {
                reason: Some("weekend".to_string())
            }
        );

        let moved = Outcome::transition("A").because("got b");
        assert_eq!(moved.reason(), Some("got b"));
    }

    #[test]
    fn because_leaves_other_outcomes_alone() {
        let unhandled: Outcome<&str> = Outcome::Unhandled.because("x");
        assert_eq!(unhandled, Outcome::Unhandled);
        assert_eq!(unhandled.reason(), None);

        let kept: Outcome<&str> = Outcome::NoChange.because("x");
        assert_eq!(kept, Outcome::NoChange);
    }

    #[test]
    fn only_unhandled_is_not_handled() {
        assert!(!Outcome::<&str>::Unhandled.is_handled());
        assert!(Outcome::<&str>::NoChange.is_handled());
        assert!(Outcome::<&str>::ignore().is_handled());
        assert!(Outcome::transition("A").is_handled());
    }
}
