//! Macros for declaring state keys.

/// Generate a state key enum and its `State` implementation.
///
/// Each variant is paired with its full path name.
///
/// # Example
///
/// ```
/// use hsm::core::State;
/// use hsm::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Closed => "Closed",
///         Locked => "Closed_Locked",
///         Opened => "Opened",
///     }
/// }
///
/// assert_eq!(Door::Locked.name(), "Closed_Locked");
/// assert_eq!(Door::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $path:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every key, in declaration order.
            #[allow(dead_code)]
            $vis const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $path),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Top => "Top",
            TopIdle => "Top_Idle",
            TopBusy => "Top_Busy",
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Top.name(), "Top");
        assert_eq!(TestState::TopIdle.name(), "Top_Idle");
        assert_eq!(TestState::TopBusy.path().unwrap().segments(), ["Top", "Busy"]);
    }

    #[test]
    fn state_enum_lists_all_keys() {
        assert_eq!(
            TestState::ALL,
            [TestState::Top, TestState::TopIdle, TestState::TopBusy]
        );
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A => "A",
                B => "A_B",
            }
        }

        let state = PublicState::B;
        assert_eq!(state.name(), "A_B");
    }
}
