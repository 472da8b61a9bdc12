//! hsm: a hierarchical state machine engine
//!
//! States nest. A signal is offered to the current leaf state first and
//! bubbles to the outer states until one of them handles it, so substates
//! inherit the behavior of their parents. When a handler selects a new state,
//! the machine resolves it to a leaf through the init chain, runs the exit
//! actions up to the common ancestor and the entry actions down to the new
//! leaf, in that order.
//!
//! # Core Concepts
//!
//! - **State keys**: any `State` type; its name is the full path (`0_2_1`)
//! - **Outcomes**: handlers return `Outcome`, never panic for control flow
//! - **Builder**: states are registered and validated once, then frozen
//! - **Logger**: traces go to an injected `HsmLogger` (`tracing` by default)
//!
//! # Example
//!
//! ```rust
//! use hsm::{state_enum, DispatchResult, Outcome, StateMachineBuilder};
//!
//! state_enum! {
//!     enum Light {
//!         On => "On",
//!         Off => "Off",
//!         OffIdle => "Off_Idle",
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::<Light, Vec<&str>, &str>::new()
//!     .state(Light::On, |_, signal| match *signal {
//!         "toggle" => Outcome::transition(Light::Off),
//!         _ => Outcome::Unhandled,
//!     })
//!     .init_state(Light::Off, |_, signal| match *signal {
//!         "toggle" => Outcome::transition(Light::On),
//!         _ => Outcome::ignore(),
//!     })
//!     .state(Light::OffIdle, |_, _| Outcome::Unhandled)
//!     .entry(Light::On, |trace, _| trace.push("lamp on"))
//!     .exit(Light::On, |trace| trace.push("lamp off"))
//!     .build(Vec::new())
//!     .unwrap();
//!
//! assert_eq!(*machine.current_state(), Light::OffIdle);
//! let result = machine.dispatch(&"toggle").unwrap();
//! assert!(matches!(result, DispatchResult::Transitioned { to: Light::On, .. }));
//! machine.dispatch(&"toggle").unwrap();
//! assert_eq!(*machine.current_state(), Light::OffIdle);
//! assert_eq!(machine.context(), &["lamp on", "lamp off"]);
//! ```

pub mod builder;
pub mod core;
pub mod diagram;
pub mod logger;
pub mod machine;

// Re-export commonly used types
pub use builder::{GraphConsistencyError, StateMachineBuilder};
pub use core::{Outcome, State, StateId, StatePath, StateTree};
pub use diagram::DiagramConfig;
pub use logger::{HsmLogger, RecordingLogger, TracingLogger};
pub use machine::{DispatchError, DispatchResult, InvalidStateReference, StateMachine};
