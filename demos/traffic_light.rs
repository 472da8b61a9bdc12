//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic state machine nested inside an outer
//! state that handles the signals every substate shares.
//!
//! Key concepts:
//! - Cyclic transitions between sibling states
//! - Outer state handling `fault` for all colors
//! - Entry and exit actions on the composite state
//!
//! Run with: cargo run --example traffic_light

use hsm::{state_enum, DiagramConfig, Outcome, StateMachineBuilder};

state_enum! {
    enum TrafficLight {
        Operating => "Operating",
        Red => "Operating_Red",
        Green => "Operating_Green",
        Yellow => "Operating_Yellow",
        Flashing => "Flashing",
    }
}

#[derive(Debug, Default)]
struct Controller {
    cycles: u32,
    power_on: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hsm=info".into()),
        )
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut machine = StateMachineBuilder::<TrafficLight, Controller, &str>::new()
        .init_state(TrafficLight::Operating, |_, signal| match *signal {
            "fault" => Outcome::transition(TrafficLight::Flashing).because("lamp fault"),
            _ => Outcome::Unhandled,
        })
        .init_state(TrafficLight::Red, |controller, signal| match *signal {
            "tick" => {
                controller.cycles += 1;
                Outcome::transition(TrafficLight::Green)
            }
            _ => Outcome::Unhandled,
        })
        .state(TrafficLight::Green, |_, signal| match *signal {
            "tick" => Outcome::transition(TrafficLight::Yellow),
            _ => Outcome::Unhandled,
        })
        .state(TrafficLight::Yellow, |_, signal| match *signal {
            "tick" => Outcome::transition(TrafficLight::Red),
            _ => Outcome::Unhandled,
        })
        .state(TrafficLight::Flashing, |_, signal| match *signal {
            "repair" => Outcome::transition(TrafficLight::Operating),
            _ => Outcome::ignore().because("waiting for repair"),
        })
        .entry(TrafficLight::Operating, |controller, _| controller.power_on = true)
        .exit(TrafficLight::Operating, |controller| controller.power_on = false)
        .transition_note(TrafficLight::Red, TrafficLight::Green, "tick")
        .transition_note(TrafficLight::Green, TrafficLight::Yellow, "tick")
        .transition_note(TrafficLight::Yellow, TrafficLight::Red, "tick")
        .transition_note(TrafficLight::Operating, TrafficLight::Flashing, "fault")
        .transition_note(TrafficLight::Flashing, TrafficLight::Operating, "repair")
        .build(Controller::default())
        .unwrap();

    machine.start(&"power");
    println!("Initial state: {:?}\n", machine.current_state());

    for signal in ["tick", "tick", "tick", "tick", "fault", "tick", "repair"] {
        match machine.dispatch(&signal) {
            Ok(result) => println!("{signal:>7} -> {:?} ({result:?})", machine.current_state()),
            Err(err) => println!("{signal:>7} -> error: {err}"),
        }
    }

    println!("\nCompleted cycles: {}", machine.context().cycles);
    println!("Power on: {}", machine.context().power_on);

    println!("\nDiagram:\n");
    print!("{}", machine.to_mermaid(&DiagramConfig::default()));

    println!("\n=== Example Complete ===");
}
