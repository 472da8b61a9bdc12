//! Practical Statecharts
//!
//! The statechart of figure 6.2 in Samek's "Practical Statecharts in C/C++",
//! driven through a fixed sequence of signals.
//!
//! Key concepts:
//! - Signals bubbling from the current leaf to outer states
//! - Init chains resolving composite targets to a leaf
//! - Exit actions before entry actions on every transition
//! - Recording the dispatch transcript with `RecordingLogger`
//!
//! Run with: cargo run --example practical_statecharts

use hsm::builder::rules;
use hsm::{state_enum, DiagramConfig, Outcome, RecordingLogger, StateMachineBuilder};

state_enum! {
    enum Chart {
        S0 => "0",
        S01 => "0_1",
        S011 => "0_1_1",
        S02 => "0_2",
        S021 => "0_2_1",
        S0211 => "0_2_1_1",
        S022 => "0_2_2",
    }
}

type Actions = Vec<&'static str>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Practical Statecharts ===\n");

    let transcript = RecordingLogger::new();
    let mut machine = StateMachineBuilder::<Chart, Actions, char>::new()
        .init_state(
            Chart::S0,
            rules::<Actions, _, _>(vec![
                ('E', Outcome::transition(Chart::S0211)),
                ('I', Outcome::transition(Chart::S0)),
                ('J', Outcome::ignore()),
            ]),
        )
        .init_state(
            Chart::S01,
            rules::<Actions, _, _>(vec![
                ('A', Outcome::transition(Chart::S01)),
                ('C', Outcome::transition(Chart::S02)),
                ('D', Outcome::transition(Chart::S0)),
                ('E', Outcome::transition(Chart::S0211)),
            ]),
        )
        .init_state(
            Chart::S011,
            rules::<Actions, _, _>(vec![('G', Outcome::transition(Chart::S0211))]),
        )
        .state(
            Chart::S02,
            rules::<Actions, _, _>(vec![
                ('K', Outcome::transition(Chart::S01)),
                ('F', Outcome::transition(Chart::S011)),
            ]),
        )
        .init_state(
            Chart::S021,
            rules::<Actions, _, _>(vec![
                ('B', Outcome::transition(Chart::S0211)),
                ('H', Outcome::transition(Chart::S021)),
            ]),
        )
        .init_state(
            Chart::S0211,
            rules::<Actions, _, _>(vec![
                ('C', Outcome::transition(Chart::S022)),
                ('D', Outcome::transition(Chart::S021)),
                ('G', Outcome::transition(Chart::S0)),
            ]),
        )
        .state(
            Chart::S022,
            rules::<Actions, _, _>(vec![
                ('B', Outcome::ignore().because("nothing to do")),
                ('G', Outcome::transition(Chart::S021)),
            ]),
        )
        .entry(Chart::S0, |actions, _| actions.push("entry_0"))
        .exit(Chart::S0, |actions| actions.push("exit_0"))
        .entry(Chart::S01, |actions, _| actions.push("entry_0_1"))
        .exit(Chart::S01, |actions| actions.push("exit_0_1"))
        .entry(Chart::S011, |actions, _| actions.push("entry_0_1_1"))
        .logger(transcript.clone())
        .build(Vec::new())
        .unwrap();

    println!("Initial state: {:?}\n", machine.current_state());

    for signal in "GFECBEDKAIGIJ".chars() {
        machine.context_mut().clear();
        if let Err(err) = machine.dispatch(&signal) {
            println!("{signal}: {err}");
            continue;
        }
        println!(
            "{signal}: now in {:?}, actions {:?}",
            machine.current_state(),
            machine.context()
        );
        for line in transcript.take() {
            println!("    {line}");
        }
    }

    let config = DiagramConfig {
        detailed: false,
        entry_exit: true,
    };
    println!("\nDiagram:\n");
    print!("{}", machine.to_mermaid(&config));

    println!("\n=== Example Complete ===");
}
