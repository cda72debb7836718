// Desk lamp demo entry point
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use arbor::lamp::{self, Lamp, LampEvent, LampVars};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Drive the desk lamp statechart from the command line")]
struct Cli {
    /// Print the lamp's static structure as JSON and exit
    #[arg(long)]
    diagram: bool,

    /// Start with a drained battery
    #[arg(long)]
    low_battery: bool,

    /// Events to dispatch in order: do, power, plus, minus, tint, drain, charge
    events: Vec<String>,
}

fn main() -> Result<()> {
    // Basic tracing setup (reads RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.diagram {
        let json = serde_json::to_string_pretty(&lamp::LAMP.diagram())
            .context("serializing lamp diagram")?;
        println!("{json}");
        return Ok(());
    }

    let events = cli
        .events
        .iter()
        .map(|name| {
            name.parse::<LampEvent>()
                .with_context(|| format!("parsing event `{name}`"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut machine = lamp::lamp(LampVars {
        battery_low: cli.low_battery,
        ..LampVars::default()
    })?;
    machine.start()?;
    tracing::info!(state = current(&machine), "lamp started");
    println!("{:<8} {}", "start", current(&machine));

    for event in events {
        let result = machine.dispatch(event)?;
        println!("{:<8} {} ({result:?})", event, current(&machine));
    }

    tracing::info!(vars = ?machine.vars(), "done");
    Ok(())
}

fn current(machine: &Lamp) -> &'static str {
    machine
        .state()
        .map_or("(not started)", |state| machine.state_name(state))
}
