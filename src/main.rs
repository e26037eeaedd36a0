use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use evo::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{BookkeepingSystem, CreatureSystem},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless creature simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/meadow.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level)),
        )
        .with_target(true)
        .init();

    let seed = cli.seed.unwrap_or(scenario.seed);
    let mut world = scenario.build_world_with_seed(seed)?;
    let ticks = scenario.ticks(cli.ticks);
    info!(scenario = %scenario.name, seed, ticks, "scenario loaded");

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
    };
    let mut engine = EngineBuilder::new(settings)
        .with_system(CreatureSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    engine.run(&mut world, ticks)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    } else {
        let counts = world.intention_counts();
        println!(
            "Scenario '{}' completed for {} ticks. Creatures: {} (wander {}, wait {}, turn {}), anomalous: {}",
            scenario.name,
            ticks,
            world.creature_count(),
            counts.wander,
            counts.wait,
            counts.turn,
            world.anomalous_creatures().len()
        );
    }
    Ok(())
}
