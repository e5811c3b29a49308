use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pyrograph::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    snapshot,
    systems::{BookkeepingSystem, FireSpreadSystem, FirefighterSystem, GrowthSystem},
    web,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Graph wildfire simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/heathland.yaml")]
    scenario: PathBuf,

    /// Override tick count, at least 1 (uses scenario default when omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Write the final run report (statistics series) to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Serve a live view of the run instead of printing a summary
    #[arg(long)]
    serve: bool,

    /// Live view bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Live view bind port
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let config = web::WebServerConfig {
            scenario,
            ticks,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
        };
        return tokio::runtime::Runtime::new()?.block_on(web::run(config));
    }

    let mut world = scenario.build_world()?;
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        params: scenario.params(),
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(GrowthSystem::new())
        .with_system(FireSpreadSystem::new())
        .with_system(FirefighterSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    engine.run(&mut world, ticks)?;

    let counts = world
        .stats()
        .latest()
        .context("statistics log is empty after the run")?;
    println!(
        "Scenario '{}' completed after {} ticks: {} forested, {} bare, {} burning, {} firefighters alive.",
        scenario.name, ticks, counts.forested, counts.bare, counts.ignited, counts.firefighters_alive
    );

    if let Some(path) = cli.report {
        let report = world
            .stats()
            .report(&scenario.name, ticks, world.vertex_count());
        snapshot::write_report(&path, &report)?;
        println!("Run report written to {}.", path.display());
    }

    Ok(())
}
