//! Runs the simulation without a window and logs every generation.

use clap::Parser;
use evo_racer::simulation::params::Params;
use evo_racer::simulation::race::Simulation;
use std::path::PathBuf;
use tracing::info;

/// Evolve cars without a window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file with parameter overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Generations to run.
    #[arg(long, default_value_t = 20)]
    generations: u32,

    /// Print one JSON object per finished generation on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    evo_racer::init_logging("info");
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => Params::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => Params::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }

    let mut sim = Simulation::new(params)?;
    info!(
        seed = sim.seed(),
        generations = args.generations,
        "headless run started"
    );

    for _ in 0..args.generations {
        let stats = sim.run_generation()?;
        if args.json {
            println!("{}", serde_json::to_string(&stats)?);
        }
    }

    if let Some(record) = sim.history().best_fitness() {
        info!(
            generations = sim.generation(),
            best = record,
            "headless run finished"
        );
    }
    Ok(())
}
