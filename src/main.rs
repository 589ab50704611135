use nbody_universe::{diagnostics, Simulation, UniverseConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Runs a universe headless and reports how it evolves.
#[derive(Parser, Debug)]
struct Args {
    /// YAML scenario; built-in defaults when omitted.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of steps to run.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    steps: u64,

    /// Seed of the generated universe, overriding the scenario.
    #[arg(long)]
    seed: Option<u64>,

    /// Steps between progress reports.
    #[arg(short, long, default_value_t = 1_000)]
    report_every: u64,
}

fn load_config(path: Option<&PathBuf>) -> Result<UniverseConfig> {
    let Some(path) = path else {
        return Ok(UniverseConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.scenario.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut sim = Simulation::start(config)?;
    let initial_energy = sim.total_energy();
    let initial_momentum = diagnostics::total_momentum(sim.bodies());
    let report_every = args.report_every.max(1);

    for _ in 0..args.steps {
        for merge in sim.step().merges {
            info!("t={:.3}: {} absorbed {}", sim.time(), merge.survivor, merge.absorbed);
        }

        if sim.frame() % report_every == 0 {
            let stats = sim.statistics();
            let drift = (sim.total_energy() - initial_energy) / initial_energy.abs();
            let momentum = diagnostics::total_momentum(sim.bodies()) - initial_momentum;
            info!(
                "t={:.3} bodies={} (stars={} planets={} asteroids={}) energy drift={:.3e} momentum drift={:.3e}",
                stats.time,
                stats.total,
                stats.stars,
                stats.planets,
                stats.asteroids,
                drift,
                momentum.mag()
            );
        }
    }

    Ok(())
}
