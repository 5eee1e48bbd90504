//! Command-line runner for BASTION scenarios.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bastion_app::config;
use bastion_app::game_loop::{self, LoopSetup};
use bastion_app::state::AppState;
use bastion_core::constants::TICK_RATE;
use bastion_sim::engine::SimConfig;

/// Run a tower-defence scenario headlessly and report the outcome.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Scenario JSON file. The built-in scenario is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Weapon catalog JSON file. The built-in catalog is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// RNG seed for wave spawn jitter.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated seconds to run.
    #[arg(short, long, default_value_t = 60.0)]
    duration: f64,

    /// Pace ticks in wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Wall-clock speed multiplier when running in real time.
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Print the final snapshot as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let catalog = config::load_catalog(args.catalog.as_deref())?;
    let scenario = config::load_scenario(args.scenario.as_deref())?;
    config::check_scenario(&scenario, &catalog)?;

    let max_ticks = (args.duration.max(0.0) * TICK_RATE as f64).round() as u64;
    let sim_config = SimConfig {
        seed: args.seed,
        time_scale: args.time_scale,
        catalog,
    };
    let setup = LoopSetup::from_scenario(sim_config, &scenario, Some(max_ticks));
    info!(scenario = %scenario.name, seed = args.seed, max_ticks, "starting run");

    let (summary, snapshot) = if args.realtime {
        let state = AppState::new();
        state.start(setup)?;
        let summary = state.join()?;
        (summary, state.latest_snapshot())
    } else {
        let (summary, snapshot) = game_loop::run_headless(setup);
        (summary, Some(snapshot))
    };

    info!(
        ticks = summary.ticks,
        destroyed = summary.score.enemies_destroyed,
        escaped = summary.score.enemies_escaped,
        launched = summary.score.projectiles_launched,
        "run finished in {:?} of simulated time",
        Duration::from_secs_f64(summary.elapsed_secs)
    );

    if args.json {
        if let Some(snapshot) = snapshot {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
