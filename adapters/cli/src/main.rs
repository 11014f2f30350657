#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Lane Defence headlessly.

mod autopilot;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{Event, GameStatus};
use lane_defence_simulation::{Input, Simulation};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    autopilot::Autopilot,
    settings::{Overrides, Settings},
};

/// Headless Lane Defence runner.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Runs a Lane Defence match without a window")]
struct Args {
    /// TOML file providing game settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the spawner's random stream.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of waves required to win.
    #[arg(long)]
    waves: Option<u32>,
    /// Currency available at the start of the run.
    #[arg(long)]
    currency: Option<u32>,
    /// Upper bound on simulated ticks before the run is abandoned.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Leaves the field untouched instead of playing with the autopilot.
    #[arg(long)]
    passive: bool,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = settings::load(
        args.config.as_deref(),
        Overrides {
            seed: args.seed,
            waves: args.waves,
            currency: args.currency,
            max_ticks: args.max_ticks,
        },
    )?;

    let summary = run(&settings, !args.passive)?;
    println!(
        "{:?} after {} ticks: {} of {} waves, {} currency, {} plants standing",
        summary.status,
        summary.ticks,
        summary.waves_completed,
        settings.game.wave_target,
        summary.currency,
        summary.plants,
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

struct Summary {
    status: GameStatus,
    ticks: u64,
    waves_completed: u32,
    currency: u32,
    plants: usize,
}

fn run(settings: &Settings, autopilot_enabled: bool) -> Result<Summary> {
    let mut simulation =
        Simulation::with_spawning(settings.game.clone(), settings.spawning_config())
            .context("failed to initialise simulation")?;
    let autopilot = Autopilot::new();
    let mut ticks = 0;

    while ticks < settings.max_ticks && !simulation.status().is_terminal() {
        let inputs: Vec<Input> = if autopilot_enabled {
            autopilot.plan(&simulation.snapshot())
        } else {
            Vec::new()
        };

        for event in simulation.step(&inputs) {
            report(event);
        }
        ticks += 1;
    }

    if !simulation.status().is_terminal() {
        warn!(ticks, "tick budget exhausted before the run finished");
    }

    let snapshot = simulation.snapshot();
    Ok(Summary {
        status: snapshot.status,
        ticks,
        waves_completed: snapshot.waves.completed,
        currency: snapshot.currency,
        plants: snapshot.plants.len(),
    })
}

fn report(event: &Event) {
    match event {
        Event::WaveSpawned { wave, zombies } => info!(wave, zombies, "wave incoming"),
        Event::ZombieBreached { lane, .. } => warn!(lane, "zombie broke through"),
        Event::PlacementRejected { kind, reason, .. } => {
            debug!(?kind, %reason, "autopilot placement rejected");
        }
        Event::StatusChanged { status } => info!(?status, "run over"),
        _ => {}
    }
}
