//! # reels_app: headless reel host
//!
//! Drives a [`SlotMachine`] the way an engine's frame loop would, without
//! rendering anything. Useful for checking a machine config and for watching
//! the spin lifecycle in the logs.
//!
//! ## Startup Sequence
//!
//! 1. Load the machine config (`--config` / `REELS_CONFIG`, or the built-in
//!    five-symbol machine).
//! 2. Build and center the grid.
//! 3. Run `--spins` spins on the fixed-timestep tick loop, printing each
//!    resting window.

mod tick;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reels_core::{MachineConfig, SlotMachine};
use tick::{TickConfig, TickLoop};

/// Symbols used when no config file is given.
const DEFAULT_PALETTE: [&str; 5] = ["cherry", "lemon", "bell", "bar", "seven"];

#[derive(Parser, Debug)]
#[command(name = "reels_app", about = "Run slot reel spins headlessly")]
struct Cli {
    /// Machine config as JSON. Omitted fields take their defaults.
    #[arg(long, env = "REELS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of spins to run back to back.
    #[arg(long, default_value_t = 1)]
    spins: u32,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Ticks allowed per spin before giving up (0 = unlimited).
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Seed the symbol RNG for reproducible spins.
    #[arg(long)]
    seed: Option<u64>,

    /// Pace ticks in wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Print the final snapshot of each spin as JSON.
    #[arg(long)]
    dump_json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<MachineConfig> {
    let Some(path) = path else {
        return Ok(MachineConfig::new(DEFAULT_PALETTE));
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    MachineConfig::from_json(&json)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("reels_app=info".parse()?)
                .add_directive("reels_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if !(cli.tick_rate.is_finite() && cli.tick_rate > 0.0) {
        anyhow::bail!("--tick-rate must be positive, got {}", cli.tick_rate);
    }

    let config = load_config(cli.config.as_ref())?;
    let machine = match cli.seed {
        Some(seed) => SlotMachine::build_seeded(config, seed),
        None => SlotMachine::build(config),
    }
    .context("invalid machine config")?;

    let tick_config = TickConfig {
        tick_rate: cli.tick_rate,
        max_ticks: cli.max_ticks,
        realtime: cli.realtime,
    };
    let mut tick_loop = TickLoop::new(tick_config, machine);

    for n in 1..=cli.spins {
        let report = tick_loop.run_spin()?;
        info!(
            spin = n,
            spin_id = %report.spin_id,
            ticks = report.ticks,
            elapsed = report.elapsed,
            wraps = report.wraps,
            "spin complete"
        );

        println!("spin {n} ({})", report.spin_id);
        for row in &report.window {
            println!("  {}", row.join(" | "));
        }
        if cli.dump_json {
            println!("{}", tick_loop.machine().snapshot().to_json()?);
        }
    }

    info!(total_ticks = tick_loop.tick_id(), "reel host shut down");
    Ok(())
}
