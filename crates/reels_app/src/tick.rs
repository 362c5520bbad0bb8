//! Host tick loop.
//!
//! Stands in for an engine's frame loop: advances the machine on a fixed
//! timestep until the current spin finishes.
//!
//! 1. Request a spin.
//! 2. Tick the machine with `dt = 1 / tick_rate`.
//! 3. Stop at [`MachineEvent::SpinFinished`], or fail after `max_ticks`.

use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use reels_core::{MachineEvent, SlotMachine, SpinId};

/// Configuration for the host tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Ticks allowed per spin before giving up (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep between ticks to match `tick_rate` in wall-clock time.
    pub realtime: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 100_000,
            realtime: false,
        }
    }
}

/// Outcome of one completed spin.
#[derive(Debug, Clone)]
pub struct SpinReport {
    /// The spin that ran.
    pub spin_id: SpinId,
    /// Ticks from request to finish.
    pub ticks: u64,
    /// Simulated seconds from request to finish.
    pub elapsed: f32,
    /// Number of tile wraparounds.
    pub wraps: usize,
    /// Resting symbols, top row first, as asset names.
    pub window: Vec<Vec<String>>,
}

/// The host loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Total ticks run across every spin.
    tick_id: u64,
    config: TickConfig,
    machine: SlotMachine,
}

impl TickLoop {
    /// Create a tick loop driving `machine`.
    #[must_use]
    pub fn new(config: TickConfig, machine: SlotMachine) -> Self {
        Self {
            tick_id: 0,
            config,
            machine,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the machine.
    #[must_use]
    pub fn machine(&self) -> &SlotMachine {
        &self.machine
    }

    /// Run one tick of the host loop.
    pub fn tick(&mut self, dt: f64) -> Vec<MachineEvent> {
        self.tick_id += 1;
        let events = self.machine.tick(dt as f32);
        if !events.is_empty() {
            debug!(tick_id = self.tick_id, dt, events = events.len(), "tick");
        }
        events
    }

    /// Request a spin and tick until it finishes.
    ///
    /// # Errors
    ///
    /// Fails if the machine rejects the request or the spin does not finish
    /// within `max_ticks`.
    pub fn run_spin(&mut self) -> Result<SpinReport> {
        let spin_id = self.machine.request_spin()?;
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt = tick_duration.as_secs_f64();

        info!(
            %spin_id,
            tick_rate = self.config.tick_rate,
            realtime = self.config.realtime,
            "running spin"
        );

        let mut ticks = 0u64;
        let mut wraps = 0usize;
        loop {
            let start = Instant::now();

            let events = self.tick(dt);
            ticks += 1;

            let mut finished = false;
            for event in &events {
                match event {
                    MachineEvent::TileWrapped { .. } => wraps += 1,
                    MachineEvent::ColumnSettled { column } => {
                        debug!(%spin_id, column, ticks, "column settled");
                    }
                    MachineEvent::SpinFinished { .. } => finished = true,
                    _ => {}
                }
            }
            if finished {
                break;
            }

            if self.config.max_ticks > 0 && ticks >= self.config.max_ticks {
                bail!("spin {spin_id} did not finish within {ticks} ticks");
            }

            if self.config.realtime {
                let elapsed = start.elapsed();
                if elapsed < tick_duration {
                    std::thread::sleep(tick_duration - elapsed);
                } else {
                    warn!(
                        tick_id = self.tick_id,
                        elapsed_ms = elapsed.as_millis() as u64,
                        budget_ms = tick_duration.as_millis() as u64,
                        "tick exceeded time budget"
                    );
                }
            }
        }

        let palette = self.machine.palette();
        let window = self
            .machine
            .grid()
            .visible_window()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|id| {
                        palette
                            .get(id)
                            .map_or_else(|| id.to_string(), |s| s.asset().to_string())
                    })
                    .collect()
            })
            .collect();

        Ok(SpinReport {
            spin_id,
            ticks,
            elapsed: self.machine.spin_elapsed(),
            wraps,
            window,
        })
    }
}

#[cfg(test)]
mod tests {
    use reels_core::{MachineConfig, SlotMachine};

    use super::*;

    fn machine() -> SlotMachine {
        SlotMachine::build_seeded(MachineConfig::new(["a", "b", "c", "d", "e"]), 4).unwrap()
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), machine());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(1.0 / 60.0);
        assert_eq!(tick_loop.tick_id(), 1);
        tick_loop.tick(1.0 / 60.0);
        assert_eq!(tick_loop.tick_id(), 2);
    }

    #[test]
    fn test_run_spin_to_completion() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), machine());
        let report = tick_loop.run_spin().unwrap();
        assert!(!tick_loop.machine().is_spinning());
        assert_eq!(report.ticks, tick_loop.tick_id());
        assert!((report.elapsed - 4.5).abs() < 0.1, "elapsed {}", report.elapsed);
        assert!(report.wraps > 0);
        assert_eq!(report.window.len(), 3);
        assert!(report.window.iter().all(|row| row.len() == 5));
    }

    #[test]
    fn test_run_spin_gives_up_after_max_ticks() {
        let config = TickConfig {
            max_ticks: 10,
            ..TickConfig::default()
        };
        let mut tick_loop = TickLoop::new(config, machine());
        let err = tick_loop.run_spin().unwrap_err();
        assert!(err.to_string().contains("did not finish"));
        assert_eq!(tick_loop.tick_id(), 10);
    }

    #[test]
    fn test_consecutive_spins() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), machine());
        let first = tick_loop.run_spin().unwrap();
        let second = tick_loop.run_spin().unwrap();
        assert_ne!(first.spin_id, second.spin_id);
        assert_eq!(tick_loop.tick_id(), first.ticks + second.ticks);
    }
}
