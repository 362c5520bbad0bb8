//! The slot machine: one grid, one reel per column, one spin at a time.
//!
//! ## Spin lifecycle
//!
//! 1. [`SlotMachine::request_spin`] marks the machine spinning, disables the
//!    attached [`SpinAffordance`], and starts reel `i` after
//!    `i * column_stagger` seconds.
//! 2. The host calls [`SlotMachine::tick`] once per frame with the frame time.
//! 3. When every reel has settled the machine is idle again, the affordance
//!    is re-enabled, and [`MachineEvent::SpinFinished`] is emitted.
//!
//! Completion is counted across all reels, so the machine does not depend on
//! the last-started reel being the last to settle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MachineConfig;
use crate::error::{ConfigError, SpinError};
use crate::event::MachineEvent;
use crate::grid::Grid;
use crate::palette::SymbolPalette;
use crate::reel::{Reel, ReelContext, ReelParams, ReelPhase};
use crate::snapshot::MachineSnapshot;

/// Identifies one spin, for logs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpinId(pub Uuid);

impl SpinId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SpinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The external control that lets a user request a spin, e.g. a button.
///
/// The machine disables it while a spin is running and re-enables it once
/// every reel has settled.
pub trait SpinAffordance {
    /// Enable or disable the control.
    fn set_interactable(&mut self, interactable: bool);
}

/// A slot machine animating a fixed grid of tiles.
pub struct SlotMachine<R = StdRng> {
    config: MachineConfig,
    params: ReelParams,
    palette: SymbolPalette,
    grid: Grid,
    reels: Vec<Reel>,
    rng: R,
    current_spin: Option<SpinId>,
    unsettled: usize,
    spin_elapsed: f32,
    affordance: Option<Box<dyn SpinAffordance>>,
}

impl SlotMachine<StdRng> {
    /// Validate `config` and build the grid, seeding the RNG from entropy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn build(config: MachineConfig) -> Result<Self, ConfigError> {
        Self::build_with_rng(config, StdRng::from_entropy())
    }

    /// Validate `config` and build the grid with a deterministic seed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn build_seeded(config: MachineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build_with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SlotMachine<R> {
    /// Validate `config` and build the grid using `rng` for every symbol draw.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn build_with_rng(config: MachineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.symbol_palette()?;
        let grid = Grid::build(config.layout()?, &palette, &mut rng);
        let reels = (0..config.columns).map(Reel::new).collect();

        info!(
            rows = config.rows,
            columns = config.columns,
            symbols = palette.len(),
            "slot machine built"
        );

        Ok(Self {
            params: config.reel_params(),
            config,
            palette,
            grid,
            reels,
            rng,
            current_spin: None,
            unsettled: 0,
            spin_elapsed: 0.0,
            affordance: None,
        })
    }

    /// Attach the spin control. It is immediately synced to the machine state.
    #[must_use]
    pub fn with_affordance(mut self, affordance: impl SpinAffordance + 'static) -> Self {
        let mut affordance: Box<dyn SpinAffordance> = Box::new(affordance);
        affordance.set_interactable(!self.is_spinning());
        self.affordance = Some(affordance);
        self
    }

    /// Returns `true` while a spin is animating.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.current_spin.is_some()
    }

    /// The spin in progress, if any.
    #[must_use]
    pub fn current_spin(&self) -> Option<SpinId> {
        self.current_spin
    }

    /// Time advanced since the current spin was requested.
    #[must_use]
    pub fn spin_elapsed(&self) -> f32 {
        self.spin_elapsed
    }

    /// The validated config the machine was built from.
    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The symbol palette.
    #[must_use]
    pub fn palette(&self) -> &SymbolPalette {
        &self.palette
    }

    /// The tile grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The phase of the reel at `column`.
    #[must_use]
    pub fn reel_phase(&self, column: usize) -> Option<&ReelPhase> {
        self.reels.get(column).map(Reel::phase)
    }

    /// Start a spin.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::AlreadySpinning`] if a spin is in progress; the
    /// machine and its tiles are left untouched.
    pub fn request_spin(&mut self) -> Result<SpinId, SpinError> {
        if let Some(spin_id) = self.current_spin {
            warn!(%spin_id, "spin requested while already spinning");
            return Err(SpinError::AlreadySpinning { spin_id });
        }

        let spin_id = SpinId::new();
        self.current_spin = Some(spin_id);
        self.unsettled = self.reels.len();
        self.spin_elapsed = 0.0;
        if let Some(affordance) = self.affordance.as_mut() {
            affordance.set_interactable(false);
        }

        for reel in &mut self.reels {
            let delay = self.config.stagger_for(reel.column());
            reel.start(delay);
            debug!(%spin_id, column = reel.column(), delay, "reel queued");
        }

        info!(%spin_id, columns = self.reels.len(), "spin started");
        Ok(spin_id)
    }

    /// Advance every reel by `dt` seconds and return what happened.
    ///
    /// Negative or non-finite `dt` is treated as zero. Does nothing while idle.
    pub fn tick(&mut self, dt: f32) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        let Some(spin_id) = self.current_spin else {
            return events;
        };

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.spin_elapsed += dt;

        let layout = *self.grid.layout();
        let mut ctx = ReelContext {
            layout: &layout,
            params: self.params,
            palette: &self.palette,
            rng: &mut self.rng,
        };
        for reel in &mut self.reels {
            let tiles = self.grid.column_mut(reel.column());
            reel.advance(dt, tiles, &mut ctx, &mut events);
        }

        let settled = events
            .iter()
            .filter(|e| matches!(e, MachineEvent::ColumnSettled { .. }))
            .count();
        self.unsettled = self.unsettled.saturating_sub(settled);

        if self.unsettled == 0 {
            self.current_spin = None;
            if let Some(affordance) = self.affordance.as_mut() {
                affordance.set_interactable(true);
            }
            info!(%spin_id, elapsed = self.spin_elapsed, "spin finished");
            events.push(MachineEvent::SpinFinished { spin_id });
        }

        events
    }

    /// Capture tile positions and symbols for a renderer.
    #[must_use]
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::capture(&self.grid, &self.palette, self.current_spin)
    }
}

impl<R> std::fmt::Debug for SlotMachine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotMachine")
            .field("config", &self.config)
            .field("current_spin", &self.current_spin)
            .field("unsettled", &self.unsettled)
            .field("reels", &self.reels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> MachineConfig {
        MachineConfig::new(["cherry", "lemon", "bell", "bar", "seven"])
    }

    fn machine() -> SlotMachine {
        SlotMachine::build_seeded(config(), 11).unwrap()
    }

    /// Records every `set_interactable` call.
    #[derive(Clone, Default)]
    struct RecordingButton(Rc<RefCell<Vec<bool>>>);

    impl SpinAffordance for RecordingButton {
        fn set_interactable(&mut self, interactable: bool) {
            self.0.borrow_mut().push(interactable);
        }
    }

    fn run_to_idle(machine: &mut SlotMachine) -> Vec<MachineEvent> {
        let mut all = Vec::new();
        for _ in 0..10_000 {
            let events = machine.tick(DT);
            let done = events
                .iter()
                .any(|e| matches!(e, MachineEvent::SpinFinished { .. }));
            all.extend(events);
            if done {
                return all;
            }
        }
        panic!("spin never finished");
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let err = SlotMachine::build(MachineConfig::default()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPalette);
        let err = SlotMachine::build(config().with_grid(0, 5)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroRows);
    }

    #[test]
    fn test_build_creates_idle_grid() {
        let machine = machine();
        assert!(!machine.is_spinning());
        assert_eq!(machine.grid().len(), 15);
        assert!((0..5).all(|c| machine.reel_phase(c) == Some(&ReelPhase::Idle)));
        assert!(machine.reel_phase(5).is_none());
    }

    #[test]
    fn test_request_spin_staggers_reels() {
        let mut machine = machine();
        machine.request_spin().unwrap();
        assert!(machine.is_spinning());
        for column in 0..5 {
            assert_eq!(
                machine.reel_phase(column),
                Some(&ReelPhase::Delayed {
                    remaining: column as f32 * 0.5
                })
            );
        }
    }

    #[test]
    fn test_second_request_rejected_without_side_effects() {
        let mut machine = machine();
        let spin_id = machine.request_spin().unwrap();
        for _ in 0..30 {
            machine.tick(DT);
        }
        let grid_before = machine.grid().clone();
        let phases_before: Vec<_> = (0..5).map(|c| machine.reel_phase(c).cloned()).collect();

        let err = machine.request_spin().unwrap_err();
        assert_eq!(err, SpinError::AlreadySpinning { spin_id });
        assert!(machine.is_spinning());
        assert_eq!(machine.current_spin(), Some(spin_id));
        assert_eq!(machine.grid(), &grid_before);
        let phases_after: Vec<_> = (0..5).map(|c| machine.reel_phase(c).cloned()).collect();
        assert_eq!(phases_after, phases_before);
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut machine = machine();
        let before = machine.grid().clone();
        assert!(machine.tick(DT).is_empty());
        assert_eq!(machine.grid(), &before);
    }

    #[test]
    fn test_spin_finishes_after_every_reel_settles() {
        let mut machine = machine();
        let spin_id = machine.request_spin().unwrap();
        let events = run_to_idle(&mut machine);

        assert!(!machine.is_spinning());
        assert_eq!(events.last(), Some(&MachineEvent::SpinFinished { spin_id }));
        let settled: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                MachineEvent::ColumnSettled { column } => Some(*column),
                _ => None,
            })
            .collect();
        assert_eq!(settled.len(), 5);

        let layout = *machine.grid().layout();
        for tile in machine.grid().tiles() {
            assert_eq!(
                tile.position(),
                layout.final_position(tile.row(), tile.column()),
                "tile ({}, {}) must rest exactly on its target",
                tile.row(),
                tile.column()
            );
        }
    }

    #[test]
    fn test_completion_counts_all_reels_not_last_index() {
        // Without stagger every reel settles on the same step; the spin
        // must still finish exactly once.
        let mut machine = SlotMachine::build_seeded(config().with_stagger(0.0), 5).unwrap();
        machine.request_spin().unwrap();
        let events = run_to_idle(&mut machine);
        let finished = events
            .iter()
            .filter(|e| matches!(e, MachineEvent::SpinFinished { .. }))
            .count();
        assert_eq!(finished, 1);
        assert!(!machine.is_spinning());
    }

    #[test]
    fn test_affordance_toggled_around_spin() {
        let button = RecordingButton::default();
        let calls = button.0.clone();
        let mut machine = machine().with_affordance(button);
        assert_eq!(*calls.borrow(), vec![true]);

        machine.request_spin().unwrap();
        assert_eq!(*calls.borrow(), vec![true, false]);

        let _ = machine.request_spin();
        assert_eq!(*calls.borrow(), vec![true, false]);

        run_to_idle(&mut machine);
        assert_eq!(*calls.borrow(), vec![true, false, true]);
    }

    #[test]
    fn test_machine_can_spin_again() {
        let mut machine = machine();
        let first = machine.request_spin().unwrap();
        run_to_idle(&mut machine);
        let second = machine.request_spin().unwrap();
        assert_ne!(first, second);
        run_to_idle(&mut machine);
        assert!(!machine.is_spinning());
    }

    #[test]
    fn test_invalid_dt_treated_as_zero() {
        let mut machine = machine();
        machine.request_spin().unwrap();
        machine.tick(DT);
        let before = machine.grid().clone();
        let elapsed = machine.spin_elapsed();
        assert!(machine.tick(f32::NAN).is_empty());
        assert!(machine.tick(-1.0).is_empty());
        assert_eq!(machine.grid(), &before);
        assert_eq!(machine.spin_elapsed(), elapsed);
    }

    #[test]
    fn test_seeded_machines_are_deterministic() {
        let mut a = SlotMachine::build_seeded(config(), 99).unwrap();
        let mut b = SlotMachine::build_seeded(config(), 99).unwrap();
        assert_eq!(a.grid(), b.grid());
        a.request_spin().unwrap();
        b.request_spin().unwrap();
        run_to_idle(&mut a);
        run_to_idle(&mut b);
        assert_eq!(a.grid().visible_window(), b.grid().visible_window());
    }
}
