//! # reels_core
//!
//! The slot reel animator, independent of any rendering host.
//!
//! This crate provides:
//!
//! - [`MachineConfig`]: grid dimensions, palette, and spin timing.
//! - [`SymbolPalette`]: the read-only pool of symbols tiles draw from.
//! - [`Grid`]: a fixed `rows × columns` arena of [`Tile`]s, centered on its anchor.
//! - [`Reel`]: the per-column `Idle → Delayed → Scrolling → Settling` state machine.
//! - [`SlotMachine`]: owns the grid and reels, accepts spin requests, and is
//!   advanced once per host time step with [`SlotMachine::tick`].
//! - [`MachineSnapshot`]: the render-facing view of tile positions and symbols.

pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod machine;
pub mod palette;
pub mod reel;
pub mod snapshot;

pub use config::MachineConfig;
pub use error::{ConfigError, SnapshotError, SpinError};
pub use event::MachineEvent;
pub use grid::{Grid, GridLayout, Tile};
pub use machine::{SlotMachine, SpinAffordance, SpinId};
pub use palette::{Symbol, SymbolId, SymbolPalette};
pub use reel::{Reel, ReelParams, ReelPhase};
pub use snapshot::{MachineSnapshot, TileSnapshot};
