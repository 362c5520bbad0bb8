//! Render-facing snapshots of the grid.
//!
//! A [`MachineSnapshot`] is everything a renderer needs for one frame: where
//! each tile is and which symbol asset it shows. Snapshots travel as
//! MessagePack; [`MachineSnapshot::to_json`] exists for inspection.

use reels_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::grid::Grid;
use crate::machine::SpinId;
use crate::palette::{SymbolId, SymbolPalette};

/// One tile as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Row of the tile.
    pub row: usize,
    /// Reel of the tile.
    pub column: usize,
    /// World-space center.
    pub position: Vec2,
    /// Displayed symbol, indexing [`MachineSnapshot::symbols`].
    pub symbol: SymbolId,
}

/// The whole grid at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// The spin in progress, if any.
    pub spin_id: Option<SpinId>,
    /// Whether a spin is in progress; a renderer disables its spin control while set.
    pub spinning: bool,
    /// Tile width and height.
    pub tile_size: Vec2,
    /// Palette asset names, indexed by [`SymbolId`].
    pub symbols: Vec<String>,
    /// Every tile, column-major.
    pub tiles: Vec<TileSnapshot>,
}

impl MachineSnapshot {
    /// Capture the grid's current state.
    #[must_use]
    pub fn capture(grid: &Grid, palette: &SymbolPalette, spin_id: Option<SpinId>) -> Self {
        let tiles = grid
            .tiles()
            .iter()
            .map(|tile| TileSnapshot {
                row: tile.row(),
                column: tile.column(),
                position: tile.transform().translated(grid.anchor()).position,
                symbol: tile.symbol(),
            })
            .collect();

        Self {
            spin_id,
            spinning: spin_id.is_some(),
            tile_size: grid.layout().tile_size(),
            symbols: palette.iter().map(|s| s.asset().to_string()).collect(),
            tiles,
        }
    }

    /// Asset name shown by `tile`, if its symbol is in range.
    #[must_use]
    pub fn asset_of(&self, tile: &TileSnapshot) -> Option<&str> {
        self.symbols.get(tile.symbol.0).map(String::as_str)
    }

    /// Encode to MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        rmp_serde::to_vec(self).map_err(SnapshotError::Encode)
    }

    /// Decode from MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] if deserialisation fails.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        rmp_serde::from_slice(bytes).map_err(SnapshotError::Decode)
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
