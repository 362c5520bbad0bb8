//! Events produced while a spin animates.

use serde::{Deserialize, Serialize};

use crate::machine::SpinId;
use crate::palette::SymbolId;

/// Something observable that happened during one [`SlotMachine::tick`](crate::SlotMachine::tick).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MachineEvent {
    /// A reel finished its start delay and began scrolling.
    ColumnScrolling {
        /// The reel.
        column: usize,
    },
    /// A tile scrolled out of the band and was respawned at the top.
    TileWrapped {
        /// Row of the wrapped tile.
        row: usize,
        /// Reel of the wrapped tile.
        column: usize,
        /// The freshly drawn symbol.
        symbol: SymbolId,
    },
    /// A reel's velocity reached zero and it began easing into place.
    ColumnSettling {
        /// The reel.
        column: usize,
    },
    /// A reel snapped to its final layout and is idle again.
    ColumnSettled {
        /// The reel.
        column: usize,
    },
    /// Every reel has settled; the machine accepts spin requests again.
    SpinFinished {
        /// The spin that finished.
        spin_id: SpinId,
    },
}
