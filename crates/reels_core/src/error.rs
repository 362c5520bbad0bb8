//! Error types for machine construction, spin requests, and snapshots.

use crate::machine::SpinId;

/// A [`MachineConfig`](crate::MachineConfig) that cannot produce a working machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The grid must have at least one row.
    #[error("grid must have at least one row")]
    ZeroRows,

    /// The grid must have at least one column.
    #[error("grid must have at least one column")]
    ZeroColumns,

    /// No symbols to draw from.
    #[error("symbol palette is empty")]
    EmptyPalette,

    /// A numeric option is out of range or not finite.
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        /// The offending option.
        field: &'static str,
        /// What the option must satisfy.
        requirement: &'static str,
        /// The rejected value, formatted.
        value: String,
    },
}

/// A rejected spin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpinError {
    /// A spin is still animating; the request was not applied.
    #[error("spin {spin_id} is already in progress")]
    AlreadySpinning {
        /// The spin that is currently running.
        spin_id: SpinId,
    },
}

/// Errors from encoding or decoding a [`MachineSnapshot`](crate::MachineSnapshot).
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Failed to encode a snapshot to MessagePack.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a snapshot from MessagePack.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Failed to render a snapshot as JSON.
    #[error("failed to render snapshot as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
