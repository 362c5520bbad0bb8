//! # reels_math
//!
//! Math types for the slot reel animator. Re-exports [`glam`] for linear
//! algebra and defines the 2D spatial types tiles are positioned with.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use transform::Transform2D;
