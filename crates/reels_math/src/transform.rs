//! 2D transform for reel tiles.
//!
//! [`Transform2D`] is the local placement of a tile inside its grid: a
//! position relative to the grid anchor. [`Transform2D::translated`] lifts it
//! into world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A tile's position within its grid.
///
/// The y axis points up, so rows further down the reel have more negative y.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    /// Position relative to the grid anchor.
    pub position: Vec2,
}

impl Transform2D {
    /// The identity transform, at the origin.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
    };

    /// Create a new transform at `position`.
    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position += offset;
        self
    }

    /// Interpolate the position linearly towards `target`.
    ///
    /// `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(mut self, target: Vec2, t: f32) -> Self {
        self.position = self.position.lerp(target, t.clamp(0.0, 1.0));
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        assert_eq!(Transform2D::IDENTITY.position, Vec2::ZERO);
        assert_eq!(Transform2D::default(), Transform2D::IDENTITY);
    }

    #[test]
    fn test_translated() {
        let t = Transform2D::from_position(Vec2::new(1.0, 1.0)).translated(Vec2::new(5.0, -2.0));
        assert_eq!(t.position, Vec2::new(6.0, -1.0));
    }

    #[test]
    fn test_lerp_endpoints_and_clamp() {
        let t = Transform2D::from_position(Vec2::new(0.0, 10.0));
        let target = Vec2::new(0.0, -10.0);
        assert_eq!(t.lerp(target, 0.0).position, t.position);
        assert_eq!(t.lerp(target, 0.5).position, Vec2::ZERO);
        assert_eq!(t.lerp(target, 1.0).position, target);
        // Overshoot is clamped.
        assert_eq!(t.lerp(target, 3.0).position, target);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = Transform2D::from_position(Vec2::new(1.0, 2.0));
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: Transform2D = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
