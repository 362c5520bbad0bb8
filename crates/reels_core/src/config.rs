//! Machine configuration.

use reels_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridLayout;
use crate::palette::SymbolPalette;
use crate::reel::ReelParams;

/// Configuration for a [`SlotMachine`](crate::SlotMachine).
///
/// Every field except `palette` has a default, so a JSON config only needs
/// to list the symbols. Call [`MachineConfig::validate`] (or build a machine,
/// which validates) before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of visible rows per reel.
    pub rows: usize,
    /// Number of reels.
    pub columns: usize,
    /// Asset names of the symbols tiles may display.
    pub palette: Vec<String>,
    /// Width and height of one tile.
    pub tile_size: Vec2,
    /// Horizontal and vertical gap between adjacent tiles.
    pub tile_spacing: Vec2,
    /// Scroll velocity when a reel starts, in units per second.
    pub initial_spin_speed: f32,
    /// Velocity lost per second while scrolling.
    pub deceleration: f32,
    /// Start delay added per column index, in seconds.
    pub column_stagger: f32,
    /// Length of the settle phase, in seconds.
    pub settle_duration: f32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 5,
            palette: Vec::new(),
            tile_size: Vec2::new(100.0, 100.0),
            tile_spacing: Vec2::new(10.0, 10.0),
            initial_spin_speed: 1000.0,
            deceleration: 500.0,
            column_stagger: 0.5,
            settle_duration: 0.5,
        }
    }
}

impl MachineConfig {
    /// Create a config with default dimensions and timing for the given palette.
    #[must_use]
    pub fn new<I, S>(palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            palette: palette.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed. The
    /// result is not validated.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Override the grid dimensions.
    #[must_use]
    pub fn with_grid(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Override the tile size.
    #[must_use]
    pub fn with_tile_size(mut self, size: Vec2) -> Self {
        self.tile_size = size;
        self
    }

    /// Override the gap between tiles.
    #[must_use]
    pub fn with_spacing(mut self, spacing: Vec2) -> Self {
        self.tile_spacing = spacing;
        self
    }

    /// Override the starting velocity and deceleration.
    #[must_use]
    pub fn with_spin(mut self, initial_spin_speed: f32, deceleration: f32) -> Self {
        self.initial_spin_speed = initial_spin_speed;
        self.deceleration = deceleration;
        self
    }

    /// Override the per-column start delay.
    #[must_use]
    pub fn with_stagger(mut self, column_stagger: f32) -> Self {
        self.column_stagger = column_stagger;
        self
    }

    /// Override the settle duration.
    #[must_use]
    pub fn with_settle_duration(mut self, settle_duration: f32) -> Self {
        self.settle_duration = settle_duration;
        self
    }

    /// Check every option.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking dimensions, then the
    /// palette, then the numeric options in declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        check_vec("tile_size", self.tile_size, "finite and positive", |v| v > 0.0)?;
        check_vec("tile_spacing", self.tile_spacing, "finite and non-negative", |v| v >= 0.0)?;
        check(
            "initial_spin_speed",
            self.initial_spin_speed,
            "finite and non-negative",
            |v| v >= 0.0,
        )?;
        check("deceleration", self.deceleration, "finite and positive", |v| v > 0.0)?;
        check(
            "column_stagger",
            self.column_stagger,
            "finite and non-negative",
            |v| v >= 0.0,
        )?;
        check(
            "settle_duration",
            self.settle_duration,
            "finite and non-negative",
            |v| v >= 0.0,
        )?;
        Ok(())
    }

    /// The grid geometry described by this config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRows`] or [`ConfigError::ZeroColumns`] for
    /// an empty grid.
    pub fn layout(&self) -> Result<GridLayout, ConfigError> {
        GridLayout::new(self.rows, self.columns, self.tile_size, self.tile_spacing)
    }

    /// The per-reel motion parameters described by this config.
    #[must_use]
    pub fn reel_params(&self) -> ReelParams {
        ReelParams {
            initial_spin_speed: self.initial_spin_speed,
            deceleration: self.deceleration,
            settle_duration: self.settle_duration,
        }
    }

    /// Build the symbol palette.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPalette`] if no symbols are configured.
    pub fn symbol_palette(&self) -> Result<SymbolPalette, ConfigError> {
        SymbolPalette::from_assets(self.palette.iter().cloned())
    }

    /// Start delay for the reel at `column`.
    #[must_use]
    pub fn stagger_for(&self, column: usize) -> f32 {
        column as f32 * self.column_stagger
    }
}

fn check(
    field: &'static str,
    value: f32,
    requirement: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement,
            value: value.to_string(),
        })
    }
}

fn check_vec(
    field: &'static str,
    value: Vec2,
    requirement: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value.x) && ok(value.y) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement,
            value: format!("({}, {})", value.x, value.y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_symbols() -> MachineConfig {
        MachineConfig::new(["cherry", "lemon", "bell", "bar", "seven"])
    }

    #[test]
    fn test_defaults_match_reference_machine() {
        let config = five_symbols();
        assert_eq!(config.rows, 3);
        assert_eq!(config.columns, 5);
        assert_eq!(config.tile_size, Vec2::new(100.0, 100.0));
        assert_eq!(config.tile_spacing, Vec2::new(10.0, 10.0));
        assert_eq!(config.initial_spin_speed, 1000.0);
        assert_eq!(config.deceleration, 500.0);
        assert_eq!(config.column_stagger, 0.5);
        assert_eq!(config.settle_duration, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = MachineConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            five_symbols().with_grid(0, 5).validate(),
            Err(ConfigError::ZeroRows)
        );
        assert_eq!(
            five_symbols().with_grid(3, 0).validate(),
            Err(ConfigError::ZeroColumns)
        );
    }

    #[test]
    fn test_layout_matches_dimensions() {
        let layout = five_symbols().with_grid(4, 2).layout().unwrap();
        assert_eq!((layout.rows(), layout.columns()), (4, 2));
        assert_eq!(five_symbols().with_grid(0, 2).layout(), Err(ConfigError::ZeroRows));
    }

    #[test]
    fn test_non_positive_deceleration_rejected() {
        let err = five_symbols().with_spin(1000.0, 0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "deceleration",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let err = five_symbols()
            .with_tile_size(Vec2::new(f32::NAN, 100.0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "tile_size", .. }));

        let err = five_symbols()
            .with_settle_duration(f32::INFINITY)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "settle_duration",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_spacing_and_stagger_allowed() {
        let config = five_symbols()
            .with_spacing(Vec2::ZERO)
            .with_stagger(0.0)
            .with_settle_duration(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MachineConfig::from_json(
            r#"{ "palette": ["a", "b"], "columns": 3, "tile_spacing": [4.0, 6.0] }"#,
        )
        .unwrap();
        assert_eq!(config.palette, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(config.columns, 3);
        assert_eq!(config.rows, 3);
        assert_eq!(config.tile_spacing, Vec2::new(4.0, 6.0));
        assert_eq!(config.deceleration, 500.0);
    }

    #[test]
    fn test_stagger_for_column() {
        let config = five_symbols();
        assert_eq!(config.stagger_for(0), 0.0);
        assert_eq!(config.stagger_for(4), 2.0);
    }
}
