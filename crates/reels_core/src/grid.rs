//! Grid layout and the tile arena.
//!
//! [`GridLayout`] is the fixed arithmetic of the reel band: tile pitch,
//! centering offset, wraparound span, and final resting positions. [`Grid`]
//! owns exactly one [`Tile`] per `(row, column)` cell for its whole lifetime;
//! spinning mutates tiles in place instead of allocating new ones.

use rand::Rng;
use reels_math::{Transform2D, Vec2};
use tracing::debug;

use crate::error::ConfigError;
use crate::palette::{SymbolId, SymbolPalette};

/// Geometry of a `rows × columns` grid of equally sized tiles.
///
/// Always has at least one row and one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    rows: usize,
    columns: usize,
    tile_size: Vec2,
    spacing: Vec2,
}

impl GridLayout {
    /// Create a layout.
    ///
    /// Sizes are not range-checked here; see
    /// [`MachineConfig::validate`](crate::MachineConfig::validate).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRows`] or [`ConfigError::ZeroColumns`] for
    /// an empty grid.
    pub fn new(
        rows: usize,
        columns: usize,
        tile_size: Vec2,
        spacing: Vec2,
    ) -> Result<Self, ConfigError> {
        if rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        Ok(Self {
            rows,
            columns,
            tile_size,
            spacing,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Width and height of one tile.
    #[must_use]
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Gap between adjacent tiles.
    #[must_use]
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// Number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Distance between the origins of adjacent tiles.
    #[must_use]
    pub fn pitch(&self) -> Vec2 {
        self.tile_size + self.spacing
    }

    /// Extent of the whole grid: `n * tile + (n - 1) * spacing` per axis.
    #[must_use]
    pub fn total_size(&self) -> Vec2 {
        let cells = Vec2::new(self.columns as f32, self.rows as f32);
        cells * self.tile_size + (cells - Vec2::ONE) * self.spacing
    }

    /// Offset applied to the grid so its bounding box is centered on the origin.
    #[must_use]
    pub fn anchor(&self) -> Vec2 {
        let total = self.total_size();
        Vec2::new(
            -total.x / 2.0 + self.tile_size.x / 2.0,
            total.y / 2.0 - self.tile_size.y / 2.0,
        )
    }

    /// Initial local position of tile `(row, column)`. Row 0 is at the top.
    #[must_use]
    pub fn base_position(&self, row: usize, column: usize) -> Vec2 {
        let pitch = self.pitch();
        Vec2::new(column as f32 * pitch.x, -(row as f32) * pitch.y)
    }

    /// Resting local position of tile `(row, column)` after a spin settles.
    #[must_use]
    pub fn final_position(&self, row: usize, column: usize) -> Vec2 {
        let pitch = self.pitch();
        let bottom = -((self.rows - 1) as f32) * pitch.y;
        Vec2::new(column as f32 * pitch.x, bottom + row as f32 * pitch.y)
    }

    /// Vertical distance added to a tile when it wraps around.
    #[must_use]
    pub fn wrap_span(&self) -> f32 {
        self.rows as f32 * self.pitch().y
    }

    /// A scrolling tile wraps once its y is strictly below this value.
    #[must_use]
    pub fn wrap_threshold(&self) -> f32 {
        -self.wrap_span()
    }
}

/// A single grid cell and the symbol it is showing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    row: usize,
    column: usize,
    transform: Transform2D,
    symbol: SymbolId,
}

impl Tile {
    /// The tile's row. Fixed for its lifetime.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// The tile's column (reel). Fixed for its lifetime.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Local transform relative to the grid anchor.
    #[must_use]
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Local position relative to the grid anchor.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// The symbol currently displayed.
    #[must_use]
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    pub(crate) fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
    }

    pub(crate) fn set_symbol(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
    }
}

/// A fixed-size arena of tiles addressed by `(row, column)`.
///
/// Tiles are stored column-major, so one reel is a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    layout: GridLayout,
    anchor: Vec2,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Lay out `rows × columns` tiles on the layout's pitch, give each an
    /// independent random symbol, and center the grid on the origin.
    pub fn build<R: Rng + ?Sized>(
        layout: GridLayout,
        palette: &SymbolPalette,
        rng: &mut R,
    ) -> Self {
        let mut tiles = Vec::with_capacity(layout.cell_count());
        for column in 0..layout.columns() {
            for row in 0..layout.rows() {
                tiles.push(Tile {
                    row,
                    column,
                    transform: Transform2D::from_position(layout.base_position(row, column)),
                    symbol: palette.draw(rng),
                });
            }
        }

        let anchor = layout.anchor();
        debug!(
            rows = layout.rows(),
            columns = layout.columns(),
            anchor_x = anchor.x,
            anchor_y = anchor.y,
            "built reel grid"
        );

        Self {
            layout,
            anchor,
            tiles,
        }
    }

    /// The grid's geometry.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Offset of the grid's local origin from the world origin.
    #[must_use]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// All tiles, column-major.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if the grid has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.layout.rows && column < self.layout.columns)
            .then(|| column * self.layout.rows + row)
    }

    /// The tile at `(row, column)`.
    #[must_use]
    pub fn tile(&self, row: usize, column: usize) -> Option<&Tile> {
        self.index(row, column).map(|i| &self.tiles[i])
    }

    /// The tiles of one reel, ordered by row. Empty if `column` is out of range.
    #[must_use]
    pub fn column(&self, column: usize) -> &[Tile] {
        if column >= self.layout.columns {
            return &[];
        }
        let start = column * self.layout.rows;
        &self.tiles[start..start + self.layout.rows]
    }

    pub(crate) fn column_mut(&mut self, column: usize) -> &mut [Tile] {
        if column >= self.layout.columns {
            return &mut [];
        }
        let start = column * self.layout.rows;
        &mut self.tiles[start..start + self.layout.rows]
    }

    /// World-space position of the tile at `(row, column)`.
    #[must_use]
    pub fn world_position(&self, row: usize, column: usize) -> Option<Vec2> {
        self.tile(row, column).map(|t| t.transform().translated(self.anchor).position)
    }

    /// World-space `(min, max)` corners of the box enclosing every tile.
    ///
    /// Tile positions are tile centers.
    #[must_use]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = self.layout.tile_size / 2.0;
        self.tiles.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), tile| {
                let center = tile.transform().translated(self.anchor).position;
                (min.min(center - half), max.max(center + half))
            },
        )
    }

    /// Displayed symbols as a `rows × columns` matrix, each column ordered
    /// top to bottom by the tiles' current height.
    #[must_use]
    pub fn visible_window(&self) -> Vec<Vec<SymbolId>> {
        let mut window = vec![Vec::with_capacity(self.layout.columns); self.layout.rows];
        for column in 0..self.layout.columns {
            let mut reel: Vec<&Tile> = self.column(column).iter().collect();
            reel.sort_by(|a, b| b.position().y.total_cmp(&a.position().y));
            for (row, tile) in reel.into_iter().enumerate() {
                window[row].push(tile.symbol());
            }
        }
        window
    }
}
