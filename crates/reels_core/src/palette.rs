//! Symbols and the palette tiles draw them from.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An immutable reference to a visual asset shown on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    asset: String,
}

impl Symbol {
    /// Create a symbol referring to the given asset.
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
        }
    }

    /// The asset name or path.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }
}

/// Index of a [`Symbol`] within its [`SymbolPalette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub usize);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fixed, non-empty pool of symbols eligible for random assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPalette {
    symbols: Vec<Symbol>,
}

impl SymbolPalette {
    /// Create a palette from a list of symbols.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPalette`] if `symbols` is empty.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, ConfigError> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { symbols })
    }

    /// Create a palette from asset names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPalette`] if the iterator yields nothing.
    pub fn from_assets<I, S>(assets: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(assets.into_iter().map(Symbol::new).collect())
    }

    /// Number of symbols. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; a palette cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Resolve an id to its symbol.
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// Returns `true` if `id` indexes a symbol in this palette.
    #[must_use]
    pub fn contains(&self, id: SymbolId) -> bool {
        id.0 < self.symbols.len()
    }

    /// Draw a symbol uniformly at random.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        SymbolId(rng.gen_range(0..self.symbols.len()))
    }

    /// Iterate over the symbols in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
