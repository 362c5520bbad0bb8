//! Per-column spin state machine.
//!
//! Each [`Reel`] walks one column through
//! `Idle → Delayed → Scrolling → Settling → Idle`, advanced once per host time
//! step by [`Reel::advance`]. Reels share nothing but the random source, so
//! their scrolling phases are independent once started.

use rand::Rng;
use reels_math::Transform2D;
use tracing::{debug, trace};

use crate::event::MachineEvent;
use crate::grid::{GridLayout, Tile};
use crate::palette::SymbolPalette;

/// Motion parameters shared by every reel of a machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelParams {
    /// Scroll velocity when scrolling begins.
    pub initial_spin_speed: f32,
    /// Velocity lost per second while scrolling.
    pub deceleration: f32,
    /// Length of the settle phase.
    pub settle_duration: f32,
}

/// Where a reel is in its spin.
#[derive(Debug, Clone, PartialEq)]
pub enum ReelPhase {
    /// Not animating.
    Idle,
    /// Waiting out the column's stagger delay.
    Delayed {
        /// Delay left before scrolling begins.
        remaining: f32,
    },
    /// Moving down with decreasing velocity, wrapping tiles around.
    Scrolling {
        /// Current scroll velocity.
        velocity: f32,
        /// Time spent scrolling so far.
        elapsed: f32,
    },
    /// Easing tiles from where they stopped into the final layout.
    Settling {
        /// Time spent settling so far.
        elapsed: f32,
        /// Tile transforms when settling began, ordered by row.
        from: Vec<Transform2D>,
    },
}

/// Everything a reel needs from its machine during one step.
pub struct ReelContext<'a, R: ?Sized> {
    /// Grid geometry.
    pub layout: &'a GridLayout,
    /// Motion parameters.
    pub params: ReelParams,
    /// Symbols drawn on wraparound.
    pub palette: &'a SymbolPalette,
    /// Random source for wraparound symbols.
    pub rng: &'a mut R,
}

/// The animation state of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Reel {
    column: usize,
    phase: ReelPhase,
}

impl Reel {
    /// Create an idle reel for `column`.
    #[must_use]
    pub fn new(column: usize) -> Self {
        Self {
            column,
            phase: ReelPhase::Idle,
        }
    }

    /// The column this reel animates.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> &ReelPhase {
        &self.phase
    }

    /// Returns `true` if the reel is not animating.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ReelPhase::Idle)
    }

    /// Scroll velocity, if the reel is scrolling.
    #[must_use]
    pub fn velocity(&self) -> Option<f32> {
        match self.phase {
            ReelPhase::Scrolling { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    /// Begin a spin: wait `delay` before scrolling.
    pub fn start(&mut self, delay: f32) {
        self.phase = ReelPhase::Delayed { remaining: delay };
    }

    /// Advance the reel by `dt` seconds, moving the column's `tiles`.
    ///
    /// `tiles` must be this reel's column, ordered by row. Time left over
    /// after the start delay is spent scrolling in the same step; a reel that
    /// begins settling during a step starts interpolating on the next one.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        tiles: &mut [Tile],
        ctx: &mut ReelContext<'_, R>,
        events: &mut Vec<MachineEvent>,
    ) {
        match self.phase {
            ReelPhase::Idle => {}
            ReelPhase::Delayed { remaining } => {
                if remaining > dt {
                    self.phase = ReelPhase::Delayed {
                        remaining: remaining - dt,
                    };
                    return;
                }
                let leftover = dt - remaining;
                self.begin_scrolling(tiles, ctx, events);
                if leftover > 0.0 {
                    self.scroll(leftover, tiles, ctx, events);
                }
            }
            ReelPhase::Scrolling { .. } => self.scroll(dt, tiles, ctx, events),
            ReelPhase::Settling { .. } => self.settle(dt, tiles, ctx, events),
        }
    }

    fn begin_scrolling<R: Rng + ?Sized>(
        &mut self,
        tiles: &[Tile],
        ctx: &ReelContext<'_, R>,
        events: &mut Vec<MachineEvent>,
    ) {
        let velocity = ctx.params.initial_spin_speed;
        debug!(column = self.column, velocity, "reel scrolling");
        events.push(MachineEvent::ColumnScrolling {
            column: self.column,
        });

        if velocity > 0.0 {
            self.phase = ReelPhase::Scrolling {
                velocity,
                elapsed: 0.0,
            };
        } else {
            self.begin_settling(tiles, events);
        }
    }

    fn scroll<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        tiles: &mut [Tile],
        ctx: &mut ReelContext<'_, R>,
        events: &mut Vec<MachineEvent>,
    ) {
        let ReelPhase::Scrolling { velocity, elapsed } = &mut self.phase else {
            return;
        };

        let threshold = ctx.layout.wrap_threshold();
        let span = ctx.layout.wrap_span();
        for tile in tiles.iter_mut() {
            let mut position = tile.position();
            position.y -= *velocity * dt;
            if position.y < threshold {
                position.y += span;
                let symbol = ctx.palette.draw(&mut *ctx.rng);
                tile.set_symbol(symbol);
                trace!(row = tile.row(), column = tile.column(), %symbol, "tile wrapped");
                events.push(MachineEvent::TileWrapped {
                    row: tile.row(),
                    column: tile.column(),
                    symbol,
                });
            }
            tile.set_position(position);
        }

        *velocity -= ctx.params.deceleration * dt;
        *elapsed += dt;

        if *velocity <= 0.0 {
            debug!(column = self.column, scrolled_for = *elapsed, "reel stopped");
            self.begin_settling(tiles, events);
        }
    }

    fn begin_settling(&mut self, tiles: &[Tile], events: &mut Vec<MachineEvent>) {
        self.phase = ReelPhase::Settling {
            elapsed: 0.0,
            from: tiles.iter().map(|t| *t.transform()).collect(),
        };
        events.push(MachineEvent::ColumnSettling {
            column: self.column,
        });
    }

    fn settle<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        tiles: &mut [Tile],
        ctx: &ReelContext<'_, R>,
        events: &mut Vec<MachineEvent>,
    ) {
        let ReelPhase::Settling { elapsed, from } = &mut self.phase else {
            return;
        };

        *elapsed += dt;
        let duration = ctx.params.settle_duration;

        if *elapsed >= duration {
            // Snap, so interpolation error never survives the spin.
            for tile in tiles.iter_mut() {
                tile.set_position(ctx.layout.final_position(tile.row(), tile.column()));
            }
            debug!(column = self.column, "reel settled");
            self.phase = ReelPhase::Idle;
            events.push(MachineEvent::ColumnSettled {
                column: self.column,
            });
            return;
        }

        let t = *elapsed / duration;
        for (tile, start) in tiles.iter_mut().zip(from.iter()) {
            let target = ctx.layout.final_position(tile.row(), tile.column());
            tile.set_transform(start.lerp(target, t));
        }
    }
}
