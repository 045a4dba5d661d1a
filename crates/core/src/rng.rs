//! RNG module - seeded tile generation
//!
//! Tiles are drawn independently: each draw is a power-up with a
//! level-dependent probability, otherwise a uniformly chosen digit 1-9.
//! Power-up kinds are chosen uniformly among the four variants.
//!
//! Also provides a simple LCG so that a seed fully determines a game.

use std::collections::VecDeque;

use crate::config::EngineConfig;
use crate::types::{Digit, PowerUpKind, Tile};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max.max(1)
    }

    /// Uniform value in `[lo, hi]` (inclusive). Returns `lo` if the range is inverted.
    pub fn next_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range(hi - lo + 1)
    }

    /// Uniform digit 1-9
    pub fn next_digit(&mut self) -> Digit {
        Digit::clamped(self.next_inclusive(Digit::MIN as u32, Digit::MAX as u32) as u8)
    }

    /// Current internal state (restarting from it replays the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Source of piece values
///
/// Either random (seeded) or a scripted sequence that falls back to the
/// random source once exhausted. Scripts make scenario tests deterministic
/// without depending on the LCG's output.
#[derive(Debug, Clone)]
pub struct TileGenerator {
    rng: SimpleRng,
    scripted: VecDeque<Tile>,
    base_percent: u32,
    per_level_percent: u32,
    max_percent: u32,
}

impl TileGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rng: SimpleRng::new(config.seed),
            scripted: VecDeque::new(),
            base_percent: config.powerup_base_percent,
            per_level_percent: config.powerup_percent_per_level,
            max_percent: config.powerup_max_percent,
        }
    }

    /// Generator that yields `tiles` first, then continues randomly.
    pub fn with_sequence(config: &EngineConfig, tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut gen = Self::new(config);
        gen.scripted.extend(tiles);
        gen
    }

    /// Append tiles to the scripted queue
    pub fn push_script(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.scripted.extend(tiles);
    }

    /// Power-up probability in percent for `level`:
    /// `base + per_level * (level - 1)`, capped at `max`.
    pub fn chance_percent(&self, level: u32) -> u32 {
        let bonus = self.per_level_percent.saturating_mul(level.saturating_sub(1));
        self.base_percent.saturating_add(bonus).min(self.max_percent)
    }

    /// Draw the next tile for a piece spawned at `level`
    pub fn next_tile(&mut self, level: u32) -> Tile {
        if let Some(tile) = self.scripted.pop_front() {
            return tile;
        }

        if self.rng.next_range(100) < self.chance_percent(level) {
            let i = self.rng.next_range(PowerUpKind::ALL.len() as u32) as usize;
            Tile::PowerUp(PowerUpKind::ALL[i])
        } else {
            Tile::Number(self.rng.next_digit())
        }
    }

    /// Access to the underlying RNG (randomizer power-up, target re-rolls)
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }
}
