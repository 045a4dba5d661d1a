use serde::Serialize;

use crate::board::RawGrid;
use crate::piece::FallingPiece;
use crate::types::{Digit, GameMode, PowerUpUsage, Tile, BOARD_COLUMNS, BOARD_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshot {
    pub tile: Tile,
    /// Raw cell encoding of `tile`
    pub value: i8,
    pub row: u8,
    pub column: u8,
}

impl From<FallingPiece> for ActiveSnapshot {
    fn from(value: FallingPiece) -> Self {
        Self {
            tile: value.tile,
            value: value.tile.raw(),
            row: value.position.row(),
            column: value.position.column(),
        }
    }
}

/// Everything a presentation layer may observe about a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub board: RawGrid,
    pub active: Option<ActiveSnapshot>,
    pub lookahead: Tile,
    pub score: u32,
    pub level: u32,
    pub target: u32,
    pub combo_count: u32,
    pub combo_multiplier: u32,
    pub fall_interval_ms: u64,
    pub fast_fall: bool,
    pub remaining_secs: Option<u32>,
    pub elapsed_ms: u64,
    pub mistakes: u32,
    pub power_ups: PowerUpUsage,
    pub paused: bool,
    pub game_over: bool,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            board: [[0i8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize],
            active: None,
            lookahead: Tile::Number(Digit::clamped(1)),
            score: 0,
            level: 1,
            target: GameMode::Classic.settings().initial_target,
            combo_count: 0,
            combo_multiplier: 1,
            fall_interval_ms: 0,
            fast_fall: false,
            remaining_secs: None,
            elapsed_ms: 0,
            mistakes: 0,
            power_ups: PowerUpUsage::default(),
            paused: false,
            game_over: false,
        }
    }
}
