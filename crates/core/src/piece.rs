//! Falling piece controller
//!
//! Owns the single active piece, the lookahead tile and the tile source.
//! Movement, rotation and gravity are checked against the board but never
//! write to it; locking hands the piece back to the caller via
//! [`PieceController::take_for_lock`].

use crate::board::Board;
use crate::config::EngineConfig;
use crate::rng::{SimpleRng, TileGenerator};
use crate::types::{Position, Tile};

/// The active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingPiece {
    pub tile: Tile,
    pub position: Position,
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved down one row
    Fell,
    /// Cannot move further; the caller should lock
    Landed,
    /// No active piece
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    /// Spawn cell was occupied; no piece became active
    Blocked,
}

#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<FallingPiece>,
    lookahead: Tile,
    generator: TileGenerator,
    fast_fall: bool,
}

impl PieceController {
    /// Controller with a seeded tile source; the lookahead is drawn at level 1.
    pub fn new(config: &EngineConfig) -> Self {
        Self::from_generator(TileGenerator::new(config))
    }

    /// Controller whose first tiles come from `tiles` (first is the first
    /// piece to spawn, second its lookahead, and so on).
    pub fn with_sequence(config: &EngineConfig, tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self::from_generator(TileGenerator::with_sequence(config, tiles))
    }

    fn from_generator(mut generator: TileGenerator) -> Self {
        let lookahead = generator.next_tile(1);
        Self {
            active: None,
            lookahead,
            generator,
            fast_fall: false,
        }
    }

    pub fn active(&self) -> Option<FallingPiece> {
        self.active
    }

    pub fn lookahead(&self) -> Tile {
        self.lookahead
    }

    pub fn fast_fall(&self) -> bool {
        self.fast_fall
    }

    /// Promote the lookahead to the active piece at the spawn cell and draw a
    /// new lookahead for `level`.
    ///
    /// Fast fall is released on every spawn attempt.
    pub fn spawn(&mut self, board: &Board, level: u32) -> SpawnOutcome {
        self.fast_fall = false;
        self.active = None;

        if board.is_occupied(Position::SPAWN) {
            return SpawnOutcome::Blocked;
        }

        let tile = std::mem::replace(&mut self.lookahead, self.generator.next_tile(level));
        self.active = Some(FallingPiece {
            tile,
            position: Position::SPAWN,
        });
        log::trace!("spawned {:?}, next {:?}", tile, self.lookahead);
        SpawnOutcome::Spawned
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.shift(board, Position::left)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.shift(board, Position::right)
    }

    fn shift(&mut self, board: &Board, dir: fn(Position) -> Option<Position>) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        match dir(piece.position) {
            Some(pos) if !board.is_occupied(pos) => {
                piece.position = pos;
                true
            }
            _ => false,
        }
    }

    /// Swap the active tile with the lookahead. Position is unchanged.
    pub fn rotate(&mut self) -> bool {
        match self.active.as_mut() {
            Some(piece) => {
                std::mem::swap(&mut piece.tile, &mut self.lookahead);
                true
            }
            None => false,
        }
    }

    /// Flip fast fall for the current piece. Returns the new state.
    pub fn toggle_fast_fall(&mut self) -> bool {
        if self.active.is_some() {
            self.fast_fall = !self.fast_fall;
        }
        self.fast_fall
    }

    /// Apply one row of gravity.
    pub fn step(&mut self, board: &Board) -> StepOutcome {
        let Some(piece) = self.active.as_mut() else {
            return StepOutcome::Idle;
        };

        if board.is_occupied(piece.position) {
            return StepOutcome::Landed;
        }
        match piece.position.below() {
            Some(pos) if !board.is_occupied(pos) => {
                piece.position = pos;
                StepOutcome::Fell
            }
            _ => StepOutcome::Landed,
        }
    }

    /// Remove the active piece so it can be written into the board.
    pub fn take_for_lock(&mut self) -> Option<FallingPiece> {
        self.active.take()
    }

    /// Shared random source (power-up effects and target re-rolls draw from it too)
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        self.generator.rng_mut()
    }
}
