//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board model, the line matcher, the falling piece
//! controller, combo/scoring progression and power-up resolution.
//! It has **no dependencies** on timers, rendering or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: Can run in any environment (headless simulation, GUI, tests)
//! - **Allocation-free**: Scan results and cascades use fixed-capacity `ArrayVec`s
//!
//! # Module Structure
//!
//! - [`board`]: 10x6 grid storage with range clearing
//! - [`matcher`]: contiguous-sum run detection and cascade
//! - [`piece`]: active piece, lookahead, movement and gravity
//! - [`scoring`]: combo multiplier, points, level and target progression
//! - [`powerup`]: multiplier / randomizer / clear-row / clear-column effects
//! - [`rng`]: seeded LCG and tile generation
//! - [`config`]: engine tunables and validation
//! - [`snapshot`]: serializable view of a session
//!
//! # Example
//!
//! ```
//! use sumfall_core::{matcher, Board};
//!
//! let mut grid = [[0i8; 6]; 10];
//! grid[9] = [3, 4, 3, 0, 0, 0];
//! let mut board = Board::from_values(&grid).unwrap();
//!
//! let passes = matcher::cascade(&mut board, 10);
//! assert_eq!(passes.as_slice(), &[1]);
//! assert!(board.is_empty());
//! ```

pub mod board;
pub mod config;
pub mod matcher;
pub mod piece;
pub mod powerup;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use sumfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RawGrid};
pub use config::{ConfigError, EngineConfig, FallTier};
pub use matcher::{cascade, scan_and_clear, ClearedRun, ScanResult};
pub use piece::{FallingPiece, PieceController, SpawnOutcome, StepOutcome};
pub use powerup::PowerUpEffect;
pub use rng::{SimpleRng, TileGenerator};
pub use scoring::{ClearAward, LevelUp, Scoring};
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
