//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond validation and conversion,
//! making them usable in any context (simulation, presentation, bookkeeping).
//!
//! # Board Dimensions
//!
//! The playfield is a narrow, short grid:
//!
//! - **Rows**: 10 (indexed 0-9, row 0 is the spawn edge at the top)
//! - **Columns**: 6 (indexed 0-5)
//! - **Spawn position**: row 0, column 2
//!
//! # Cell Encoding
//!
//! Cells are a tagged type ([`Cell`]) inside the engine. The raw `i8` encoding
//! is kept for snapshots and external collaborators:
//!
//! | Raw | Meaning |
//! |-----|---------|
//! | `0` | empty |
//! | `1..=9` | placed number |
//! | `-1` | multiplier power-up |
//! | `-2` | randomizer power-up |
//! | `-3` | clear-row power-up |
//! | `-4` | clear-column power-up |
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `POINTS_PER_LINE` | 100 | Base points for one cleared run |
//! | `MAX_COMBO_MULTIPLIER` | 5 | Cap for the combo-derived multiplier |
//! | `LEVEL_SCORE_STEP` | 500 | Level `n` ends once score reaches `n * 500` |
//! | `COMBO_TIMEOUT_MS` | 5000 | Combo decays after this long without a clear |
//! | `MAX_TARGET_NUMBER` | 20 | Upper bound for escalating targets |
//!
//! # Examples
//!
//! ```
//! use sumfall_types::{Cell, Command, GameMode, PowerUpKind, Position, BOARD_COLUMNS, BOARD_ROWS};
//!
//! // Positions are validated on construction
//! assert!(Position::new(9, 5).is_some());
//! assert!(Position::new(10, 0).is_none());
//!
//! // Raw cell values round-trip through the tagged type
//! let cell = Cell::from_raw(-3).unwrap();
//! assert_eq!(cell, Cell::PowerUp(PowerUpKind::ClearRow));
//! assert_eq!(cell.raw(), -3);
//!
//! // Modes and commands parse from their wire names
//! let mode: GameMode = "timeAttack".parse().unwrap();
//! assert_eq!(mode.settings().time_limit_secs, Some(180));
//! assert_eq!("rotate".parse::<Command>().unwrap(), Command::Rotate);
//!
//! assert_eq!(BOARD_ROWS, 10);
//! assert_eq!(BOARD_COLUMNS, 6);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board height in cells (10 rows)
pub const BOARD_ROWS: u8 = 10;

/// Board width in cells (6 columns)
pub const BOARD_COLUMNS: u8 = 6;

/// Row where new pieces appear
pub const SPAWN_ROW: u8 = 0;

/// Column where new pieces appear
pub const SPAWN_COLUMN: u8 = 2;

/// Base points awarded per cleared run, before multipliers
pub const POINTS_PER_LINE: u32 = 100;

/// Upper bound of the multiplier derived from the combo count
pub const MAX_COMBO_MULTIPLIER: u32 = 5;

/// Score step per level: level `n` advances once score reaches `n * LEVEL_SCORE_STEP`
pub const LEVEL_SCORE_STEP: u32 = 500;

/// Combo decays to zero when no clear happened for longer than this
pub const COMBO_TIMEOUT_MS: u64 = 5_000;

/// Highest target number escalating modes can reach
pub const MAX_TARGET_NUMBER: u32 = 20;

/// Target increment per level in escalating modes
pub const TARGET_STEP: u32 = 2;

/// Width of the re-roll window used by survival mode
pub const TARGET_REROLL_SPREAD: u32 = 4;

/// Countdown tick interval for timed modes (1 second)
pub const COUNTDOWN_TICK_MS: u64 = 1_000;

/// Fall interval while fast fall is engaged
pub const FAST_FALL_INTERVAL_MS: u64 = 50;

/// A placed number, always in `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    /// Returns `None` unless `value` is in `1..=9`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Nearest digit to `value` (0 becomes 1, anything above 9 becomes 9)
    pub const fn clamped(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidDigit(value))
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> Self {
        d.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("digit out of range 1..=9: {0}")]
pub struct InvalidDigit(pub u8);

/// The four power-up effects
///
/// - **Multiplier**: doubles the combo multiplier on the spot
/// - **Randomizer**: re-rolls every placed number on the board
/// - **ClearRow**: wipes the row the power-up locked in
/// - **ClearColumn**: wipes the column the power-up locked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    Multiplier,
    Randomizer,
    ClearRow,
    ClearColumn,
}

impl PowerUpKind {
    pub const ALL: [Self; 4] = [
        Self::Multiplier,
        Self::Randomizer,
        Self::ClearRow,
        Self::ClearColumn,
    ];

    /// Negative sentinel used by the raw cell encoding
    pub const fn sentinel(self) -> i8 {
        match self {
            Self::Multiplier => -1,
            Self::Randomizer => -2,
            Self::ClearRow => -3,
            Self::ClearColumn => -4,
        }
    }

    pub const fn from_sentinel(raw: i8) -> Option<Self> {
        match raw {
            -1 => Some(Self::Multiplier),
            -2 => Some(Self::Randomizer),
            -3 => Some(Self::ClearRow),
            -4 => Some(Self::ClearColumn),
            _ => None,
        }
    }

    /// Stable index into per-kind tables (`0..4`)
    pub const fn index(self) -> usize {
        match self {
            Self::Multiplier => 0,
            Self::Randomizer => 1,
            Self::ClearRow => 2,
            Self::ClearColumn => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multiplier => "multiplier",
            Self::Randomizer => "randomizer",
            Self::ClearRow => "clearRow",
            Self::ClearColumn => "clearColumn",
        }
    }
}

/// Value carried by the falling piece and the lookahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tile {
    Number(Digit),
    PowerUp(PowerUpKind),
}

impl Tile {
    /// Shorthand for number tiles; `None` outside `1..=9`.
    pub const fn number(value: u8) -> Option<Self> {
        match Digit::new(value) {
            Some(d) => Some(Self::Number(d)),
            None => None,
        }
    }

    pub const fn raw(self) -> i8 {
        match self {
            Self::Number(d) => d.get() as i8,
            Self::PowerUp(kind) => kind.sentinel(),
        }
    }

    pub const fn is_power_up(self) -> bool {
        matches!(self, Self::PowerUp(_))
    }
}

/// A single board cell
///
/// Power-up cells only exist between a power-up locking and its resolution
/// within the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Number(Digit),
    PowerUp(PowerUpKind),
}

impl Cell {
    /// Decode the raw encoding. Returns `None` for values outside `-4..=9`.
    pub const fn from_raw(raw: i8) -> Option<Self> {
        if raw == 0 {
            return Some(Self::Empty);
        }
        if raw > 0 {
            return match Digit::new(raw as u8) {
                Some(d) => Some(Self::Number(d)),
                None => None,
            };
        }
        match PowerUpKind::from_sentinel(raw) {
            Some(kind) => Some(Self::PowerUp(kind)),
            None => None,
        }
    }

    pub const fn raw(self) -> i8 {
        match self {
            Self::Empty => 0,
            Self::Number(d) => d.get() as i8,
            Self::PowerUp(kind) => kind.sentinel(),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Contribution to a run sum: the digit for numbers, zero otherwise.
    pub const fn number_value(self) -> u32 {
        match self {
            Self::Number(d) => d.get() as u32,
            _ => 0,
        }
    }
}

impl From<Tile> for Cell {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Number(d) => Cell::Number(d),
            Tile::PowerUp(kind) => Cell::PowerUp(kind),
        }
    }
}

/// A validated grid coordinate
///
/// Fields are private so that every `Position` in circulation is inside the
/// board; accessors taking a `Position` never need bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    /// The cell every new piece appears in
    pub const SPAWN: Position = Position {
        row: SPAWN_ROW,
        column: SPAWN_COLUMN,
    };

    pub const fn new(row: u8, column: u8) -> Option<Self> {
        if row < BOARD_ROWS && column < BOARD_COLUMNS {
            Some(Self { row, column })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn column(self) -> u8 {
        self.column
    }

    /// Row-major index into a flat `BOARD_ROWS * BOARD_COLUMNS` array
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_COLUMNS as usize + self.column as usize
    }

    /// One row further from the spawn edge, if still on the board
    pub const fn below(self) -> Option<Self> {
        Self::new(self.row + 1, self.column)
    }

    pub const fn left(self) -> Option<Self> {
        if self.column == 0 {
            None
        } else {
            Some(Self {
                row: self.row,
                column: self.column - 1,
            })
        }
    }

    pub const fn right(self) -> Option<Self> {
        Self::new(self.row, self.column + 1)
    }

    /// Iterate every board position in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLUMNS).map(move |column| Position { row, column }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A full row or column of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Line {
    Row(u8),
    Column(u8),
}

impl Line {
    /// Number of cells along this line
    pub const fn len(self) -> u8 {
        match self {
            Line::Row(_) => BOARD_COLUMNS,
            Line::Column(_) => BOARD_ROWS,
        }
    }

    /// Position of the `index`-th cell along the line, if both are in range.
    pub const fn position(self, index: u8) -> Option<Position> {
        match self {
            Line::Row(row) => Position::new(row, index),
            Line::Column(column) => Position::new(index, column),
        }
    }

    /// Every row followed by every column
    pub fn all() -> impl Iterator<Item = Line> {
        (0..BOARD_ROWS)
            .map(Line::Row)
            .chain((0..BOARD_COLUMNS).map(Line::Column))
    }
}

/// How the target number evolves on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetRule {
    /// Add `step`, never exceeding `max`
    Escalate { step: u32, max: u32 },
    /// Re-roll uniformly in `[current, current + spread]`, never exceeding `max`
    Reroll { spread: u32, max: u32 },
    /// Target never changes
    Pinned,
}

/// Fixed parameters of a game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSettings {
    pub initial_target: u32,
    pub time_limit_secs: Option<u32>,
    /// Points multiplier as a ratio (`numerator / denominator`), applied after the combo multiplier
    pub points_numerator: u32,
    pub points_denominator: u32,
    pub target_rule: TargetRule,
}

impl ModeSettings {
    /// Whether the target number may change with level
    pub fn target_escalates(&self) -> bool {
        !matches!(self.target_rule, TargetRule::Pinned)
    }
}

/// The closed set of playable modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    Classic,
    TimeAttack,
    Zen,
    Challenges,
    Survival,
}

impl GameMode {
    pub const ALL: [Self; 5] = [
        Self::Classic,
        Self::TimeAttack,
        Self::Zen,
        Self::Challenges,
        Self::Survival,
    ];

    pub const fn settings(self) -> ModeSettings {
        const ESCALATE: TargetRule = TargetRule::Escalate {
            step: TARGET_STEP,
            max: MAX_TARGET_NUMBER,
        };
        match self {
            Self::Classic => ModeSettings {
                initial_target: 10,
                time_limit_secs: None,
                points_numerator: 1,
                points_denominator: 1,
                target_rule: ESCALATE,
            },
            Self::TimeAttack => ModeSettings {
                initial_target: 15,
                time_limit_secs: Some(180),
                points_numerator: 3,
                points_denominator: 2,
                target_rule: ESCALATE,
            },
            Self::Zen => ModeSettings {
                initial_target: 8,
                time_limit_secs: None,
                points_numerator: 1,
                points_denominator: 1,
                target_rule: TargetRule::Pinned,
            },
            Self::Challenges => ModeSettings {
                initial_target: 12,
                time_limit_secs: None,
                points_numerator: 1,
                points_denominator: 1,
                target_rule: ESCALATE,
            },
            Self::Survival => ModeSettings {
                initial_target: 10,
                time_limit_secs: None,
                points_numerator: 1,
                points_denominator: 1,
                target_rule: TargetRule::Reroll {
                    spread: TARGET_REROLL_SPREAD,
                    max: MAX_TARGET_NUMBER,
                },
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::TimeAttack => "timeAttack",
            Self::Zen => "zen",
            Self::Challenges => "challenges",
            Self::Survival => "survival",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for GameMode {
    type Err = ParseModeError;

    /// Case-insensitive; accepts `time-attack` / `time_attack` spellings too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "classic" => Ok(Self::Classic),
            "timeattack" => Ok(Self::TimeAttack),
            "zen" => Ok(Self::Zen),
            "challenges" => Ok(Self::Challenges),
            "survival" => Ok(Self::Survival),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Player commands, already resolved from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Shift the piece one column left
    MoveLeft,
    /// Shift the piece one column right
    MoveRight,
    /// Swap the piece value with the lookahead
    Rotate,
    /// Engage or release fast fall for the current piece
    ToggleFastFall,
    /// Suspend or resume both tick sources
    TogglePause,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::Rotate => "rotate",
            Command::ToggleFastFall => "toggleFastFall",
            Command::TogglePause => "togglePause",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0:?}")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "moveleft" => Ok(Command::MoveLeft),
            "moveright" => Ok(Command::MoveRight),
            "rotate" => Ok(Command::Rotate),
            "togglefastfall" | "fastfall" => Ok(Command::ToggleFastFall),
            "togglepause" | "pause" => Ok(Command::TogglePause),
            _ => Err(ParseCommandError(s.to_string())),
        }
    }
}

/// Per-kind power-up activation counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerUpUsage {
    counts: [u32; 4],
}

impl PowerUpUsage {
    pub fn record(&mut self, kind: PowerUpKind) {
        self.counts[kind.index()] = self.counts[kind.index()].saturating_add(1);
    }

    pub fn count(&self, kind: PowerUpKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, u32)> + '_ {
        PowerUpKind::ALL.iter().map(move |k| (*k, self.count(*k)))
    }
}

/// Final record of a finished session
///
/// Handed to stats/achievement collaborators at game over; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    pub mode: GameMode,
    pub final_score: u32,
    pub max_combo: u32,
    pub max_level: u32,
    pub power_ups: PowerUpUsage,
    pub elapsed_ms: u64,
    pub mistakes: u32,
    pub perfect_game: bool,
}

/// Fire-and-forget notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    /// One cascade pass cleared `lines` runs worth `score_delta` points
    LineClear { lines: u32, score_delta: u32 },
    /// Combo streak extended beyond a single clear
    Combo { count: u32, multiplier: u32 },
    LevelUp { level: u32, target: u32 },
    PowerUpActivated {
        kind: PowerUpKind,
        position: Position,
        score_delta: u32,
    },
    GameOver(OutcomeSummary),
}
