//! Power-up resolver
//!
//! Runs once, right after a power-up tile locks and before the matcher
//! cascade. The power-up's own cell is consumed first, so no power-up ever
//! survives resolution.

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::scoring::Scoring;
use crate::types::{Line, PowerUpKind, Position};

/// What a resolved power-up did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUpEffect {
    pub kind: PowerUpKind,
    pub position: Position,
    /// Bonus points added to the score
    pub score_delta: u32,
    /// Number cells re-rolled or cleared
    pub cells_affected: u32,
}

/// Resolve the power-up `kind` that locked at `position`.
pub fn apply(
    kind: PowerUpKind,
    position: Position,
    board: &mut Board,
    scoring: &mut Scoring,
    rng: &mut SimpleRng,
) -> PowerUpEffect {
    board.clear(position);
    scoring.record_power_up(kind);

    let (score_delta, cells_affected) = match kind {
        PowerUpKind::Multiplier => {
            scoring.double_multiplier();
            (0, 0)
        }
        PowerUpKind::Randomizer => (0, board.randomize_numbers(|| rng.next_digit())),
        PowerUpKind::ClearRow => wipe(board, Line::Row(position.row())),
        PowerUpKind::ClearColumn => wipe(board, Line::Column(position.column())),
    };
    scoring.add_bonus(score_delta);

    log::debug!(
        "{} at {}: +{} points, {} cell(s)",
        kind.as_str(),
        position,
        score_delta,
        cells_affected
    );

    PowerUpEffect {
        kind,
        position,
        score_delta,
        cells_affected,
    }
}

fn wipe(board: &mut Board, line: Line) -> (u32, u32) {
    let cells = board.line_cells(line).filter(|c| !c.is_empty()).count() as u32;
    (board.clear_line(line), cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::RawGrid;
    use crate::types::{Cell, GameMode};

    fn setup(grid: RawGrid) -> (Board, Scoring, SimpleRng) {
        (
            Board::from_values(&grid).unwrap(),
            Scoring::new(GameMode::Classic, 5_000),
            SimpleRng::new(11),
        )
    }

    fn pos(r: u8, c: u8) -> Position {
        Position::new(r, c).unwrap()
    }

    #[test]
    fn test_randomizer_touches_numbers_only() {
        let mut grid: RawGrid = [[0; 6]; 10];
        grid[9] = [1, 0, -2, 5, 0, 0];
        let (mut board, mut scoring, mut rng) = setup(grid);

        let effect = apply(PowerUpKind::Randomizer, pos(9, 2), &mut board, &mut scoring, &mut rng);

        assert_eq!(effect.cells_affected, 2);
        assert_eq!(effect.score_delta, 0);
        let row = board.to_values()[9];
        assert!((1..=9).contains(&row[0]));
        assert_eq!(row[1], 0);
        assert_eq!(row[2], 0);
        assert!((1..=9).contains(&row[3]));
        assert_eq!(&row[4..], &[0, 0]);
        assert!(!board.has_power_up());
    }

    #[test]
    fn test_clear_row_awards_sum() {
        let mut grid: RawGrid = [[0; 6]; 10];
        grid[9] = [2, 3, 0, -3, 4, 0];
        grid[8][0] = 7;
        let (mut board, mut scoring, mut rng) = setup(grid);

        let effect = apply(PowerUpKind::ClearRow, pos(9, 3), &mut board, &mut scoring, &mut rng);

        assert_eq!(effect.score_delta, 9);
        assert_eq!(effect.cells_affected, 3);
        assert_eq!(scoring.score(), 9);
        assert_eq!(board.to_values()[9], [0; 6]);
        assert_eq!(board.get(pos(8, 0)), Cell::from_raw(7).unwrap());
    }

    #[test]
    fn test_clear_column_awards_sum() {
        let mut grid: RawGrid = [[0; 6]; 10];
        grid[6][4] = -4;
        grid[7][4] = 8;
        grid[9][4] = 1;
        grid[9][0] = 5;
        let (mut board, mut scoring, mut rng) = setup(grid);

        let effect = apply(PowerUpKind::ClearColumn, pos(6, 4), &mut board, &mut scoring, &mut rng);

        assert_eq!(effect.score_delta, 9);
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(scoring.power_ups().count(PowerUpKind::ClearColumn), 1);
    }

    #[test]
    fn test_multiplier_doubles() {
        let mut grid: RawGrid = [[0; 6]; 10];
        grid[9][2] = -1;
        let (mut board, mut scoring, mut rng) = setup(grid);

        let effect = apply(PowerUpKind::Multiplier, pos(9, 2), &mut board, &mut scoring, &mut rng);

        assert_eq!(effect.score_delta, 0);
        assert_eq!(scoring.combo_multiplier(), 2);
        assert!(board.is_empty());
        assert_eq!(scoring.power_ups().total(), 1);
    }
}
