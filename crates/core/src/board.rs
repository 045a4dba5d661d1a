//! Board module - manages the game grid
//!
//! The board is a 10x6 grid where each cell is empty, a placed number, or
//! (transiently, during lock resolution) a power-up.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates are [`Position`]s, which are always on the board, so no accessor
//! here needs a bounds check. Row 0 is the spawn edge.
//!
//! The board knows nothing about targets, scoring or power-up effects; it only
//! stores cells and clears ranges.

use crate::types::{Cell, Digit, Line, Position, BOARD_COLUMNS, BOARD_ROWS};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_ROWS as usize) * (BOARD_COLUMNS as usize);

/// Raw grid form (`[row][column]`), as used by snapshots and test fixtures
pub type RawGrid = [[i8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize];

/// The game board - 6 columns x 10 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLUMNS + column)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    pub fn rows(&self) -> u8 {
        BOARD_ROWS
    }

    pub fn columns(&self) -> u8 {
        BOARD_COLUMNS
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.index()] = cell;
    }

    /// Empty a single cell, returning what was there
    pub fn clear(&mut self, pos: Position) -> Cell {
        std::mem::take(&mut self.cells[pos.index()])
    }

    /// Check if position is occupied (anything other than empty)
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        !self.get(pos).is_empty()
    }

    /// Collision rule shared by movement, falling and spawning:
    /// off-board (`None`) or occupied counts as blocked.
    #[inline]
    pub fn is_blocked(&self, pos: Option<Position>) -> bool {
        match pos {
            Some(p) => self.is_occupied(p),
            None => true,
        }
    }

    /// Cells along `line` from index 0 upward
    pub fn line_cells(&self, line: Line) -> impl Iterator<Item = Cell> + '_ {
        (0..line.len()).filter_map(move |i| line.position(i).map(|p| self.get(p)))
    }

    /// Zero every cell in the inclusive range `start..=end` along `line`.
    ///
    /// Returns the sum of the numbers that were cleared (power-ups contribute
    /// nothing). `end` is clamped to the line length; an inverted range or an
    /// off-board line clears nothing.
    pub fn clear_range(&mut self, line: Line, start: u8, end: u8) -> u32 {
        let end = end.min(line.len().saturating_sub(1));
        let mut sum = 0;
        for i in start..=end {
            if let Some(pos) = line.position(i) {
                sum += self.clear(pos).number_value();
            }
        }
        sum
    }

    /// Clear an entire row or column
    pub fn clear_line(&mut self, line: Line) -> u32 {
        self.clear_range(line, 0, line.len() - 1)
    }

    /// Replace every placed number using `reroll`; empty and power-up cells are untouched.
    ///
    /// Returns how many cells were rerolled.
    pub fn randomize_numbers(&mut self, mut reroll: impl FnMut() -> Digit) -> u32 {
        let mut count = 0;
        for cell in &mut self.cells {
            if let Cell::Number(_) = cell {
                *cell = Cell::Number(reroll());
                count += 1;
            }
        }
        count
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Whether any cell still holds an unresolved power-up
    pub fn has_power_up(&self) -> bool {
        self.cells.iter().any(|c| matches!(c, Cell::PowerUp(_)))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; BOARD_SIZE];
    }

    /// Build a board from raw values. Returns `None` if any value is not a valid cell encoding.
    pub fn from_values(grid: &RawGrid) -> Option<Self> {
        let mut board = Self::new();
        for (r, row) in grid.iter().enumerate() {
            for (c, raw) in row.iter().enumerate() {
                let pos = Position::new(r as u8, c as u8)?;
                board.set(pos, Cell::from_raw(*raw)?);
            }
        }
        Some(board)
    }

    /// Write the raw encoding of every cell into `out`
    pub fn write_values(&self, out: &mut RawGrid) {
        for pos in Position::all() {
            out[pos.row() as usize][pos.column() as usize] = self.get(pos).raw();
        }
    }

    pub fn to_values(&self) -> RawGrid {
        let mut out = [[0i8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize];
        self.write_values(&mut out);
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerUpKind;

    fn pos(r: u8, c: u8) -> Position {
        Position::new(r, c).unwrap()
    }

    fn num(v: u8) -> Cell {
        Cell::from_raw(v as i8).unwrap()
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();
        board.set(pos(0, 0), num(4));
        board.set(pos(5, 3), num(7));

        assert_eq!(board.get(pos(0, 0)), num(4));
        assert_eq!(board.get(pos(5, 3)), num(7));
        assert_eq!(board.cells[0], num(4));
        assert_eq!(board.cells[5 * 6 + 3], num(7));
    }

    #[test]
    fn test_clear_range_row_returns_sum() {
        let mut board = Board::new();
        for (c, v) in [3u8, 4, 3].iter().enumerate() {
            board.set(pos(9, c as u8), num(*v));
        }
        board.set(pos(9, 4), num(8));

        assert_eq!(board.clear_range(Line::Row(9), 0, 2), 10);
        assert!(!board.is_occupied(pos(9, 0)));
        assert!(!board.is_occupied(pos(9, 2)));
        // Outside the range is untouched.
        assert_eq!(board.get(pos(9, 4)), num(8));
    }

    #[test]
    fn test_clear_range_column_and_clamping() {
        let mut board = Board::new();
        board.set(pos(7, 1), num(2));
        board.set(pos(9, 1), num(5));

        assert_eq!(board.clear_range(Line::Column(1), 7, 200), 7);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_range_skips_power_up_value() {
        let mut board = Board::new();
        board.set(pos(2, 0), num(6));
        board.set(pos(2, 1), Cell::PowerUp(PowerUpKind::ClearRow));
        assert_eq!(board.clear_line(Line::Row(2)), 6);
        assert!(board.is_empty());
    }

    #[test]
    fn test_inverted_range_is_noop() {
        let mut board = Board::new();
        board.set(pos(0, 3), num(1));
        assert_eq!(board.clear_range(Line::Row(0), 4, 2), 0);
        assert!(board.is_occupied(pos(0, 3)));
    }

    #[test]
    fn test_is_blocked() {
        let mut board = Board::new();
        assert!(board.is_blocked(None));
        assert!(!board.is_blocked(Some(pos(3, 3))));
        board.set(pos(3, 3), num(9));
        assert!(board.is_blocked(Some(pos(3, 3))));
    }

    #[test]
    fn test_randomize_numbers_only() {
        let mut board = Board::new();
        board.set(pos(0, 0), num(1));
        board.set(pos(0, 3), num(5));
        board.set(pos(1, 1), Cell::PowerUp(PowerUpKind::Multiplier));

        let rerolled = board.randomize_numbers(|| Digit::new(9).unwrap());
        assert_eq!(rerolled, 2);
        assert_eq!(board.get(pos(0, 0)), num(9));
        assert_eq!(board.get(pos(0, 3)), num(9));
        assert_eq!(board.get(pos(0, 1)), Cell::Empty);
        assert_eq!(board.get(pos(1, 1)), Cell::PowerUp(PowerUpKind::Multiplier));
    }

    #[test]
    fn test_values_roundtrip() {
        let mut grid: RawGrid = [[0; 6]; 10];
        grid[9] = [3, 4, 3, 0, 0, 0];
        grid[4][5] = -2;
        let board = Board::from_values(&grid).unwrap();
        assert_eq!(board.to_values(), grid);
        assert!(board.has_power_up());
        assert_eq!(board.occupied_count(), 4);

        grid[0][0] = 12;
        assert!(Board::from_values(&grid).is_none());
    }
}
