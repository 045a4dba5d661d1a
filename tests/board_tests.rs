//! Board tests - storage, range clearing and raw encoding

use sumfall::core::Board;
use sumfall::types::{Cell, Digit, Line, Position, PowerUpKind, BOARD_COLUMNS, BOARD_ROWS};

fn pos(row: u8, column: u8) -> Position {
    Position::new(row, column).unwrap()
}

fn num(v: u8) -> Cell {
    Cell::Number(Digit::new(v).unwrap())
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.rows(), BOARD_ROWS);
    assert_eq!(board.columns(), BOARD_COLUMNS);

    for p in Position::all() {
        assert_eq!(board.get(p), Cell::Empty, "cell {} should be empty", p);
    }
    assert!(board.is_empty());
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_out_of_range_positions_are_unrepresentable() {
    assert!(Position::new(BOARD_ROWS, 0).is_none());
    assert!(Position::new(0, BOARD_COLUMNS).is_none());
    assert!(Position::new(u8::MAX, u8::MAX).is_none());
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    board.set(pos(5, 3), num(7));
    assert_eq!(board.get(pos(5, 3)), num(7));
    assert!(board.is_occupied(pos(5, 3)));

    board.set(pos(0, 0), Cell::PowerUp(PowerUpKind::Randomizer));
    assert_eq!(board.get(pos(0, 0)).raw(), -2);

    assert_eq!(board.clear(pos(5, 3)), num(7));
    assert!(!board.is_occupied(pos(5, 3)));
}

#[test]
fn test_clear_range_returns_sum_of_cleared() {
    let mut board = Board::new();
    for (c, v) in [1u8, 2, 3, 4, 5, 6].iter().enumerate() {
        board.set(pos(4, c as u8), num(*v));
    }

    assert_eq!(board.clear_range(Line::Row(4), 1, 3), 9);
    let cells: Vec<i8> = board.line_cells(Line::Row(4)).map(Cell::raw).collect();
    assert_eq!(cells, vec![1, 0, 0, 0, 5, 6]);
}

#[test]
fn test_clear_line_column() {
    let mut board = Board::new();
    for row in 0..BOARD_ROWS {
        board.set(pos(row, 5), num(1));
    }
    board.set(pos(3, 4), num(2));

    assert_eq!(board.clear_line(Line::Column(5)), u32::from(BOARD_ROWS));
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_randomize_numbers_keeps_layout() {
    let mut grid = [[0i8; 6]; 10];
    grid[9] = [1, 0, 0, 5, 0, 9];
    grid[8][3] = 2;
    let mut board = Board::from_values(&grid).unwrap();

    let mut next = 0u8;
    let changed = board.randomize_numbers(|| {
        next = next % 9 + 1;
        Digit::new(next).unwrap()
    });

    assert_eq!(changed, 4);
    let after = board.to_values();
    for r in 0..10 {
        for c in 0..6 {
            assert_eq!(after[r][c] == 0, grid[r][c] == 0, "occupancy changed at ({r}, {c})");
        }
    }
}

#[test]
fn test_from_values_rejects_bad_encoding() {
    let mut grid = [[0i8; 6]; 10];
    grid[2][2] = -5;
    assert!(Board::from_values(&grid).is_none());
    grid[2][2] = 10;
    assert!(Board::from_values(&grid).is_none());
    grid[2][2] = -4;
    assert!(Board::from_values(&grid).is_some());
}
