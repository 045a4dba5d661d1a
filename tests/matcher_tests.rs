//! Matcher tests - checked against a straightforward reference scan over seeded random boards

use sumfall::core::matcher::{cascade, has_match, scan_and_clear};
use sumfall::core::{Board, RawGrid, SimpleRng};
use sumfall::types::{Line, Position};

/// First `(start, end)` along `values` whose positive cells sum to `target`,
/// starting only on positive cells and stopping each start on overshoot.
fn reference_first_run(values: &[i8], target: u32) -> Option<(usize, usize)> {
    for start in 0..values.len() {
        if values[start] <= 0 {
            continue;
        }
        let mut sum = 0u32;
        for (end, v) in values.iter().enumerate().skip(start) {
            if *v > 0 {
                sum += *v as u32;
            }
            if sum == target {
                return Some((start, end));
            }
            if sum > target {
                break;
            }
        }
    }
    None
}

fn random_grid(rng: &mut SimpleRng) -> RawGrid {
    let mut grid = [[0i8; 6]; 10];
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = match rng.next_range(10) {
                0..=4 => 0,
                5 => -(rng.next_inclusive(1, 4) as i8),
                _ => rng.next_inclusive(1, 9) as i8,
            };
        }
    }
    grid
}

fn line_values(board: &Board, line: Line) -> Vec<i8> {
    board.line_cells(line).map(|c| c.raw()).collect()
}

#[test]
fn test_scenario_three_four_three() {
    let mut grid = [[0i8; 6]; 10];
    grid[9] = [3, 4, 3, 0, 0, 0];
    let mut board = Board::from_values(&grid).unwrap();

    let result = scan_and_clear(&mut board, 10);

    assert_eq!(result.cleared_lines, 1);
    assert_eq!(board.to_values()[9], [0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_first_row_match_agrees_with_reference() {
    let mut rng = SimpleRng::new(2024);
    for _ in 0..300 {
        let grid = random_grid(&mut rng);
        let target = rng.next_inclusive(8, 20);
        let mut board = Board::from_values(&grid).unwrap();

        let expected = reference_first_run(&grid[0], target);
        let result = scan_and_clear(&mut board, target);

        let first_row0 = result.runs.iter().find(|r| r.line == Line::Row(0));
        match expected {
            Some((start, end)) => {
                let run = first_row0.expect("row 0 should have cleared a run");
                assert_eq!((run.start as usize, run.end as usize), (start, end));
                assert_eq!(run.sum, target);
            }
            None => assert!(first_row0.is_none()),
        }
    }
}

#[test]
fn test_every_cleared_run_sums_to_target() {
    let mut rng = SimpleRng::new(77);
    for _ in 0..300 {
        let grid = random_grid(&mut rng);
        let target = rng.next_inclusive(8, 20);
        let mut board = Board::from_values(&grid).unwrap();
        let before = board.clone();

        let result = scan_and_clear(&mut board, target);
        assert_eq!(result.cleared_lines as usize, result.runs.len());

        for run in &result.runs {
            assert_eq!(run.sum, target);
            assert!(run.start <= run.end);
            let start = run.line.position(run.start).unwrap();
            let end = run.line.position(run.end).unwrap();
            // Runs start and end on numbers of the board as it was before the scan
            // (or as earlier clears in the same pass left it).
            assert!(before.get(start).number_value() > 0);
            assert!(before.get(end).number_value() > 0);
            assert!(!board.is_occupied(start));
            assert!(!board.is_occupied(end));
        }
    }
}

#[test]
fn test_cascade_leaves_stable_board() {
    let mut rng = SimpleRng::new(5);
    for _ in 0..200 {
        let grid = random_grid(&mut rng);
        let target = rng.next_inclusive(8, 20);
        let mut board = Board::from_values(&grid).unwrap();

        let passes = cascade(&mut board, target);
        assert!(passes.iter().all(|n| *n > 0));
        assert!(!has_match(&board, target));

        // A stable board stays put.
        let stable = board.clone();
        assert_eq!(scan_and_clear(&mut board, target).cleared_lines, 0);
        assert_eq!(board, stable);
    }
}

#[test]
fn test_clearing_a_row_can_enable_a_column() {
    // Column 0 reads 4, 3, 6 and has no run summing to 10. Once row 8 clears
    // its 3+7, the column's 4 and 6 meet across the gap in the same pass.
    let mut grid = [[0i8; 6]; 10];
    grid[7][0] = 4;
    grid[8] = [3, 7, 0, 0, 0, 0];
    grid[9][0] = 6;
    let mut board = Board::from_values(&grid).unwrap();
    assert!(reference_first_run(&line_values(&board, Line::Column(0)), 10).is_none());

    let result = scan_and_clear(&mut board, 10);
    assert_eq!(result.cleared_lines, 2);
    assert_eq!(result.runs[0].line, Line::Row(8));
    assert_eq!(result.runs[1].line, Line::Column(0));
    assert_eq!((result.runs[1].start, result.runs[1].end), (7, 9));
    assert!(board.is_empty());
}

#[test]
fn test_column_scan_reads_top_to_bottom() {
    let mut grid = [[0i8; 6]; 10];
    grid[0][1] = 9;
    grid[5][1] = 1;
    grid[9][1] = 9;
    let mut board = Board::from_values(&grid).unwrap();

    scan_and_clear(&mut board, 10);
    assert_eq!(line_values(&board, Line::Column(1))[9], 9);
    assert!(!board.is_occupied(Position::new(0, 1).unwrap()));
}
