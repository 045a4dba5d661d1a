//! Matcher module - contiguous-sum line clearing
//!
//! A pass visits every row top to bottom, then every column left to right.
//! Along each line, every start index holding a number begins a candidate run;
//! the run walks forward adding numbers only (empty and power-up cells are
//! passed over without contributing). The run is abandoned as soon as the sum
//! overshoots the target and cleared as soon as it hits the target exactly, so
//! the earliest qualifying end index always wins.
//!
//! After a clear the same line is rescanned from index 0, since the clear can
//! only have changed that line's candidates. Clearing can open new runs on
//! other lines, which is why callers keep running passes until one clears
//! nothing (see [`cascade`]).

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Line, BOARD_COLUMNS, BOARD_ROWS};

/// Upper bound on runs cleared in one pass.
///
/// Every cleared run removes at least one number, so a pass can never clear
/// more runs than the board has cells.
pub const MAX_RUNS_PER_PASS: usize = (BOARD_ROWS as usize) * (BOARD_COLUMNS as usize);

/// Upper bound on passes in one cascade (each productive pass removes at least one cell)
pub const MAX_CASCADE_PASSES: usize = MAX_RUNS_PER_PASS + 1;

/// One cleared range along a line (inclusive indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRun {
    pub line: Line,
    pub start: u8,
    pub end: u8,
    pub sum: u32,
}

/// Outcome of a single pass over the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub cleared_lines: u32,
    pub runs: ArrayVec<ClearedRun, MAX_RUNS_PER_PASS>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.cleared_lines == 0
    }
}

/// Find the first run along `line` summing exactly to `target`.
///
/// Returns `(start, end, sum)` of the earliest start index that matches, using
/// the earliest end index for that start.
pub fn find_run(board: &Board, line: Line, target: u32) -> Option<(u8, u8, u32)> {
    if target == 0 {
        return None;
    }

    let len = line.len();
    for start in 0..len {
        let first = line.position(start).map(|p| board.get(p).number_value())?;
        if first == 0 {
            continue;
        }

        let mut sum = 0;
        for end in start..len {
            let pos = line.position(end)?;
            sum += board.get(pos).number_value();
            if sum == target {
                return Some((start, end, sum));
            }
            if sum > target {
                break;
            }
        }
    }
    None
}

/// Run one scan pass, clearing every qualifying run.
pub fn scan_and_clear(board: &mut Board, target: u32) -> ScanResult {
    let mut result = ScanResult::default();

    for line in Line::all() {
        while let Some((start, end, sum)) = find_run(board, line, target) {
            board.clear_range(line, start, end);
            result.cleared_lines += 1;
            // Capacity can't be exceeded (see MAX_RUNS_PER_PASS), but never panic over it.
            let _ = result.runs.try_push(ClearedRun {
                line,
                start,
                end,
                sum,
            });
        }
    }

    if !result.is_empty() {
        log::debug!(
            "scan cleared {} run(s) at target {}",
            result.cleared_lines,
            target
        );
    }
    result
}

/// Run passes until one clears nothing.
///
/// Returns the cleared-line count of every productive pass, in order. The
/// final empty pass is not included, so an empty result means the board was
/// already stable.
pub fn cascade(board: &mut Board, target: u32) -> ArrayVec<u32, MAX_CASCADE_PASSES> {
    let mut passes = ArrayVec::new();
    loop {
        let pass = scan_and_clear(board, target);
        if pass.is_empty() || passes.try_push(pass.cleared_lines).is_err() {
            break;
        }
    }
    passes
}

/// Whether a pass at `target` would clear anything
pub fn has_match(board: &Board, target: u32) -> bool {
    Line::all().any(|line| find_run(board, line, target).is_some())
}
