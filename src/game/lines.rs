//! Winning line scan for the 3x3 board

use super::board::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Find the mark occupying a full line, if any.
///
/// Scans every line for both marks, so a board that violates the
/// one-mark-per-turn invariant still yields a deterministic answer.
pub fn find_winner(cells: &[Cell; 9]) -> Option<Player> {
    for line in &WINNING_LINES {
        match cells[line[0]] {
            Cell::Empty => continue,
            first if line.iter().all(|&idx| cells[idx] == first) => {
                return first.to_player();
            }
            _ => {}
        }
    }
    None
}
