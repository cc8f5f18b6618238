//! Board state representation and outcome evaluation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::find_winner;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player's mark in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Player::X => "X",
            Player::O => "O",
        })
    }
}

/// Outcome of evaluating a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Win(Player),
    Draw,
}

/// The nine cells of the board in row-major order.
///
/// The board carries no turn marker: the engine owns turn alternation, and
/// learned values are keyed on the cells alone. Two boards compare equal
/// iff all nine cells match. `Copy` since the state is nine bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
}

impl BoardState {
    /// Create a new empty board
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
        }
    }

    /// Create a board from a string representation.
    ///
    /// The string must contain 9 cell characters (`.`/space for empty,
    /// `X`, `O`); whitespace between them is filtered out.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 characters remain after filtering or
    /// any character is not a valid cell representation.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(BoardState { cells })
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is on the board and empty
    pub fn is_vacant(&self, pos: usize) -> bool {
        pos < 9 && self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Write `mark` into an empty cell, returning the new board state.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::IllegalMove`] if the position is out of
    /// range or already occupied. The receiver is never modified.
    #[must_use = "place returns a new board state; the original is unchanged"]
    pub fn place(&self, pos: usize, mark: Player) -> Result<BoardState, crate::Error> {
        if !self.is_vacant(pos) {
            return Err(crate::Error::IllegalMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = mark.to_cell();
        Ok(new_state)
    }

    /// Evaluate the position: a win for either mark, a draw on a full
    /// board, or an ongoing game.
    pub fn evaluate(&self) -> Outcome {
        if let Some(winner) = find_winner(&self.cells) {
            Outcome::Win(winner)
        } else if self.cells.contains(&Cell::Empty) {
            Outcome::Ongoing
        } else {
            Outcome::Draw
        }
    }

    /// String representation used in diagnostics and summaries
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f)?;
            }
            let cells = &self.cells[row * 3..row * 3 + 3];
            write!(
                f,
                "{}|{}|{}",
                cells[0].to_char(),
                cells[1].to_char(),
                cells[2].to_char()
            )?;
        }
        Ok(())
    }
}
