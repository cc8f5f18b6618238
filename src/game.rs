//! Tic-Tac-Toe game rules: board representation and outcome evaluation

pub mod board;
pub mod lines;

pub use board::{BoardState, Cell, Outcome, Player};
pub use lines::{WINNING_LINES, find_winner};
