//! Interactive agent backed by console input
//!
//! Prompts for a cell number in the 1-9 convention and converts it to the
//! internal 0-indexed move. Malformed input is re-prompted locally and
//! never surfaces to the engine; the quit sentinel terminates the process.

use std::io::{self, Write};

use crate::{Result, agents::Agent, game::BoardState};

/// Sentinel character that exits the program
const QUIT_SENTINEL: &str = "-";

/// Parsed console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A valid cell, already converted to a 0-indexed position
    Cell(usize),
    /// The quit sentinel
    Quit,
    /// Anything else; the caller re-prompts
    Invalid,
}

/// Parse one line of console input against the 1-9 grammar.
pub fn parse_selection(input: &str) -> Selection {
    let trimmed = input.trim();
    if trimmed == QUIT_SENTINEL {
        return Selection::Quit;
    }
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=9).contains(&n) => Selection::Cell(n - 1),
        _ => Selection::Invalid,
    }
}

/// Agent that delegates move selection to a person at the console.
#[derive(Debug, Default)]
pub struct InteractiveAgent;

impl InteractiveAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for InteractiveAgent {
    fn start_episode(&mut self) {
        println!("============");
        println!("New Game");
        println!("============");
    }

    fn choose_move(&mut self, board: &BoardState) -> Result<usize> {
        loop {
            println!("{board}");
            print!("Your move? (1-9 or {QUIT_SENTINEL} to exit) ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().read_line(&mut line)?;

            match parse_selection(&line) {
                Selection::Cell(pos) => return Ok(pos),
                Selection::Quit => std::process::exit(0),
                Selection::Invalid => println!("Invalid move; try again."),
            }
        }
    }

    fn name(&self) -> &str {
        "Human"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_cells() {
        assert_eq!(parse_selection("1"), Selection::Cell(0));
        assert_eq!(parse_selection("9"), Selection::Cell(8));
        assert_eq!(parse_selection(" 5 \n"), Selection::Cell(4));
    }

    #[test]
    fn test_parse_quit_sentinel() {
        assert_eq!(parse_selection("-"), Selection::Quit);
        assert_eq!(parse_selection(" - \n"), Selection::Quit);
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_selection("0"), Selection::Invalid);
        assert_eq!(parse_selection("10"), Selection::Invalid);
        assert_eq!(parse_selection("abc"), Selection::Invalid);
        assert_eq!(parse_selection(""), Selection::Invalid);
        assert_eq!(parse_selection("-3"), Selection::Invalid);
    }
}
