//! Agents that can play the game
//!
//! An agent is anything the engine can ask for a move: the Q-learning
//! agent, or an interactive wrapper around console input. Variants are
//! concrete tagged types behind this trait, used via `&mut dyn Agent`.

pub mod interactive;
pub mod q_learning;
pub mod q_table;
pub mod serialization;

pub use interactive::InteractiveAgent;
pub use q_learning::QLearningAgent;
pub use q_table::QTable;
pub use serialization::{DEFAULT_SAVE_FILE, SavedAgents};

use crate::{Result, game::BoardState};

/// Capability set of a player in one episode.
pub trait Agent: Send {
    /// Reset episode-scoped memory at the start of a new game.
    fn start_episode(&mut self);

    /// Select a move (0-8) for the given board state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalMoves`] if the board has no empty
    /// cell. The engine detects terminal states before asking for a move,
    /// so this indicates an engine invariant violation and is fatal.
    fn choose_move(&mut self, board: &BoardState) -> Result<usize>;

    /// Deliver a scalar reward together with the board that resulted from
    /// the rewarded turn.
    ///
    /// The default implementation does nothing, suitable for agents that
    /// do not learn (e.g. the interactive agent).
    fn receive_reward(&mut self, _value: f64, _board: &BoardState) {}

    /// Get the agent's name, used in game headlines and logging.
    fn name(&self) -> &str;
}
