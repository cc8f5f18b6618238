//! Tabular Q-learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A complete Tic-Tac-Toe board with legality and terminal-state detection
//! - A game engine that alternates two agents and dispatches rewards
//! - A Q-learning agent with an epsilon-greedy policy and TD(0) updates
//! - A self-play training driver and MessagePack persistence for agent pairs

pub mod agents;
pub mod engine;
pub mod error;
pub mod game;
pub mod training;

pub use agents::{Agent, InteractiveAgent, QLearningAgent, QTable, SavedAgents};
pub use engine::{EpisodeOutcome, GameEngine, ILLEGAL_MOVE_PENALTY};
pub use error::{Error, Result};
pub use game::{BoardState, Cell, Outcome, Player};
pub use training::{TrainingConfig, TrainingStats, run_self_play};
