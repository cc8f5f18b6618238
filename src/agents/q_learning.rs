//! Q-learning agent
//!
//! Tabular TD(0) control with an epsilon-greedy policy. The agent owns its
//! Q-table exclusively; learned values persist across episodes while the
//! previous board and move are episode-scoped.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    agents::{Agent, q_table::QTable},
    error::{Error, Result},
    game::BoardState,
};

/// Serializable snapshot of an agent, used by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentSnapshot {
    pub q_table: QTable,
    pub epsilon: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent with epsilon-greedy action selection.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
    prev_board: BoardState,
    prev_move: Option<usize>,
}

impl QLearningAgent {
    /// Create a new agent.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Exploration rate in [0, 1]
    /// * `alpha` - Learning rate in (0, 1]
    /// * `gamma` - Discount factor in [0, 1]
    /// * `default_q` - Optimistic initial value for unseen pairs (> 0)
    ///
    /// Out-of-range values are a caller error; the knobs are not validated
    /// here.
    pub fn new(epsilon: f64, alpha: f64, gamma: f64, default_q: f64) -> Self {
        Self {
            q_table: QTable::new(alpha, gamma, default_q),
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
            prev_board: BoardState::new(),
            prev_move: None,
        }
    }

    /// Seed the agent's random number generator for reproducible play
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Reseed in place; used by the training driver
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the exploration rate; the training driver anneals this across
    /// episodes
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Read access to the learned table
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub(crate) fn export_snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_snapshot(snapshot: AgentSnapshot) -> Self {
        Self {
            q_table: snapshot.q_table,
            epsilon: snapshot.epsilon,
            rng: build_rng(snapshot.rng_seed),
            rng_seed: snapshot.rng_seed,
            prev_board: BoardState::new(),
            prev_move: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }
}

impl Agent for QLearningAgent {
    fn start_episode(&mut self) {
        self.prev_board = BoardState::new();
        self.prev_move = None;
    }

    fn choose_move(&mut self, board: &BoardState) -> Result<usize> {
        self.prev_board = *board;

        let actions = board.empty_positions();
        if actions.is_empty() {
            return Err(Error::NoLegalMoves);
        }

        // Explore: uniformly random legal action, no table lookups
        if self.rng.random::<f64>() < self.epsilon {
            let pick = actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalMoves)?;
            self.prev_move = Some(pick);
            return Ok(pick);
        }

        // Exploit: evaluate every legal action, materializing defaults
        let values: Vec<f64> = actions
            .iter()
            .map(|&a| self.q_table.value(&self.prev_board.cells, a))
            .collect();
        let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Ties are broken uniformly at random; a deterministic first-index
        // argmax would bias the learned policy.
        let best: Vec<usize> = actions
            .iter()
            .zip(&values)
            .filter(|&(_, &v)| v == max_value)
            .map(|(&a, _)| a)
            .collect();
        let pick = best
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalMoves)?;

        self.prev_move = Some(pick);
        Ok(pick)
    }

    fn receive_reward(&mut self, value: f64, board: &BoardState) {
        // Rewards delivered before the first move of an episode carry no
        // state-action pair to credit and are ignored.
        let Some(action) = self.prev_move else {
            return;
        };

        // Lookahead evaluates the resulting board over the previous
        // board's legal actions, reproducing the source learning rule.
        // Standard Q-learning would use the resulting board's own legal
        // set; see DESIGN.md.
        let lookahead_actions = self.prev_board.empty_positions();
        self.q_table.update(
            &self.prev_board.cells,
            action,
            value,
            &board.cells,
            &lookahead_actions,
        );
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
