//! Q-table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::Cell;

/// Lookup key for learned values: the nine cells of a board, verbatim.
pub type StateKey = [Cell; 9];

/// Q-table mapping (state, action) pairs to value estimates.
///
/// Entries are created lazily with an optimistic default and never
/// removed. The table is exclusively owned by one agent; it is never
/// shared or mutated concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: (board snapshot, action position) -> estimate
    q_values: HashMap<(StateKey, usize), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs; strictly positive
    /// to bias early exploration toward optimism
    default_q: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, default_q: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            default_q,
        }
    }

    /// Get the estimate for a state-action pair, inserting the default
    /// value on first lookup.
    pub fn value(&mut self, state: &StateKey, action: usize) -> f64 {
        *self
            .q_values
            .entry((*state, action))
            .or_insert(self.default_q)
    }

    /// Get the stored estimate for a state-action pair without inserting.
    pub fn stored(&self, state: &StateKey, action: usize) -> Option<f64> {
        self.q_values.get(&(*state, action)).copied()
    }

    /// Store an estimate for a state-action pair.
    ///
    /// Exists so a table exported via [`entries`](Self::entries) can be
    /// reconstructed losslessly.
    pub fn set(&mut self, state: StateKey, action: usize, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum estimate over the given actions in a state.
    ///
    /// Like [`value`](Self::value), unseen pairs are materialized with the
    /// default estimate.
    pub fn max_value(&mut self, state: &StateKey, actions: &[usize]) -> f64 {
        actions
            .iter()
            .map(|&action| self.value(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// TD(0) update toward the observed reward plus discounted lookahead.
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The lookahead action set is supplied by the caller; the agent
    /// decides which board's legal moves feed the max.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        lookahead_state: &StateKey,
        lookahead_actions: &[usize],
    ) {
        let current_q = self.value(state, action);
        let max_next_q = if lookahead_actions.is_empty() {
            0.0
        } else {
            self.max_value(lookahead_state, lookahead_actions)
        };
        let td_target = reward + self.discount_factor * max_next_q;
        let new_q = current_q + self.learning_rate * (td_target - current_q);
        self.q_values.insert((*state, action), new_q);
    }

    /// Learning rate α
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Default value handed out for unseen pairs
    pub fn default_q(&self) -> f64 {
        self.default_q
    }

    /// Number of state-action pairs stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    /// Whether the table holds no entries yet
    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Iterate over all stored (state, action) -> value entries
    pub fn entries(&self) -> impl Iterator<Item = (&(StateKey, usize), &f64)> {
        self.q_values.iter()
    }
}
