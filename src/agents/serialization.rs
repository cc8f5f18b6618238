//! Persistence for trained agent pairs
//!
//! Agents are serialized together as one versioned MessagePack blob. The
//! Q-table mapping, exploration rate, and rng seed survive a round trip
//! losslessly; episode-scoped state does not (a loaded agent starts fresh).

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::agents::q_learning::{AgentSnapshot, QLearningAgent};

/// Default filename for the trained pair
pub const DEFAULT_SAVE_FILE: &str = "qlearners.msgpack";

/// On-disk representation of a trained pair of agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgents {
    pub version: u32,
    player_x: AgentSnapshot,
    player_o: AgentSnapshot,
}

impl SavedAgents {
    pub const VERSION: u32 = 1;

    /// Snapshot a trained pair for saving
    pub fn from_pair(player_x: &QLearningAgent, player_o: &QLearningAgent) -> Self {
        Self {
            version: Self::VERSION,
            player_x: player_x.export_snapshot(),
            player_o: player_o.export_snapshot(),
        }
    }

    /// Reconstruct the (X, O) agent pair.
    ///
    /// # Errors
    ///
    /// Fails if the blob was written by an incompatible crate version.
    pub fn into_pair(self) -> Result<(QLearningAgent, QLearningAgent)> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "unsupported agent save format version: {} (expected {})",
                self.version,
                Self::VERSION
            ));
        }

        Ok((
            QLearningAgent::from_snapshot(self.player_x),
            QLearningAgent::from_snapshot(self.player_o),
        ))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agents")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{agents::Agent, game::{BoardState, Player}};

    fn trained_agent(seed: u64) -> QLearningAgent {
        let mut agent = QLearningAgent::new(0.0, 0.3, 0.9, 1.0).with_seed(seed);
        agent.start_episode();
        let board = BoardState::new();
        let pos = agent.choose_move(&board).expect("legal move");
        let next = board.place(pos, Player::X).expect("vacant cell");
        agent.receive_reward(1.0, &next);
        agent
    }

    #[test]
    fn test_roundtrip_preserves_tables() {
        let p1 = trained_agent(7);
        let p2 = trained_agent(11);

        let saved = SavedAgents::from_pair(&p1, &p2);
        let bytes = rmp_serde::to_vec(&saved).expect("serialize");
        let loaded: SavedAgents = rmp_serde::from_slice(&bytes).expect("deserialize");
        let (restored_x, restored_o) = loaded.into_pair().expect("supported version");

        assert_eq!(restored_x.q_table().len(), p1.q_table().len());
        assert_eq!(restored_o.q_table().len(), p2.q_table().len());
        for (key, value) in p1.q_table().entries() {
            assert_eq!(restored_x.q_table().stored(&key.0, key.1), Some(*value));
        }
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let p1 = trained_agent(1);
        let p2 = trained_agent(2);
        let mut saved = SavedAgents::from_pair(&p1, &p2);
        saved.version = 99;

        assert!(saved.into_pair().is_err());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let result = SavedAgents::load_from_file("/tmp/nonexistent_qttt_12345.msgpack");
        assert!(result.is_err());
    }
}
