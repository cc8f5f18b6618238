//! Self-play training driver
//!
//! Repeats engine episodes between two Q-learning agents, annealing the
//! exploration rate linearly toward zero across the run.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agents::QLearningAgent,
    engine::{EpisodeOutcome, GameEngine},
    game::Player,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Initial exploration rate; decayed linearly toward zero over the run
    pub epsilon: f64,

    /// Random seed for reproducibility (engine coin and both agents)
    pub seed: Option<u64>,

    /// Whether to show a progress bar
    pub progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 20_000,
            epsilon: 0.4,
            seed: None,
            progress: true,
        }
    }
}

/// Tally of a self-play run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Episodes played
    pub episodes: usize,

    /// Wins by the X agent
    pub x_wins: usize,

    /// Wins by the O agent
    pub o_wins: usize,

    /// Drawn episodes
    pub draws: usize,

    /// Episodes ended by an illegal move
    pub illegal: usize,
}

impl TrainingStats {
    fn new() -> Self {
        Self {
            episodes: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            illegal: 0,
        }
    }

    fn record(&mut self, outcome: EpisodeOutcome) {
        self.episodes += 1;
        match outcome {
            EpisodeOutcome::Win(Player::X) => self.x_wins += 1,
            EpisodeOutcome::Win(Player::O) => self.o_wins += 1,
            EpisodeOutcome::Draw => self.draws += 1,
            EpisodeOutcome::Illegal(_) => self.illegal += 1,
        }
    }

    /// Fraction of drawn episodes
    pub fn draw_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.draws as f64 / self.episodes as f64
        }
    }

    /// Save stats to a JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load stats from a JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let stats = serde_json::from_reader(file)?;
        Ok(stats)
    }
}

fn training_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("=>-"),
    );
    pb
}

/// Run self-play training between two Q-learning agents.
///
/// The exploration rate of both agents is set to
/// `epsilon * (1 - i / episodes)` at episode `i` and ends near zero; the
/// agents keep their final (annealed) epsilon afterwards.
pub fn run_self_play(
    player_x: &mut QLearningAgent,
    player_o: &mut QLearningAgent,
    config: &TrainingConfig,
) -> Result<TrainingStats> {
    let mut engine = match config.seed {
        Some(seed) => {
            player_x.set_rng_seed(seed.wrapping_add(1));
            player_o.set_rng_seed(seed.wrapping_add(2));
            GameEngine::with_seed(seed)
        }
        None => GameEngine::new(),
    };

    let bar = if config.progress {
        Some(training_progress_bar(config.episodes as u64))
    } else {
        None
    };

    let mut stats = TrainingStats::new();

    for episode in 0..config.episodes {
        let fraction_done = episode as f64 / config.episodes as f64;
        let epsilon = config.epsilon * (1.0 - fraction_done);
        player_x.set_epsilon(epsilon);
        player_o.set_epsilon(epsilon);

        let outcome = engine.play_episode(player_x, player_o)?;
        stats.record(outcome);

        if let Some(bar) = &bar {
            bar.inc(1);
            bar.set_message(format!(
                "X {} / O {} / D {}",
                stats.x_wins, stats.o_wins, stats.draws
            ));
        }
    }

    if let Some(bar) = &bar {
        bar.finish_with_message(format!(
            "X {} / O {} / D {} / draw rate {:.1}%",
            stats.x_wins,
            stats.o_wins,
            stats.draws,
            stats.draw_rate() * 100.0
        ));
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record() {
        let mut stats = TrainingStats::new();
        stats.record(EpisodeOutcome::Win(Player::X));
        stats.record(EpisodeOutcome::Win(Player::O));
        stats.record(EpisodeOutcome::Draw);
        stats.record(EpisodeOutcome::Draw);
        stats.record(EpisodeOutcome::Illegal(Player::X));

        assert_eq!(stats.episodes, 5);
        assert_eq!(stats.x_wins, 1);
        assert_eq!(stats.o_wins, 1);
        assert_eq!(stats.draws, 2);
        assert_eq!(stats.illegal, 1);
        assert!((stats.draw_rate() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_epsilon_decays_across_run() {
        let mut p1 = QLearningAgent::new(0.4, 0.3, 0.9, 1.0);
        let mut p2 = QLearningAgent::new(0.4, 0.3, 0.9, 1.0);
        let config = TrainingConfig {
            episodes: 100,
            epsilon: 0.4,
            seed: Some(42),
            progress: false,
        };

        run_self_play(&mut p1, &mut p2, &config).unwrap();

        // Last episode ran at epsilon * 1/100
        assert!(p1.epsilon() < 0.01);
        assert_eq!(p1.epsilon(), p2.epsilon());
    }
}
