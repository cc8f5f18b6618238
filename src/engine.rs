//! Game engine: turn alternation, move application, reward dispatch
//!
//! The engine owns the board and the turn marker for the duration of one
//! episode. Agents only ever see board snapshots and scalar rewards; they
//! never mutate the board themselves.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    agents::Agent,
    error::Result,
    game::{BoardState, Outcome, Player},
};

/// Reward dispatched to an agent that selects an occupied cell
pub const ILLEGAL_MOVE_PENALTY: f64 = -99.0;

/// Reward for winning an episode
const WIN_REWARD: f64 = 1.0;
/// Reward for losing an episode
const LOSS_REWARD: f64 = -1.0;
/// Reward for a drawn episode, delivered to both agents
const DRAW_REWARD: f64 = 0.5;

/// Terminal result of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// The given mark completed a line
    Win(Player),
    /// Full board, no line
    Draw,
    /// The given mark selected an occupied cell; the episode ends with a
    /// penalty to the offender and no reward to the other agent
    Illegal(Player),
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Orchestrates episodes between two agents.
///
/// The engine is reusable across episodes: the board is created empty at
/// the start of each episode and discarded once final rewards have been
/// dispatched. Player X is always the first argument, player O the second;
/// a coin flip decides which mark opens.
#[derive(Debug)]
pub struct GameEngine {
    rng: StdRng,
    verbose: bool,
}

impl GameEngine {
    /// Create an engine with an entropy-seeded coin
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
            verbose: false,
        }
    }

    /// Create an engine with a deterministic coin for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: build_rng(Some(seed)),
            verbose: false,
        }
    }

    /// Enable or disable printing of boards and outcome headlines.
    /// Verbosity has no effect on control flow or rewards.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Play one episode, choosing the opening mark by a fair coin flip.
    pub fn play_episode(
        &mut self,
        player_x: &mut dyn Agent,
        player_o: &mut dyn Agent,
    ) -> Result<EpisodeOutcome> {
        let first = if self.rng.random::<bool>() {
            Player::X
        } else {
            Player::O
        };
        self.play_from(player_x, player_o, first)
    }

    /// Play one episode with a fixed opening mark.
    pub fn play_from<'a>(
        &mut self,
        player_x: &'a mut dyn Agent,
        player_o: &'a mut dyn Agent,
        first: Player,
    ) -> Result<EpisodeOutcome> {
        player_x.start_episode();
        player_o.start_episode();

        let mut board = BoardState::new();
        let mut active = first;

        loop {
            let (mover, other) = if active == Player::X {
                (&mut *player_x, &mut *player_o)
            } else {
                (&mut *player_o, &mut *player_x)
            };

            let pos = mover.choose_move(&board)?;

            board = match board.place(pos, active) {
                Ok(next) => next,
                Err(crate::Error::IllegalMove { position }) => {
                    // Penalize the offender only; the other agent receives
                    // nothing and the episode ends.
                    mover.receive_reward(ILLEGAL_MOVE_PENALTY, &board);
                    println!("Illegal move at position {position} by {}", mover.name());
                    return Ok(EpisodeOutcome::Illegal(active));
                }
                Err(e) => return Err(e),
            };

            match board.evaluate() {
                Outcome::Win(winner) => {
                    if self.verbose {
                        println!("{board}");
                        println!("{} ({winner}) won!", mover.name());
                    }
                    mover.receive_reward(WIN_REWARD, &board);
                    other.receive_reward(LOSS_REWARD, &board);
                    return Ok(EpisodeOutcome::Win(winner));
                }
                Outcome::Draw => {
                    if self.verbose {
                        println!("{board}");
                        println!("Tie!");
                    }
                    mover.receive_reward(DRAW_REWARD, &board);
                    other.receive_reward(DRAW_REWARD, &board);
                    return Ok(EpisodeOutcome::Draw);
                }
                Outcome::Ongoing => {
                    mover.receive_reward(0.0, &board);
                    active = active.opponent();
                }
            }
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Agent that plays a fixed move script and records every reward
    struct ScriptedAgent {
        moves: Vec<usize>,
        cursor: usize,
        rewards: Vec<(f64, BoardState)>,
        episodes_started: usize,
    }

    impl ScriptedAgent {
        fn new(moves: &[usize]) -> Self {
            Self {
                moves: moves.to_vec(),
                cursor: 0,
                rewards: Vec::new(),
                episodes_started: 0,
            }
        }
    }

    impl Agent for ScriptedAgent {
        fn start_episode(&mut self) {
            self.episodes_started += 1;
        }

        fn choose_move(&mut self, _board: &BoardState) -> Result<usize> {
            let pos = self.moves[self.cursor];
            self.cursor += 1;
            Ok(pos)
        }

        fn receive_reward(&mut self, value: f64, board: &BoardState) {
            self.rewards.push((value, *board));
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    #[test]
    fn test_win_rewards_winner_and_loser() {
        // X: 0, 1, 2 (top row); O: 3, 4
        let mut x = ScriptedAgent::new(&[0, 1, 2]);
        let mut o = ScriptedAgent::new(&[3, 4]);
        let mut engine = GameEngine::with_seed(0);

        let outcome = engine.play_from(&mut x, &mut o, Player::X).unwrap();

        assert_eq!(outcome, EpisodeOutcome::Win(Player::X));
        assert_eq!(x.episodes_started, 1);
        assert_eq!(o.episodes_started, 1);

        // X: two ongoing zeros, then the win reward
        let x_values: Vec<f64> = x.rewards.iter().map(|(v, _)| *v).collect();
        assert_eq!(x_values, vec![0.0, 0.0, 1.0]);

        // O: two ongoing zeros, then the loss reward
        let o_values: Vec<f64> = o.rewards.iter().map(|(v, _)| *v).collect();
        assert_eq!(o_values, vec![0.0, 0.0, -1.0]);

        // Final board delivered to both
        let final_board = x.rewards.last().unwrap().1;
        assert_eq!(final_board, o.rewards.last().unwrap().1);
        assert_eq!(final_board.evaluate(), Outcome::Win(Player::X));
    }

    #[test]
    fn test_draw_rewards_both_agents() {
        // Classic draw line-up
        let mut x = ScriptedAgent::new(&[0, 2, 3, 5, 7]);
        let mut o = ScriptedAgent::new(&[1, 4, 6, 8]);
        let mut engine = GameEngine::with_seed(0);

        let outcome = engine.play_from(&mut x, &mut o, Player::X).unwrap();

        assert_eq!(outcome, EpisodeOutcome::Draw);
        assert_eq!(x.rewards.last().unwrap().0, 0.5);
        assert_eq!(o.rewards.last().unwrap().0, 0.5);
    }

    #[test]
    fn test_illegal_move_penalizes_offender_only() {
        // O repeats X's first cell
        let mut x = ScriptedAgent::new(&[0]);
        let mut o = ScriptedAgent::new(&[0]);
        let mut engine = GameEngine::with_seed(0);

        let outcome = engine.play_from(&mut x, &mut o, Player::X).unwrap();

        assert_eq!(outcome, EpisodeOutcome::Illegal(Player::O));
        assert_eq!(o.rewards.len(), 1);
        assert_eq!(o.rewards[0].0, ILLEGAL_MOVE_PENALTY);
        // The offender sees the board as it stood before the attempt
        assert_eq!(o.rewards[0].1.empty_positions().len(), 8);
        // X got its ongoing zero but nothing for the termination
        let x_values: Vec<f64> = x.rewards.iter().map(|(v, _)| *v).collect();
        assert_eq!(x_values, vec![0.0]);
    }

    #[test]
    fn test_ongoing_reward_goes_to_mover_with_resulting_board() {
        let mut x = ScriptedAgent::new(&[4, 0, 8]);
        let mut o = ScriptedAgent::new(&[1, 2]);
        let mut engine = GameEngine::with_seed(0);

        engine.play_from(&mut x, &mut o, Player::X).unwrap();

        // X's first reward arrives right after its own move, with the
        // board reflecting that move and nothing else.
        let (value, board) = &x.rewards[0];
        assert_eq!(*value, 0.0);
        assert_eq!(board.get(4), crate::game::Cell::X);
        assert_eq!(board.empty_positions().len(), 8);
    }

    #[test]
    fn test_o_can_open_the_game() {
        let mut x = ScriptedAgent::new(&[3, 4]);
        let mut o = ScriptedAgent::new(&[0, 1, 2]);
        let mut engine = GameEngine::with_seed(0);

        let outcome = engine.play_from(&mut x, &mut o, Player::O).unwrap();
        assert_eq!(outcome, EpisodeOutcome::Win(Player::O));
    }

    #[test]
    fn test_no_cell_is_ever_overwritten() {
        // Legal full game: every mark lands on a previously empty cell,
        // and the final counts add up.
        let mut x = ScriptedAgent::new(&[0, 2, 3, 5, 7]);
        let mut o = ScriptedAgent::new(&[1, 4, 6, 8]);
        let mut engine = GameEngine::with_seed(0);

        engine.play_from(&mut x, &mut o, Player::X).unwrap();

        let final_board = x.rewards.last().unwrap().1;
        let x_count = final_board
            .cells
            .iter()
            .filter(|&&c| c == crate::game::Cell::X)
            .count();
        let o_count = final_board
            .cells
            .iter()
            .filter(|&&c| c == crate::game::Cell::O)
            .count();
        assert_eq!((x_count, o_count), (5, 4));
    }
}
