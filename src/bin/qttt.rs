//! qttt CLI - train Q-learning agents by self-play and play against them

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qttt::{
    GameEngine, InteractiveAgent, QLearningAgent, SavedAgents, TrainingConfig, run_self_play,
    agents::DEFAULT_SAVE_FILE,
};

#[derive(Parser)]
#[command(name = "qttt")]
#[command(version, about = "Tabular Q-learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a pair of agents by self-play
    Train(TrainArgs),

    /// Play against a trained agent at the console
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct TrainArgs {
    /// Number of self-play episodes
    #[arg(long, short = 'g', default_value_t = 20_000)]
    games: usize,

    /// Initial exploration rate, decayed linearly toward zero
    #[arg(long, default_value_t = 0.4)]
    epsilon: f64,

    /// Learning rate (alpha)
    #[arg(long, default_value_t = 0.3)]
    alpha: f64,

    /// Discount factor (gamma)
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    /// Optimistic initial value for unseen state-action pairs
    #[arg(long, default_value_t = 1.0)]
    default_q: f64,

    /// Agents file; loaded if it exists, written after training
    #[arg(long, short = 'O', default_value = DEFAULT_SAVE_FILE)]
    agents: PathBuf,

    /// Ignore an existing agents file and start fresh
    #[arg(long)]
    fresh: bool,

    /// Optional path for a summary JSON file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    progress: bool,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Trained agents file
    #[arg(long, default_value = DEFAULT_SAVE_FILE)]
    agents: PathBuf,
}

fn load_or_create_pair(args: &TrainArgs) -> Result<(QLearningAgent, QLearningAgent)> {
    if !args.fresh && args.agents.exists() {
        println!("Resuming from {}", args.agents.display());
        return SavedAgents::load_from_file(&args.agents)?.into_pair();
    }

    let fresh = || QLearningAgent::new(args.epsilon, args.alpha, args.gamma, args.default_q);
    Ok((fresh(), fresh()))
}

fn train(args: TrainArgs) -> Result<()> {
    let (mut player_x, mut player_o) = load_or_create_pair(&args)?;

    let config = TrainingConfig {
        episodes: args.games,
        epsilon: args.epsilon,
        seed: args.seed,
        progress: args.progress,
    };

    println!("Training for {} episodes", config.episodes);
    let stats = run_self_play(&mut player_x, &mut player_o, &config)?;

    SavedAgents::from_pair(&player_x, &player_o).save_to_file(&args.agents)?;
    println!(
        "Saved agents to {} ({} + {} learned pairs)",
        args.agents.display(),
        player_x.q_table().len(),
        player_o.q_table().len()
    );

    if let Some(path) = &args.summary {
        stats
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("Wrote summary to {}", path.display());
    }

    println!(
        "X wins {} / O wins {} / draws {} ({:.1}%)",
        stats.x_wins,
        stats.o_wins,
        stats.draws,
        stats.draw_rate() * 100.0
    );

    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let (mut trained, _) = SavedAgents::load_from_file(&args.agents)
        .with_context(|| format!("No trained agents at {} (run `qttt train` first)", args.agents.display()))?
        .into_pair()?;

    // Pure exploitation against a person
    trained.set_epsilon(0.0);
    let mut human = InteractiveAgent::new();
    let mut engine = GameEngine::new().verbose(true);

    // Loop until the interactive agent's quit sentinel exits the process
    loop {
        engine.play_episode(&mut trained, &mut human)?;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => train(args),
        Commands::Play(args) => play(args),
    }
}
