//! Round-trip persistence of trained agent pairs

use qttt::{
    GameEngine, QLearningAgent, SavedAgents, TrainingConfig, run_self_play,
};
use tempfile::TempDir;

fn trained_pair() -> (QLearningAgent, QLearningAgent) {
    let mut x = QLearningAgent::new(0.4, 0.3, 0.9, 1.0);
    let mut o = QLearningAgent::new(0.4, 0.3, 0.9, 1.0);
    let config = TrainingConfig {
        episodes: 100,
        epsilon: 0.4,
        seed: Some(7),
        progress: false,
    };
    run_self_play(&mut x, &mut o, &config).expect("training run completes");
    (x, o)
}

#[test]
fn test_file_roundtrip_is_lossless() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("qlearners.msgpack");

    let (x, o) = trained_pair();
    assert!(!x.q_table().is_empty());

    SavedAgents::from_pair(&x, &o)
        .save_to_file(&path)
        .expect("Failed to save");
    let (loaded_x, loaded_o) = SavedAgents::load_from_file(&path)
        .expect("Failed to load")
        .into_pair()
        .expect("supported version");

    assert_eq!(loaded_x.q_table().len(), x.q_table().len());
    assert_eq!(loaded_o.q_table().len(), o.q_table().len());
    for (&(state, action), &value) in x.q_table().entries() {
        assert_eq!(loaded_x.q_table().stored(&state, action), Some(value));
    }

    // Epsilon survives (annealed close to zero by the run)
    assert_eq!(loaded_x.epsilon(), x.epsilon());
}

#[test]
fn test_loaded_agents_keep_playing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("qlearners.msgpack");

    let (x, o) = trained_pair();
    SavedAgents::from_pair(&x, &o)
        .save_to_file(&path)
        .expect("Failed to save");

    let (mut loaded_x, mut loaded_o) = SavedAgents::load_from_file(&path)
        .expect("Failed to load")
        .into_pair()
        .expect("supported version");

    let mut engine = GameEngine::with_seed(11);
    for _ in 0..10 {
        engine
            .play_episode(&mut loaded_x, &mut loaded_o)
            .expect("episode completes");
    }
}

#[test]
fn test_save_to_invalid_path_returns_error() {
    let (x, o) = trained_pair();
    let result =
        SavedAgents::from_pair(&x, &o).save_to_file("/invalid_dir_12345/agents.msgpack");
    assert!(result.is_err());
}
