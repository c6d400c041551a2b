use anyhow::Result;
use deepq_core::{
    dummy::{BanditEnv, BanditEnvConfig, LinearQ},
    record::{BufferedRecorder, NullRecorder},
    DefaultEvaluator, Evaluator, QFunction, ReplayBufferConfig, RunContext, Trainer, TrainerConfig,
};
use tempdir::TempDir;

fn config() -> TrainerConfig {
    TrainerConfig::default()
        .max_iteration(3000)
        .epsilon(1.0)
        .epsilon_decay(1e-3)
        .epsilon_min(0.05)
        .interval_iteration(1000)
        .test_size(20)
}

#[test]
fn test_bandit_converges_with_replay() -> Result<()> {
    let dir = TempDir::new("bandit_replay")?;
    let config = config().replay_buffer(Some(
        ReplayBufferConfig::default()
            .capacity(1000)
            .burn_in(100)
            .batch_size(32),
    ));
    let run = RunContext::new("bandit", dir.path());
    let mut trainer = Trainer::<BanditEnv>::build(config, &BanditEnvConfig::default(), run)?;
    let mut q = LinearQ::new(1, 2, 0.05);
    let mut recorder = BufferedRecorder::new();

    let performance = trainer.train(&mut q, &mut recorder)?;

    assert_eq!(performance.len(), 3);
    assert_eq!(performance.last(), Some(&(3000, 1.0)));

    let values = q.predict_one(&[1.0])?;
    assert!((values[0] - 1.0).abs() < 0.1, "{:?}", values);
    assert!(values[1].abs() < 0.1, "{:?}", values);
    Ok(())
}

#[test]
fn test_bandit_converges_without_replay() -> Result<()> {
    let dir = TempDir::new("bandit_episode")?;
    let config = config().use_replay_memory(false).replay_buffer(None);
    let run = RunContext::new("bandit", dir.path());
    let mut trainer = Trainer::<BanditEnv>::build(config, &BanditEnvConfig::default(), run)?;
    let mut q = LinearQ::new(1, 2, 0.05);

    trainer.train(&mut q, &mut NullRecorder::new())?;

    let mut evaluator = DefaultEvaluator::<BanditEnv>::new(&BanditEnvConfig::default(), 0, 20)?;
    assert_eq!(evaluator.evaluate(&q)?, 1.0);
    assert!(dir.path().join("bandit.json").exists());
    Ok(())
}
