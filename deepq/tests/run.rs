use anyhow::Result;
use deepq::{run, OptimizerKind, TrainingConfig};
use deepq_candle_agent::dqn::QNetworkKind;
use deepq_core::{PerformanceLog, RunContext};
use std::path::Path;
use tempdir::TempDir;

fn shipped(name: &str) -> Result<TrainingConfig> {
    TrainingConfig::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("config").join(name))
}

#[test]
fn test_shipped_configs_are_valid() -> Result<()> {
    let q1 = shipped("cartpole_q1.yaml")?;
    assert_eq!(q1.model, QNetworkKind::Linear);
    assert!(!q1.use_replay_memory);
    q1.validate()?;

    let q3 = shipped("cartpole_q3.yaml")?;
    assert_eq!(q3.model, QNetworkKind::Mlp);
    assert_eq!(q3.memory_size, 50000);
    q3.validate()?;
    Ok(())
}

#[test]
fn test_short_run_writes_artifacts() -> Result<()> {
    let dir = TempDir::new("deepq_run")?;
    let config = TrainingConfig::default()
        .model(QNetworkKind::Mlp)
        .units(vec![16])
        .max_iteration(300)
        .interval_iteration(150)
        .test_size(2)
        .replay(Some((500, 64, 16)));

    let performance = run(&config, RunContext::new("short", dir.path()))?;

    let iterations = performance.iter().map(|(i, _)| *i).collect::<Vec<_>>();
    assert_eq!(iterations, vec![150, 300]);
    assert!(performance.iter().all(|(_, r)| *r >= 1.0));
    assert!(dir.path().join("short_100.safetensors").exists());
    assert!(dir.path().join("short_200.safetensors").exists());
    assert!(!dir.path().join("short_300.safetensors").exists());
    assert_eq!(PerformanceLog::load(dir.path().join("short.json"))?, performance);
    Ok(())
}

#[test]
fn test_non_replay_linear_run() -> Result<()> {
    let dir = TempDir::new("deepq_run")?;
    let config = TrainingConfig::default()
        .model(QNetworkKind::Linear)
        .optimizer(OptimizerKind::AdamW)
        .learning_rate(0.002)
        .max_iteration(90)
        .interval_iteration(45)
        .test_size(1)
        .replay(None);

    let performance = run(&config, RunContext::new("linear", dir.path()))?;
    assert_eq!(performance.len(), 2);
    assert!(dir.path().join("linear_30.safetensors").exists());
    assert!(dir.path().join("linear_60.safetensors").exists());
    Ok(())
}

#[test]
fn test_invalid_config_writes_nothing() -> Result<()> {
    let dir = TempDir::new("deepq_run")?;
    let model_dir = dir.path().join("model");
    let config = TrainingConfig::default().learning_rate(-1.0);
    assert!(run(&config, RunContext::new("bad", &model_dir)).is_err());
    assert!(!model_dir.exists());
    Ok(())
}
