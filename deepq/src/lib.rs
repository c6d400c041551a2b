//! Deep Q-learning on classic-control environments.
//!
//! This crate ties together [`deepq_core`], [`deepq_candle_agent`] and
//! [`deepq_classic_env`]. A run is described by a single [`TrainingConfig`],
//! usually read from YAML, and executed by [`run`]:
//!
//! ```no_run
//! use deepq::{run, TrainingConfig};
//! use deepq_core::RunContext;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TrainingConfig::load("deepq/config/cartpole_q3.yaml")?;
//! let performance = run(&config, RunContext::new("cartpole_q3", "./model"))?;
//! println!("{:?}", performance.last());
//! # Ok(())
//! # }
//! ```
mod config;
use anyhow::Result;
pub use config::{OptimizerKind, TrainingConfig};
use deepq_candle_agent::dqn::build_q_network;
use deepq_classic_env::ClassicEnv;
use deepq_core::{record::LogRecorder, Env, PerformanceLog, RunContext, Trainer};
use log::info;

/// Trains an action-value network as described by `config`.
///
/// Checkpoints and the performance log are written below the model
/// directory of `run`. The configuration is validated before any environment
/// is built.
pub fn run(config: &TrainingConfig, run: RunContext) -> Result<PerformanceLog> {
    config.validate()?;

    let env_config = config.env_config();
    let (obs_dim, n_actions) = {
        let env = ClassicEnv::build(&env_config, config.seed as i64)?;
        (env.obs_dim(), env.n_actions())
    };
    let mut q = build_q_network(&config.model_config(), obs_dim, n_actions)?;

    info!(
        "Start run {} on {} with {:?} network",
        run.identifier(),
        config.env,
        config.model
    );
    let mut trainer = Trainer::<ClassicEnv>::build(config.trainer_config(), &env_config, run)?;
    let mut recorder = LogRecorder::new();

    trainer.train(&mut q, &mut recorder)
}
