//! Configuration of a run.
use anyhow::Result;
use deepq_candle_agent::{
    dqn::{DqnModelConfig, QNetworkKind},
    opt::OptimizerConfig,
    Device,
};
use deepq_classic_env::ClassicEnvConfig;
use deepq_core::{error::DqnError, ReplayBufferConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Optimizer of the action-value network.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum OptimizerKind {
    /// Adam.
    #[default]
    Adam,

    /// AdamW with the default weight decay.
    AdamW,
}

/// Every option of a run in one flat structure.
///
/// Missing fields take the values of [`TrainingConfig::default`], which
/// trains an MLP on `CartPole-v0` with experience replay.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainingConfig {
    /// Environment id, see [`deepq_classic_env`].
    pub env: String,

    /// Overrides the step limit of the environment.
    pub max_steps: Option<usize>,

    /// Architecture of the action-value network.
    pub model: QNetworkKind,

    /// Hidden layers of `Mlp` and `Dueling`.
    pub units: Vec<usize>,

    /// Hidden units of the dueling streams.
    pub stream_units: usize,

    /// Optimizer of the network.
    pub optimizer: OptimizerKind,

    /// Learning rate of the optimizer.
    pub learning_rate: f64,

    /// Number of environment steps.
    pub max_iteration: usize,

    /// Exploration rate at iteration 0.
    pub epsilon: f64,

    /// Decrease of the exploration rate per iteration.
    pub epsilon_decay: f64,

    /// Lower bound of the exploration rate.
    pub epsilon_min: f64,

    /// Interval of evaluation in iterations.
    pub interval_iteration: usize,

    /// Discount factor.
    pub gamma: f32,

    /// Number of episodes per evaluation.
    pub test_size: usize,

    /// Fit on sampled batches of a replay buffer instead of whole episodes.
    pub use_replay_memory: bool,

    /// Capacity of the replay buffer.
    pub memory_size: usize,

    /// Number of random-action transitions stored before training.
    pub burn_in: usize,

    /// Number of transitions sampled per update.
    pub batch_size: usize,

    /// Random seed.
    pub seed: u64,

    /// Device of the network.
    pub device: Device,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            env: "CartPole-v0".to_string(),
            max_steps: None,
            model: QNetworkKind::Mlp,
            units: vec![30, 30, 30, 30],
            stream_units: 30,
            optimizer: OptimizerKind::Adam,
            learning_rate: 0.0001,
            max_iteration: 100_000,
            epsilon: 0.5,
            epsilon_decay: 4.5e-4,
            epsilon_min: 0.05,
            interval_iteration: 1000,
            gamma: 0.99,
            test_size: 20,
            use_replay_memory: true,
            memory_size: 50000,
            burn_in: 10000,
            batch_size: 32,
            seed: 42,
            device: Device::Cpu,
        }
    }
}

impl TrainingConfig {
    /// Sets the environment id.
    pub fn env(mut self, v: impl Into<String>) -> Self {
        self.env = v.into();
        self
    }

    /// Sets the architecture.
    pub fn model(mut self, v: QNetworkKind) -> Self {
        self.model = v;
        self
    }

    /// Sets the hidden layers.
    pub fn units(mut self, v: Vec<usize>) -> Self {
        self.units = v;
        self
    }

    /// Sets the optimizer.
    pub fn optimizer(mut self, v: OptimizerKind) -> Self {
        self.optimizer = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the number of iterations.
    pub fn max_iteration(mut self, v: usize) -> Self {
        self.max_iteration = v;
        self
    }

    /// Sets the interval of evaluation.
    pub fn interval_iteration(mut self, v: usize) -> Self {
        self.interval_iteration = v;
        self
    }

    /// Sets the number of episodes per evaluation.
    pub fn test_size(mut self, v: usize) -> Self {
        self.test_size = v;
        self
    }

    /// Sets the replay buffer: capacity, burn-in and batch size.
    ///
    /// `None` disables experience replay.
    pub fn replay(mut self, v: Option<(usize, usize, usize)>) -> Self {
        match v {
            Some((memory_size, burn_in, batch_size)) => {
                self.use_replay_memory = true;
                self.memory_size = memory_size;
                self.burn_in = burn_in;
                self.batch_size = batch_size;
            }
            None => self.use_replay_memory = false,
        }
        self
    }

    /// Configuration of the environment.
    pub fn env_config(&self) -> ClassicEnvConfig {
        ClassicEnvConfig::default()
            .id(self.env.clone())
            .max_steps(self.max_steps)
    }

    /// Configuration of the action-value network.
    pub fn model_config(&self) -> DqnModelConfig {
        let opt_config = match self.optimizer {
            OptimizerKind::Adam => OptimizerConfig::Adam {
                lr: self.learning_rate,
            },
            OptimizerKind::AdamW => OptimizerConfig::adamw(self.learning_rate),
        };
        DqnModelConfig::default()
            .kind(self.model)
            .units(self.units.clone())
            .stream_units(self.stream_units)
            .opt_config(opt_config)
            .device(self.device)
    }

    /// Configuration of the training loop.
    pub fn trainer_config(&self) -> TrainerConfig {
        let replay_buffer = self.use_replay_memory.then(|| {
            ReplayBufferConfig::default()
                .capacity(self.memory_size)
                .burn_in(self.burn_in)
                .batch_size(self.batch_size)
                .seed(self.seed)
        });

        TrainerConfig::default()
            .max_iteration(self.max_iteration)
            .epsilon(self.epsilon)
            .epsilon_decay(self.epsilon_decay)
            .epsilon_min(self.epsilon_min)
            .interval_iteration(self.interval_iteration)
            .gamma(self.gamma)
            .test_size(self.test_size)
            .use_replay_memory(self.use_replay_memory)
            .replay_buffer(replay_buffer)
            .seed(self.seed)
    }

    /// Checks the configuration before anything is built.
    pub fn validate(&self) -> Result<()> {
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(DqnError::InvalidConfig(format!(
                "learning_rate = {} must be positive",
                self.learning_rate
            ))
            .into());
        }
        self.trainer_config().validate()
    }

    /// Constructs [`TrainingConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainingConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_component_configs() {
        let config = TrainingConfig::default().replay(Some((1000, 100, 16)));
        let trainer_config = config.trainer_config();
        let buffer = trainer_config.replay_buffer.clone().unwrap();
        assert_eq!(buffer.capacity, 1000);
        assert_eq!(buffer.burn_in, 100);
        assert_eq!(buffer.batch_size, 16);
        assert!(trainer_config.use_replay_memory);

        let config = config.replay(None);
        assert_eq!(config.trainer_config().replay_buffer, None);
        assert_eq!(config.model_config().opt_config.lr(), 0.0001);
        assert_eq!(config.env_config().get_id(), "CartPole-v0");
    }

    #[test]
    fn test_validate() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig::default().learning_rate(0.0).validate().is_err());
        assert!(TrainingConfig::default().replay(Some((16, 8, 32))).validate().is_err());
        assert!(TrainingConfig::default().replay(Some((1000, 8, 32))).validate().is_err());
        assert!(TrainingConfig::default().interval_iteration(0).validate().is_err());
    }

    #[test]
    fn test_partial_yaml() -> Result<()> {
        let config: TrainingConfig = serde_yaml::from_str("model: Linear\nuse_replay_memory: false\n")?;
        assert_eq!(config.model, QNetworkKind::Linear);
        assert!(!config.use_replay_memory);
        assert_eq!(config.max_iteration, 100_000);
        assert_eq!(config.optimizer, OptimizerKind::Adam);

        let config: TrainingConfig =
            serde_yaml::from_str("optimizer: AdamW\nlearning_rate: 0.001\n")?;
        assert_eq!(
            config.model_config().opt_config,
            OptimizerConfig::adamw(0.001)
        );
        Ok(())
    }

    #[test]
    fn test_serde_training_config() -> Result<()> {
        let config = TrainingConfig::default()
            .env("MountainCar-v0")
            .model(QNetworkKind::Dueling)
            .units(vec![30, 30]);
        let dir = TempDir::new("training_config")?;
        let path = dir.path().join("training_config.yaml");
        config.save(&path)?;
        assert_eq!(TrainingConfig::load(&path)?, config);
        Ok(())
    }
}
