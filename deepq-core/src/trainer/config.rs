//! Configuration of [`Trainer`](super::Trainer).
use crate::{error::DqnError, ReplayBufferConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// ```rust
/// use deepq_core::{ReplayBufferConfig, TrainerConfig};
///
/// let config = TrainerConfig::default()
///     .max_iteration(100_000)
///     .interval_iteration(1000)
///     .replay_buffer(Some(ReplayBufferConfig::default().capacity(50000).burn_in(10000)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Number of environment steps of the run.
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

    /// If `false`, the approximator is fitted on each episode as a whole.
    pub use_replay_memory: bool,

    /// Replay buffer, required when `use_replay_memory` is set.
    pub replay_buffer: Option<ReplayBufferConfig>,

    /// Seed of the environments and the explorer.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_iteration: 100_000,
            epsilon: 0.5,
            epsilon_decay: 4.5e-4,
            epsilon_min: 0.05,
            interval_iteration: 1000,
            gamma: 0.99,
            test_size: 20,
            use_replay_memory: true,
            replay_buffer: Some(ReplayBufferConfig::default()),
            seed: 42,
        }
    }
}

fn invalid(msg: impl Into<String>) -> Result<()> {
    Err(DqnError::InvalidConfig(msg.into()).into())
}

impl TrainerConfig {
    /// Sets the number of iterations.
    pub fn max_iteration(mut self, v: usize) -> Self {
        self.max_iteration = v;
        self
    }

    /// Sets the exploration rate at iteration 0.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the decay of the exploration rate per iteration.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Sets the lower bound of the exploration rate.
    pub fn epsilon_min(mut self, v: f64) -> Self {
        self.epsilon_min = v;
        self
    }

    /// Sets the interval of evaluation in iterations.
    pub fn interval_iteration(mut self, v: usize) -> Self {
        self.interval_iteration = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the number of episodes per evaluation.
    pub fn test_size(mut self, v: usize) -> Self {
        self.test_size = v;
        self
    }

    /// Enables or disables experience replay.
    pub fn use_replay_memory(mut self, v: bool) -> Self {
        self.use_replay_memory = v;
        self
    }

    /// Sets the configuration of the replay buffer.
    pub fn replay_buffer(mut self, v: Option<ReplayBufferConfig>) -> Self {
        self.replay_buffer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Interval of checkpoints in iterations, a third of the run.
    pub fn checkpoint_interval(&self) -> usize {
        self.max_iteration / 3
    }

    /// Checks the configuration for values the training loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_iteration == 0 {
            return invalid("interval_iteration must be positive");
        }
        if self.checkpoint_interval() == 0 {
            return invalid(format!(
                "max_iteration = {} leaves no room for three checkpoints",
                self.max_iteration
            ));
        }
        if self.test_size == 0 {
            return invalid("test_size must be positive");
        }
        for (name, v) in [("epsilon", self.epsilon), ("epsilon_min", self.epsilon_min)] {
            if !(0.0..=1.0).contains(&v) {
                return invalid(format!("{} = {} is outside [0, 1]", name, v));
            }
        }
        if self.epsilon_decay.is_nan() || self.epsilon_decay < 0.0 {
            return invalid(format!("epsilon_decay = {} is negative", self.epsilon_decay));
        }
        if self.gamma.is_nan() || self.gamma <= 0.0 || self.gamma > 1.0 {
            return invalid(format!("gamma = {} is outside (0, 1]", self.gamma));
        }

        if self.use_replay_memory {
            let buffer = match &self.replay_buffer {
                Some(buffer) => buffer,
                None => return invalid("replay mode without a replay buffer"),
            };
            if buffer.capacity == 0 {
                return invalid("replay buffer capacity must be positive");
            }
            if buffer.batch_size == 0 {
                return invalid("batch_size must be positive");
            }
            if buffer.batch_size > buffer.capacity {
                return invalid(format!(
                    "batch_size = {} exceeds the buffer capacity {}",
                    buffer.batch_size, buffer.capacity
                ));
            }
            if buffer.burn_in < buffer.batch_size {
                return invalid(format!(
                    "burn_in = {} is smaller than batch_size = {}",
                    buffer.burn_in, buffer.batch_size
                ));
            }
        }

        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
