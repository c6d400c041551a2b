//! This module is used for tests.
//!
//! It provides small environments with known returns and a pure-Rust linear
//! approximator, so the training loop can be tested without a neural network
//! backend.
use crate::{
    error::DqnError,
    record::Record,
    Env, QFunction, RunContext, Step,
};
use anyhow::{bail, Result};
use std::{cell::RefCell, fs::File, io::BufWriter, path::PathBuf};

/// Configuration of [`BanditEnv`].
#[derive(Clone, Debug, Default)]
pub struct BanditEnvConfig {}

/// Two-armed bandit with one-step episodes.
///
/// The observation is always `[1.0]`. Action 0 gives reward 1, action 1
/// gives reward 0.
pub struct BanditEnv {}

impl Env for BanditEnv {
    type Config = BanditEnvConfig;

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {})
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        Ok(vec![1.0])
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        let reward = match act {
            0 => 1.0,
            1 => 0.0,
            _ => bail!("Invalid action {}", act),
        };
        Ok(Step::new(act, vec![1.0], reward, true, false))
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn obs_dim(&self) -> usize {
        1
    }
}

/// Configuration of [`CountingEnv`].
#[derive(Clone, Debug)]
pub struct CountingEnvConfig {
    episode_len: usize,
}

impl Default for CountingEnvConfig {
    fn default() -> Self {
        Self { episode_len: 10 }
    }
}

impl CountingEnvConfig {
    /// Sets the number of steps per episode.
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }
}

/// Episodes of a fixed length with reward 1 on every step, whatever the action.
///
/// The observation is the elapsed fraction of the episode. The last step is
/// reported as truncated.
pub struct CountingEnv {
    episode_len: usize,
    t: usize,
}

impl CountingEnv {
    fn obs(&self) -> Vec<f32> {
        vec![self.t as f32 / self.episode_len as f32]
    }
}

impl Env for CountingEnv {
    type Config = CountingEnvConfig;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        if act >= 2 {
            bail!("Invalid action {}", act);
        }
        self.t += 1;
        let is_truncated = self.t >= self.episode_len;
        Ok(Step::new(act, self.obs(), 1.0, false, is_truncated))
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn obs_dim(&self) -> usize {
        1
    }
}

/// Returns the same action values for every observation.
pub struct ConstQ {
    values: Vec<f32>,
}

impl ConstQ {
    /// Constructs with the action values.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }
}

impl QFunction for ConstQ {
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        Ok(obs.iter().map(|_| self.values.clone()).collect())
    }

    fn fit(&mut self, _obs: &[Vec<f32>], _targets: &[Vec<f32>], _batch_size: usize) -> Result<Record> {
        Ok(Record::empty())
    }

    fn save_checkpoint(&self, run: &RunContext, iteration: usize) -> Result<PathBuf> {
        Ok(run.checkpoint_stem(iteration))
    }
}

/// Linear action-value function `W x + b` trained with plain SGD.
///
/// The number of rows of every fit and the iteration of every checkpoint are
/// kept for inspection.
pub struct LinearQ {
    /// One row per action, the last column is the bias.
    weights: Vec<Vec<f32>>,
    learning_rate: f32,
    fit_sizes: Vec<usize>,
    checkpoints: RefCell<Vec<usize>>,
}

impl LinearQ {
    /// Constructs with zero weights.
    pub fn new(obs_dim: usize, n_actions: usize, learning_rate: f32) -> Self {
        Self {
            weights: vec![vec![0.0; obs_dim + 1]; n_actions],
            learning_rate,
            fit_sizes: vec![],
            checkpoints: RefCell::new(vec![]),
        }
    }

    /// Rows of each call to [`QFunction::fit`].
    pub fn fit_sizes(&self) -> &[usize] {
        &self.fit_sizes
    }

    /// Iterations of the saved checkpoints.
    pub fn checkpoints(&self) -> Vec<usize> {
        self.checkpoints.borrow().clone()
    }

    fn forward(&self, x: &[f32]) -> Result<Vec<f32>> {
        let obs_dim = self.weights[0].len() - 1;
        if x.len() != obs_dim {
            return Err(DqnError::ShapeMismatch(format!(
                "observation of length {}, expected {}",
                x.len(),
                obs_dim
            ))
            .into());
        }
        Ok(self
            .weights
            .iter()
            .map(|w| w[obs_dim] + w.iter().zip(x).map(|(w, x)| w * x).sum::<f32>())
            .collect())
    }
}

impl QFunction for LinearQ {
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        obs.iter().map(|x| self.forward(x)).collect()
    }

    fn fit(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>], _batch_size: usize) -> Result<Record> {
        if obs.is_empty() {
            return Err(DqnError::EmptyBatch.into());
        }
        if obs.len() != targets.len() {
            return Err(DqnError::ShapeMismatch(format!(
                "{} observations and {} targets",
                obs.len(),
                targets.len()
            ))
            .into());
        }

        let mut loss = 0f32;
        for (x, y) in obs.iter().zip(targets) {
            let pred = self.forward(x)?;
            for (j, w) in self.weights.iter_mut().enumerate() {
                let err = pred[j] - y[j];
                loss += err * err;
                for (w, x) in w.iter_mut().zip(x) {
                    *w -= self.learning_rate * err * x;
                }
                if let Some(b) = w.last_mut() {
                    *b -= self.learning_rate * err;
                }
            }
        }
        self.fit_sizes.push(obs.len());

        let n = (obs.len() * self.weights.len()) as f32;
        Ok(Record::from_scalar("loss", loss / n))
    }

    fn save_checkpoint(&self, run: &RunContext, iteration: usize) -> Result<PathBuf> {
        let mut path = run.checkpoint_stem(iteration).into_os_string();
        path.push(".json");
        let path = PathBuf::from(path);
        let file = File::create(&path)?;
        serde_json::to_writer(BufWriter::new(file), &self.weights)?;
        self.checkpoints.borrow_mut().push(iteration);
        Ok(path)
    }
}
