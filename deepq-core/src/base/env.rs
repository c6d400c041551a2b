//! Environment.
use super::Step;
use anyhow::Result;

/// Represents an environment with a discrete action space and vector observations.
///
/// Observations are fixed-length `f32` vectors of length [`Env::obs_dim`],
/// actions are indices in `0..`[`Env::n_actions`].
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Performes an environment step.
    fn step(&mut self, act: usize) -> Result<Step>;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// The length of observation vectors.
    fn obs_dim(&self) -> usize;
}
