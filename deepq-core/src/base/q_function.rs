//! Action-value function approximator.
use crate::{error::DqnError, record::Record, RunContext};
use anyhow::Result;
use std::path::PathBuf;

/// Approximator of the action-value function `Q(s, ·)`.
///
/// The training loop only talks to the approximator through this trait, so
/// the architecture (and the backend implementing it) is decided once, when
/// the concrete type is constructed.
pub trait QFunction {
    /// Returns one row of action values per observation.
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;

    /// Regresses the outputs for `obs` onto `targets`.
    ///
    /// `batch_size` is the size of the mini-batches the data is split into.
    /// The returned record holds training statistics such as the loss.
    fn fit(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>], batch_size: usize) -> Result<Record>;

    /// Saves the parameters as the checkpoint of `iteration` in the given run
    /// and returns the path of the written artifact.
    fn save_checkpoint(&self, run: &RunContext, iteration: usize) -> Result<PathBuf>;

    /// Returns the action values of a single observation.
    fn predict_one(&self, obs: &[f32]) -> Result<Vec<f32>> {
        self.predict(&[obs.to_vec()])?
            .into_iter()
            .next()
            .ok_or_else(|| DqnError::ShapeMismatch("predict returned no rows".to_string()).into())
    }
}

impl<Q: QFunction + ?Sized> QFunction for Box<Q> {
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        (**self).predict(obs)
    }

    fn fit(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>], batch_size: usize) -> Result<Record> {
        (**self).fit(obs, targets, batch_size)
    }

    fn save_checkpoint(&self, run: &RunContext, iteration: usize) -> Result<PathBuf> {
        (**self).save_checkpoint(run, iteration)
    }
}
