//! Evaluate the greedy policy of a [`QFunction`].
use crate::{Env, QFunction};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate the greedy policy of a [`QFunction`].
pub trait Evaluator<E: Env> {
    /// Returns the mean episodic return of the greedy policy.
    ///
    /// The approximator is only borrowed for prediction.
    fn evaluate<Q: QFunction + ?Sized>(&mut self, q: &Q) -> Result<f32>;
}
