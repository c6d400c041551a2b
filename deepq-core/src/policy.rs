//! Action selection.
use crate::error::DqnError;
use anyhow::Result;
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Linearly decaying exploration rate with a floor.
///
/// `eps(i) = max(eps_start - eps_decay * i, eps_final)`, computed from the
/// absolute iteration count.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonSchedule {
    /// Exploration rate at iteration 0.
    pub eps_start: f64,

    /// Decrease of the exploration rate per iteration.
    pub eps_decay: f64,

    /// Lower bound of the exploration rate.
    pub eps_final: f64,
}

impl EpsilonSchedule {
    /// Constructs a schedule.
    pub fn new(eps_start: f64, eps_decay: f64, eps_final: f64) -> Self {
        Self {
            eps_start,
            eps_decay,
            eps_final,
        }
    }

    /// Exploration rate at `iteration`.
    pub fn eps(&self, iteration: usize) -> f64 {
        (self.eps_start - self.eps_decay * iteration as f64).max(self.eps_final)
    }
}

/// Epsilon-greedy explorer.
pub struct EpsilonGreedy {
    rng: SmallRng,
}

impl EpsilonGreedy {
    /// Constructs an explorer with a seeded RNG.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Selects an action from the action values `q`.
    ///
    /// With probability `eps` a uniformly random action is taken. Otherwise
    /// an action with the maximum value is taken, exact ties being broken
    /// uniformly at random.
    pub fn action(&mut self, q: &[f32], eps: f64) -> Result<usize> {
        if q.is_empty() {
            return Err(DqnError::ShapeMismatch("no action values".to_string()).into());
        }

        if self.rng.gen_bool(eps) {
            return Ok(self.rng.gen_range(0..q.len()));
        }

        let max = q.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let best = q
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == max)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        // All values are NaN.
        Ok(*best.choose(&mut self.rng).unwrap_or(&0))
    }
}

/// Index of the first maximum of `q`, used by evaluation.
pub fn greedy(q: &[f32]) -> usize {
    q.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(ix, max), (i, v)| {
            if *v > max {
                (i, *v)
            } else {
                (ix, max)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_monotone_with_floor() {
        let schedule = EpsilonSchedule::new(0.5, 4.5e-4, 0.05);
        assert_eq!(schedule.eps(0), 0.5);

        let mut prev = schedule.eps(0);
        for i in (0..5000).step_by(10) {
            let eps = schedule.eps(i);
            assert!(eps <= prev);
            assert!(eps >= 0.05);
            prev = eps;
        }
        assert_eq!(schedule.eps(2000), 0.05);
        assert_eq!(schedule.eps(1_000_000), 0.05);
    }

    #[test]
    fn test_tie_break_uniform() -> Result<()> {
        let mut explorer = EpsilonGreedy::new(7);
        let q = [1.0, 3.0, 3.0, 0.0, 3.0];
        let n = 30000;
        let mut counts = [0usize; 5];
        for _ in 0..n {
            counts[explorer.action(&q, 0.0)?] += 1;
        }

        assert_eq!(counts[0] + counts[3], 0);
        for ix in [1, 2, 4] {
            let freq = counts[ix] as f64 / n as f64;
            assert!((freq - 1.0 / 3.0).abs() < 0.02, "freq of {} = {}", ix, freq);
        }
        Ok(())
    }

    #[test]
    fn test_full_exploration_covers_actions() -> Result<()> {
        let mut explorer = EpsilonGreedy::new(0);
        let q = [10.0, 0.0, 0.0];
        let mut seen = [false; 3];
        for _ in 0..300 {
            seen[explorer.action(&q, 1.0)?] = true;
        }
        assert!(seen.iter().all(|s| *s));
        Ok(())
    }

    #[test]
    fn test_greedy_lowest_index() {
        assert_eq!(greedy(&[0.0, 2.0, 2.0]), 1);
        assert_eq!(greedy(&[-1.0]), 0);
    }
}
