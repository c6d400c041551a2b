//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{greedy, Env, QFunction};
use anyhow::Result;
use log::debug;

/// Runs a fixed number of greedy episodes on its own environment instance.
///
/// The return is the sum of the rewards over all episodes divided by the
/// number of episodes. Actions are taken with [`greedy`], so ties go to the
/// lowest index.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CartPole>::new(&env_config, 42, 20)?;
/// let mean_return = evaluator.evaluate(&q)?;
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<Q: QFunction + ?Sized>(&mut self, q: &Q) -> Result<f32> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut r_episode = 0f32;

            loop {
                let act = greedy(&q.predict_one(&obs)?);
                let step = self.env.step(act)?;
                r_episode += step.reward;
                if step.is_done() {
                    break;
                }
                obs = step.obs;
            }

            debug!("Evaluation episode {}: return = {}", ix, r_episode);
            r_total += r_episode;
        }

        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration of the environment
    /// * `seed` - Random seed of the environment
    /// * `n_episodes` - Number of episodes per evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Number of episodes per evaluation.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{BanditEnv, BanditEnvConfig, ConstQ, CountingEnv, CountingEnvConfig};

    #[test]
    fn test_mean_return_over_episodes() -> Result<()> {
        // Reward 1 per step, 3 steps per episode.
        let config = CountingEnvConfig::default().episode_len(3);
        let mut evaluator = DefaultEvaluator::<CountingEnv>::new(&config, 0, 4)?;
        let q = ConstQ::new(vec![0.0, 0.0]);
        assert_eq!(evaluator.evaluate(&q)?, 3.0);
        Ok(())
    }

    #[test]
    fn test_ties_choose_lowest_index() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<BanditEnv>::new(&BanditEnvConfig::default(), 0, 20)?;
        assert_eq!(evaluator.evaluate(&ConstQ::new(vec![0.0, 0.0]))?, 1.0);
        assert_eq!(evaluator.evaluate(&ConstQ::new(vec![0.0, 1.0]))?, 0.0);
        Ok(())
    }
}
