//! Environment selected by id.
use crate::{CartPole, ClassicEnvConfig, MountainCar};
use anyhow::{bail, Result};
use deepq_core::{Env, Step};
use log::info;

/// A classic-control environment chosen by [`ClassicEnvConfig`].
pub enum ClassicEnv {
    /// `CartPole-v0`, `CartPole-v1`
    CartPole(CartPole),

    /// `MountainCar-v0`
    MountainCar(MountainCar),
}

impl Env for ClassicEnv {
    type Config = ClassicEnvConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let seed = seed as u64;
        let env = match config.id.as_str() {
            "CartPole-v0" => Self::CartPole(CartPole::new(config.max_steps.unwrap_or(200), seed)),
            "CartPole-v1" => Self::CartPole(CartPole::new(config.max_steps.unwrap_or(500), seed)),
            "MountainCar-v0" => {
                Self::MountainCar(MountainCar::new(config.max_steps.unwrap_or(200), seed))
            }
            id => bail!("Unknown environment id {:?}", id),
        };
        info!("Build environment {} with seed {}", config.id, seed);
        Ok(env)
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        Ok(match self {
            Self::CartPole(env) => env.reset(),
            Self::MountainCar(env) => env.reset(),
        })
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        match self {
            Self::CartPole(env) => env.step(act),
            Self::MountainCar(env) => env.step(act),
        }
    }

    fn n_actions(&self) -> usize {
        match self {
            Self::CartPole(_) => 2,
            Self::MountainCar(_) => 3,
        }
    }

    fn obs_dim(&self) -> usize {
        match self {
            Self::CartPole(_) => 4,
            Self::MountainCar(_) => 2,
        }
    }
}
