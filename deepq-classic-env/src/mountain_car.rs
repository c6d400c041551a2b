//! Mountain car.
use anyhow::{bail, Result};
use deepq_core::Step;
use rand::{rngs::StdRng, Rng, SeedableRng};

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const GOAL_VELOCITY: f64 = 0.0;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// An underpowered car in a valley that has to swing up to the right hill.
///
/// Actions 0, 1 and 2 accelerate to the left, not at all and to the right.
/// Reward is -1 for every step. The episode terminates when the car reaches
/// position 0.5.
pub struct MountainCar {
    position: f64,
    velocity: f64,
    max_steps: usize,
    steps: usize,
    rng: StdRng,
}

impl MountainCar {
    /// Constructs the environment.
    pub fn new(max_steps: usize, seed: u64) -> Self {
        Self {
            position: -0.5,
            velocity: 0.0,
            max_steps,
            steps: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn obs(&self) -> Vec<f32> {
        vec![self.position as f32, self.velocity as f32]
    }

    /// Starts an episode at rest, at a position drawn from `[-0.6, -0.4)`.
    pub fn reset(&mut self) -> Vec<f32> {
        self.position = self.rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.steps = 0;
        self.obs()
    }

    /// Advances the simulation by one step.
    pub fn step(&mut self, act: usize) -> Result<Step> {
        let direction = match act {
            0 => -1.0,
            1 => 0.0,
            2 => 1.0,
            _ => bail!("Invalid action {} for MountainCar", act),
        };

        self.velocity += direction * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
        if self.position <= MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        self.steps += 1;

        let is_terminated = self.position >= GOAL_POSITION && self.velocity >= GOAL_VELOCITY;
        let is_truncated = !is_terminated && self.steps >= self.max_steps;

        Ok(Step::new(act, self.obs(), -1.0, is_terminated, is_truncated))
    }
}
