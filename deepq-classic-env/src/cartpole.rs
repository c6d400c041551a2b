//! Cart-pole balancing.
use anyhow::{bail, Result};
use deepq_core::Step;
use rand::{rngs::StdRng, Rng, SeedableRng};

const GRAVITY: f64 = 9.8;
const MASSCART: f64 = 1.0;
const MASSPOLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASSCART + MASSPOLE;
// half the pole's length
const LENGTH: f64 = 0.5;
const POLEMASS_LENGTH: f64 = MASSPOLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
// seconds between state updates
const TAU: f64 = 0.02;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const X_THRESHOLD: f64 = 2.4;

/// A pole hinged on a cart moving along a frictionless track.
///
/// Action 0 pushes the cart to the left, action 1 to the right. Reward is 1
/// for every step, including the one where the pole falls. The episode
/// terminates when the pole leans more than 12 degrees or the cart leaves
/// `[-2.4, 2.4]`.
pub struct CartPole {
    /// `[x, x_dot, theta, theta_dot]`
    state: [f64; 4],
    max_steps: usize,
    steps: usize,
    rng: StdRng,
}

impl CartPole {
    /// Constructs the environment.
    pub fn new(max_steps: usize, seed: u64) -> Self {
        Self {
            state: [0.0; 4],
            max_steps,
            steps: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn obs(&self) -> Vec<f32> {
        self.state.iter().map(|v| *v as f32).collect()
    }

    /// Starts an episode from a state drawn uniformly from `[-0.05, 0.05]^4`.
    pub fn reset(&mut self) -> Vec<f32> {
        for v in self.state.iter_mut() {
            *v = self.rng.gen_range(-0.05..0.05);
        }
        self.steps = 0;
        self.obs()
    }

    /// Advances the simulation by one Euler step.
    pub fn step(&mut self, act: usize) -> Result<Step> {
        let force = match act {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            _ => bail!("Invalid action {} for CartPole", act),
        };
        let [x, x_dot, theta, theta_dot] = self.state;

        let cos_theta = theta.cos();
        let sin_theta = theta.sin();
        let temp = (force + POLEMASS_LENGTH * theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASSPOLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLEMASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        let is_terminated =
            self.state[0].abs() > X_THRESHOLD || self.state[2].abs() > THETA_THRESHOLD;
        let is_truncated = !is_terminated && self.steps >= self.max_steps;

        Ok(Step::new(act, self.obs(), 1.0, is_terminated, is_truncated))
    }
}
