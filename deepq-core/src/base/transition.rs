//! Transition.
use super::Step;

/// One environment step `(s, a, r, s', done)`.
///
/// A transition is created once from an environment step and is never
/// mutated afterwards. `next_state` carries no meaning when `done` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    state: Vec<f32>,
    action: usize,
    reward: f32,
    next_state: Vec<f32>,
    done: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(state: Vec<f32>, action: usize, reward: f32, next_state: Vec<f32>, done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// Makes a transition from the observation the action was taken on and
    /// the [`Step`] the environment returned.
    pub fn from_step(state: Vec<f32>, step: Step) -> Self {
        let done = step.is_done();
        Self::new(state, step.act, step.reward, step.obs, done)
    }

    /// `s`.
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// `a`.
    pub fn action(&self) -> usize {
        self.action
    }

    /// `r`.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// `s'`.
    pub fn next_state(&self) -> &[f32] {
        &self.next_state
    }

    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.done
    }
}
