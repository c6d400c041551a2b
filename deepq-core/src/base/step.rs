//! Environment step.

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`.
///
/// An environment emits [`Step`] object at every interaction steps.
/// Together with the observation `o_t` kept by the caller, it makes a
/// [`Transition`](crate::Transition).
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Action.
    pub act: usize,

    /// Observation.
    pub obs: Vec<f32>,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated.
    pub is_truncated: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(
        act: usize,
        obs: Vec<f32>,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
