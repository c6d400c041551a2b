//! Configuration of [`ClassicEnv`](super::ClassicEnv).
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Configuration of [`ClassicEnv`](super::ClassicEnv).
pub struct ClassicEnvConfig {
    pub(super) id: String,

    /// Overrides the step limit of the environment id.
    pub(super) max_steps: Option<usize>,
}

impl Default for ClassicEnvConfig {
    fn default() -> Self {
        Self {
            id: "CartPole-v0".to_string(),
            max_steps: None,
        }
    }
}

impl ClassicEnvConfig {
    /// Set the id of the environment.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// The id of the environment.
    pub fn get_id(&self) -> &str {
        &self.id
    }
}
