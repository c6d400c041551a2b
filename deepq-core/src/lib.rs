#![warn(missing_docs)]
//! Core of a deep Q-learning trainer.
//!
//! The crate contains the parts of DQN that do not depend on a particular
//! environment or neural network backend:
//!
//! * [`ReplayBuffer`], a fixed-capacity ring of [`Transition`]s,
//! * [`EpsilonGreedy`] action selection with a linearly decaying [`EpsilonSchedule`],
//! * [`TdTarget`], which turns a batch of transitions into regression targets,
//! * [`Trainer`], the training loop with periodic evaluation and checkpointing,
//! * [`DefaultEvaluator`], which measures the greedy policy.
//!
//! Environments and approximators are plugged in through the [`Env`] and
//! [`QFunction`] traits.
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Env, QFunction, Step, Transition};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod performance;
pub use performance::PerformanceLog;

mod policy;
pub use policy::{greedy, EpsilonGreedy, EpsilonSchedule};

mod replay_buffer;
pub use replay_buffer::{ReplayBuffer, ReplayBufferConfig};

mod run;
pub use run::RunContext;

mod target;
pub use target::{TdTarget, TransitionBatch};

mod trainer;
pub use trainer::{EpisodeEnd, Trainer, TrainerConfig};
