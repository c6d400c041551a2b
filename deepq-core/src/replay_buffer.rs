//! Experience replay.
mod base;
mod config;
pub use base::ReplayBuffer;
pub use config::ReplayBufferConfig;
