//! Classic-control environments.
//!
//! [`ClassicEnv`] implements [`deepq_core::Env`] for the environments listed
//! below, selected by the `id` of [`ClassicEnvConfig`]:
//!
//! | id | actions | observation | step limit |
//! |---|---|---|---|
//! | `CartPole-v0` | push left, push right | `[x, x_dot, theta, theta_dot]` | 200 |
//! | `CartPole-v1` | push left, push right | `[x, x_dot, theta, theta_dot]` | 500 |
//! | `MountainCar-v0` | push left, none, push right | `[position, velocity]` | 200 |
//!
//! Episodes reaching the step limit are reported as truncated.
mod base;
mod cartpole;
mod config;
mod mountain_car;
pub use base::ClassicEnv;
pub use cartpole::CartPole;
pub use config::ClassicEnvConfig;
pub use mountain_car::MountainCar;
