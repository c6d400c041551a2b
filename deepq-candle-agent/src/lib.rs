//! Action-value networks implemented with [candle](https://crates.io/crates/candle-core).
//!
//! [`DqnModel`](dqn::DqnModel) implements [`deepq_core::QFunction`] on top of
//! a [`SubModel1`](model::SubModel1): a linear map, an [`Mlp`](mlp::Mlp) or a
//! [`Dueling`](dueling::Dueling) network. [`build_q_network`](dqn::build_q_network)
//! picks one of them from [`DqnModelConfig`](dqn::DqnModelConfig).
pub mod dqn;
pub mod dueling;
pub mod mlp;
pub mod model;
pub mod opt;
mod util;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
