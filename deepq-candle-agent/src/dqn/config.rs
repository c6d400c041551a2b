use crate::{opt::OptimizerConfig, Device};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Architecture of the action-value network.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum QNetworkKind {
    /// Single dense layer.
    Linear,

    /// Multilayer perceptron.
    Mlp,

    /// Dueling network.
    Dueling,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`](super::DqnModel).
pub struct DqnModelConfig {
    /// Architecture.
    pub kind: QNetworkKind,

    /// Hidden layers. Ignored by [`QNetworkKind::Linear`].
    pub units: Vec<usize>,

    /// Hidden units of each stream of [`QNetworkKind::Dueling`].
    pub stream_units: usize,

    /// Optimizer.
    pub opt_config: OptimizerConfig,

    /// Device.
    pub device: Device,
}

impl Default for DqnModelConfig {
    fn default() -> Self {
        Self {
            kind: QNetworkKind::Mlp,
            units: vec![30, 30, 30, 30],
            stream_units: 30,
            opt_config: OptimizerConfig::default(),
            device: Device::Cpu,
        }
    }
}

impl DqnModelConfig {
    /// Sets the architecture.
    pub fn kind(mut self, v: QNetworkKind) -> Self {
        self.kind = v;
        self
    }

    /// Sets the hidden layers.
    pub fn units(mut self, v: Vec<usize>) -> Self {
        self.units = v;
        self
    }

    /// Sets the hidden units of the dueling streams.
    pub fn stream_units(mut self, v: usize) -> Self {
        self.stream_units = v;
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
