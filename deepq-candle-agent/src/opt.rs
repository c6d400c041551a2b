//! Optimizers.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer of an action-value network.
///
/// Moment decays and epsilon keep the defaults of the optimizer crates.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// Adam with decoupled weight decay.
    AdamW {
        /// Learning rate.
        lr: f64,
        /// Weight decay.
        #[serde(default = "default_weight_decay")]
        weight_decay: f64,
    },
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// AdamW with the default weight decay.
    pub fn adamw(lr: f64) -> Self {
        Self::AdamW {
            lr,
            weight_decay: default_weight_decay(),
        }
    }

    /// Constructs the optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        let opt = match *self {
            Self::Adam { lr } => Optimizer::Adam(Adam::new(
                vars,
                ParamsAdam {
                    lr,
                    ..ParamsAdam::default()
                },
            )?),
            Self::AdamW { lr, weight_decay } => Optimizer::AdamW(AdamW::new(
                vars,
                ParamsAdamW {
                    lr,
                    weight_decay,
                    ..ParamsAdamW::default()
                },
            )?),
        };
        Ok(opt)
    }

    /// Learning rate.
    pub fn lr(&self) -> f64 {
        match *self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => lr,
        }
    }

    /// Replaces the learning rate, keeping the rest.
    pub fn learning_rate(mut self, v: f64) -> Self {
        match &mut self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => *lr = v,
        }
        self
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 0.001 }
    }
}

/// Optimizer of a network, built from [`OptimizerConfig`].
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam),

    /// AdamW optimizer.
    AdamW(AdamW),
}

impl Optimizer {
    /// Computes gradients of `loss` and updates the variables.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => opt.backward_step(loss)?,
            Self::AdamW(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::Device;

    fn minimize(config: OptimizerConfig) -> Result<f32> {
        let w = Var::new(&[3f32], &Device::Cpu)?;
        let mut opt = config.build(vec![w.clone()])?;
        for _ in 0..200 {
            let loss = w.as_tensor().sqr()?.sum_all()?;
            opt.backward_step(&loss)?;
        }
        Ok(w.as_tensor().to_vec1::<f32>()?[0])
    }

    #[test]
    fn test_optimizers_reduce_loss() -> Result<()> {
        assert!(minimize(OptimizerConfig::Adam { lr: 0.05 })?.abs() < 3.0);
        assert!(minimize(OptimizerConfig::default().learning_rate(0.05))?.abs() < 3.0);
        assert!(minimize(OptimizerConfig::adamw(0.05))?.abs() < 3.0);
        Ok(())
    }

    #[test]
    fn test_serde_optimizer_config() -> Result<()> {
        let config: OptimizerConfig = serde_yaml::from_str("Adam:\n  lr: 0.0001\n")?;
        assert_eq!(config, OptimizerConfig::Adam { lr: 0.0001 });
        assert_eq!(config.lr(), 0.0001);

        let config: OptimizerConfig = serde_yaml::from_str("AdamW:\n  lr: 0.001\n")?;
        assert_eq!(config, OptimizerConfig::adamw(0.001));
        assert_eq!(config.learning_rate(0.01).lr(), 0.01);
        Ok(())
    }
}
