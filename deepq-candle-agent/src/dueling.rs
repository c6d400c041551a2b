//! Dueling network.
use crate::{
    mlp::{create_linear_layers, mlp_forward},
    model::SubModel1,
};
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{Linear, VarBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Dueling`].
pub struct DuelingConfig {
    in_dim: usize,
    units: Vec<usize>,
    stream_units: usize,
    out_dim: usize,
}

impl DuelingConfig {
    /// Creates configuration of a dueling network.
    ///
    /// * `units` - Hidden layers of the shared trunk, at least one.
    /// * `stream_units` - Hidden units of the value and advantage streams.
    pub fn new(in_dim: usize, units: Vec<usize>, stream_units: usize, out_dim: usize) -> Self {
        Self {
            in_dim,
            units,
            stream_units,
            out_dim,
        }
    }
}

/// Dueling architecture `Q(s, a) = V(s) + A(s, a) - mean_a' A(s, a')`.
///
/// A shared ReLU trunk feeds a value stream with a scalar output and an
/// advantage stream with one output per action. The advantages are centered
/// per row.
pub struct Dueling {
    device: Device,
    trunk: Vec<Linear>,
    value: Vec<Linear>,
    advantage: Vec<Linear>,
}

impl Dueling {
    /// Value `(batch, 1)` and advantage `(batch, n_actions)` streams.
    pub(crate) fn streams(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let xs = xs.to_device(&self.device)?;
        let h = mlp_forward(&xs, &self.trunk)?.relu()?;
        let v = mlp_forward(&h, &self.value)?;
        let a = mlp_forward(&h, &self.advantage)?;
        Ok((v, a))
    }
}

impl SubModel1 for Dueling {
    type Config = DuelingConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let (hidden, trunk_units) = match config.units.split_last() {
            Some((last, rest)) => (*last, rest),
            None => anyhow::bail!("Dueling network needs at least one hidden layer"),
        };
        let device = vb.device().clone();
        let trunk = create_linear_layers(vb.pp("trunk"), config.in_dim, trunk_units, hidden)?;
        let value = create_linear_layers(vb.pp("value"), hidden, &[config.stream_units], 1)?;
        let advantage = create_linear_layers(
            vb.pp("advantage"),
            hidden,
            &[config.stream_units],
            config.out_dim,
        )?;

        Ok(Self {
            device,
            trunk,
            value,
            advantage,
        })
    }

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let (v, a) = self.streams(xs)?;
        let a = a.broadcast_sub(&a.mean_keepdim(1)?)?;
        Ok(a.broadcast_add(&v)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn build() -> Result<Dueling> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        Dueling::build(vb, DuelingConfig::new(4, vec![30, 30], 30, 3))
    }

    #[test]
    fn test_mean_of_q_equals_value() -> Result<()> {
        let dueling = build()?;
        let xs = Tensor::randn(0f32, 1f32, (6, 4), &Device::Cpu)?;
        let q = dueling.forward(&xs)?;
        assert_eq!(q.dims(), &[6, 3]);

        let (v, _) = dueling.streams(&xs)?;
        let q_mean = q.mean(1)?.to_vec1::<f32>()?;
        let v = v.squeeze(1)?.to_vec1::<f32>()?;
        for (q, v) in q_mean.iter().zip(v.iter()) {
            assert!((q - v).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_requires_hidden_layer() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        assert!(Dueling::build(vb, DuelingConfig::new(4, vec![], 30, 3)).is_err());
    }
}
