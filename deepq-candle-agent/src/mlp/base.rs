use super::{create_linear_layers, mlp_forward, MlpConfig};
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{Linear, VarBuilder};

/// Multilayer perceptron with ReLU activation function.
pub struct Mlp {
    device: Device,
    layers: Vec<Linear>,
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let xs = xs.to_device(&self.device)?;
        mlp_forward(&xs, &self.layers)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vb.device().clone();
        let layers = create_linear_layers(vb.pp("mlp"), config.in_dim, &config.units, config.out_dim)?;
        Ok(Self { device, layers })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn build(units: Vec<usize>) -> Result<(VarMap, Mlp)> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, MlpConfig::new(4, units, 2))?;
        Ok((varmap, mlp))
    }

    #[test]
    fn test_output_shape() -> Result<()> {
        let xs = Tensor::zeros((5, 4), DType::F32, &Device::Cpu)?;
        for units in [vec![], vec![30, 30, 30, 30]] {
            let (_, mlp) = build(units)?;
            assert_eq!(mlp.forward(&xs)?.dims(), &[5, 2]);
        }
        Ok(())
    }

    #[test]
    fn test_number_of_variables() -> Result<()> {
        // weight and bias per layer
        let (varmap, _) = build(vec![])?;
        assert_eq!(varmap.all_vars().len(), 2);
        let (varmap, _) = build(vec![8, 8])?;
        assert_eq!(varmap.all_vars().len(), 6);
        Ok(())
    }
}
