//! Multilayer perceptron.
mod base;
mod config;
use anyhow::Result;
pub use base::Mlp;
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
pub use config::MlpConfig;

/// Linear layers mapping `in_dim` through `units`, the last one to `out_dim`.
pub(crate) fn create_linear_layers(
    vb: VarBuilder,
    in_dim: usize,
    units: &[usize],
    out_dim: usize,
) -> Result<Vec<Linear>> {
    let dims = std::iter::once(in_dim)
        .chain(units.iter().copied())
        .chain(std::iter::once(out_dim))
        .collect::<Vec<_>>();

    dims.windows(2)
        .enumerate()
        .map(|(i, d)| Ok(linear(d[0], d[1], vb.pp(format!("ln{}", i)))?))
        .collect()
}

/// Applies the layers with ReLU between them and no activation at the end.
pub(crate) fn mlp_forward(xs: &Tensor, layers: &[Linear]) -> Result<Tensor> {
    let mut xs = xs.clone();
    for (i, layer) in layers.iter().enumerate() {
        xs = layer.forward(&xs)?;
        if i + 1 < layers.len() {
            xs = xs.relu()?;
        }
    }
    Ok(xs)
}
