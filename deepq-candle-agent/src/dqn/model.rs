use super::DqnModelConfig;
use crate::{model::SubModel1, opt::Optimizer, util::rows_to_tensor};
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use deepq_core::{error::DqnError, record::Record, QFunction, RunContext};
use log::info;
use std::path::{Path, PathBuf};

/// Action-value network owning its parameters and optimizer.
///
/// `fit` minimizes the mean squared error over all action columns, one
/// optimizer step per mini-batch, for a single pass over the data.
/// Checkpoints are safetensors files written from the [`VarMap`].
pub struct DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    device: Device,
    varmap: VarMap,

    // Action-value function
    q: Q,

    // Optimizer
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    /// Constructs [`DqnModel`].
    pub fn build(q_config: Q::Config, config: &DqnModelConfig) -> Result<Self> {
        let device: Device = config.device.try_into()?;
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            q,
            opt,
        })
    }

    /// Outputs the action values of a batch of observations.
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Parameters of the network.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters saved by [`DqnModel::save`].
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load dqnmodel from {:?}", path.as_ref());
        Ok(())
    }
}

impl<Q> QFunction for DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if obs.is_empty() {
            return Ok(vec![]);
        }
        let xs = rows_to_tensor(obs, &self.device)?;
        Ok(self.forward(&xs)?.to_vec2::<f32>()?)
    }

    fn fit(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>], batch_size: usize) -> Result<Record> {
        if obs.is_empty() {
            return Err(DqnError::EmptyBatch.into());
        }
        if obs.len() != targets.len() {
            return Err(DqnError::ShapeMismatch(format!(
                "{} observations and {} targets",
                obs.len(),
                targets.len()
            ))
            .into());
        }

        let batch_size = match batch_size {
            0 => obs.len(),
            n => n.min(obs.len()),
        };
        let mut loss_sum = 0f32;
        for (xs, ys) in obs.chunks(batch_size).zip(targets.chunks(batch_size)) {
            let xs = rows_to_tensor(xs, &self.device)?;
            let ys = rows_to_tensor(ys, &self.device)?;
            let pred = self.forward(&xs)?;
            let loss = candle_nn::loss::mse(&pred, &ys)?;
            self.opt.backward_step(&loss)?;
            loss_sum += loss.to_scalar::<f32>()? * xs.dims()[0] as f32;
        }

        Ok(Record::from_scalar("loss", loss_sum / obs.len() as f32))
    }

    fn save_checkpoint(&self, run: &RunContext, iteration: usize) -> Result<PathBuf> {
        let mut path = run.checkpoint_stem(iteration).into_os_string();
        path.push(".safetensors");
        let path = PathBuf::from(path);
        self.save(&path)?;
        Ok(path)
    }
}
