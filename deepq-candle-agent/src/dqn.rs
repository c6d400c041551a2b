//! Action-value networks for DQN.
mod config;
mod model;
use crate::{
    dueling::{Dueling, DuelingConfig},
    mlp::{Mlp, MlpConfig},
};
use anyhow::Result;
pub use config::{DqnModelConfig, QNetworkKind};
use deepq_core::QFunction;
use log::info;
pub use model::DqnModel;

/// Builds the action-value network selected by `config.kind`.
///
/// * `Linear` - a single dense layer `obs_dim -> n_actions`
/// * `Mlp` - ReLU hidden layers of `config.units`
/// * `Dueling` - a trunk of `config.units` with value and advantage streams
///   of `config.stream_units` hidden units
pub fn build_q_network(
    config: &DqnModelConfig,
    obs_dim: usize,
    n_actions: usize,
) -> Result<Box<dyn QFunction>> {
    info!(
        "Build {:?} network: obs_dim = {}, n_actions = {}, units = {:?}",
        config.kind, obs_dim, n_actions, config.units
    );

    Ok(match config.kind {
        QNetworkKind::Linear => Box::new(DqnModel::<Mlp>::build(
            MlpConfig::new(obs_dim, vec![], n_actions),
            config,
        )?),
        QNetworkKind::Mlp => Box::new(DqnModel::<Mlp>::build(
            MlpConfig::new(obs_dim, config.units.clone(), n_actions),
            config,
        )?),
        QNetworkKind::Dueling => Box::new(DqnModel::<Dueling>::build(
            DuelingConfig::new(obs_dim, config.units.clone(), config.stream_units, n_actions),
            config,
        )?),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build_each_kind() -> Result<()> {
        for kind in [QNetworkKind::Linear, QNetworkKind::Mlp, QNetworkKind::Dueling] {
            let config = DqnModelConfig::default().kind(kind);
            let q = build_q_network(&config, 4, 2)?;
            let values = q.predict(&[vec![0.0, 0.1, 0.2, 0.3], vec![1.0, 1.0, 1.0, 1.0]])?;
            assert_eq!(values.len(), 2);
            assert!(values.iter().all(|row| row.len() == 2));
        }
        Ok(())
    }
}
