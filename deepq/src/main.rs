use anyhow::{Context, Result};
use clap::Parser;
use deepq::{run, TrainingConfig};
use deepq_core::RunContext;
use log::info;
use std::path::PathBuf;

/// Train an action-value network with deep Q-learning
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the training configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Identifier of the run, defaults to the stem of the configuration file
    #[arg(short, long)]
    identifier: Option<String>,

    /// Directory of checkpoints and the performance log
    #[arg(short, long, default_value = "./model")]
    model_dir: PathBuf,
}

fn identifier(args: &Args) -> Result<String> {
    match &args.identifier {
        Some(id) => Ok(id.clone()),
        None => Ok(args
            .config
            .file_stem()
            .context("Configuration path has no file name")?
            .to_string_lossy()
            .into_owned()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = TrainingConfig::load(&args.config)
        .with_context(|| format!("Failed to load {:?}", args.config))?;
    let run_context = RunContext::new(identifier(&args)?, &args.model_dir);
    info!("{:?}", config);

    let performance = run(&config, run_context)?;
    if let Some((iteration, mean_return)) = performance.last() {
        info!("Final evaluation at iteration {}: {}", iteration, mean_return);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_defaults_to_stem() -> Result<()> {
        let args = Args::parse_from(["deepq", "--config", "deepq/config/cartpole_q1.yaml"]);
        assert_eq!(identifier(&args)?, "cartpole_q1");
        assert_eq!(args.model_dir, PathBuf::from("./model"));

        let args = Args::parse_from(["deepq", "-c", "q1.yaml", "-i", "run0", "-m", "/tmp/m"]);
        assert_eq!(identifier(&args)?, "run0");
        Ok(())
    }
}
