//! Location of the artifacts written by a run.
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Identifies a run and where its artifacts are written.
///
/// Checkpoints are keyed by `(identifier, iteration)` and the performance log
/// by `identifier` alone, all below `model_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    identifier: String,
    model_dir: PathBuf,
}

impl RunContext {
    /// Creates a run context.
    pub fn new(identifier: impl Into<String>, model_dir: impl AsRef<Path>) -> Self {
        Self {
            identifier: identifier.into(),
            model_dir: model_dir.as_ref().to_path_buf(),
        }
    }

    /// Identifier of the run.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Directory of the artifacts.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Path of a checkpoint without extension, `<model_dir>/<identifier>_<iteration>`.
    ///
    /// Approximators append the extension of their own format.
    pub fn checkpoint_stem(&self, iteration: usize) -> PathBuf {
        self.model_dir
            .join(format!("{}_{}", self.identifier, iteration))
    }

    /// Path of the performance log, `<model_dir>/<identifier>.json`.
    pub fn performance_log_path(&self) -> PathBuf {
        self.model_dir.join(format!("{}.json", self.identifier))
    }

    /// Creates `model_dir` if it does not exist.
    pub fn create_model_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.model_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let run = RunContext::new("cartpole_q3", "model");
        assert_eq!(
            run.checkpoint_stem(3000),
            Path::new("model").join("cartpole_q3_3000")
        );
        assert_eq!(
            run.performance_log_path(),
            Path::new("model").join("cartpole_q3.json")
        );
    }
}
