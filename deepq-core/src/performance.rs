//! Evaluation history of a run.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Ordered `(iteration, mean_return)` pairs, one per evaluation.
///
/// Serialized as a JSON array of two-element arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceLog(Vec<(usize, f32)>);

impl PerformanceLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the result of an evaluation.
    pub fn push(&mut self, iteration: usize, mean_return: f32) {
        self.0.push((iteration, mean_return));
    }

    /// Iterates over the entries in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, (usize, f32)> {
        self.0.iter()
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no evaluation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&(usize, f32)> {
        self.0.last()
    }

    /// Writes the log to `path` in a single write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to(BufWriter::new(File::create(path)?))
    }

    /// Serializes the log into `writer` and flushes it.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a log written by [`PerformanceLog::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
