//! Aggregation of stored records.
use super::{Record, RecordValue};
use std::collections::BTreeSet;

/// Stores records and aggregates them on demand.
///
/// Scalar values are summarized with `_min`, `_max`, `_mean` and `_median`
/// suffixed keys. For other value types the most recent value is kept.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

fn median(mut vs: Vec<f32>) -> f32 {
    vs.sort_by(|x, y| x.total_cmp(y));
    vs[vs.len() / 2]
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if no record has been stored since the last aggregation.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn keys(&self) -> BTreeSet<String> {
        self.data
            .iter()
            .flat_map(|r| r.keys().cloned())
            .collect()
    }

    fn latest(&self, key: &str) -> Option<RecordValue> {
        self.data.iter().rev().find_map(|r| r.get(key).cloned())
    }

    fn scalars(&self, key: &str) -> Vec<f32> {
        self.data
            .iter()
            .filter_map(|r| match r.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Aggregates the stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.keys() {
            match self.latest(&key) {
                Some(RecordValue::Scalar(_)) => {
                    let vs = self.scalars(&key);
                    if vs.len() == 1 {
                        record.insert(key, RecordValue::Scalar(vs[0]));
                    } else {
                        record.insert(format!("{}_min", key), RecordValue::Scalar(min(&vs)));
                        record.insert(format!("{}_max", key), RecordValue::Scalar(max(&vs)));
                        record.insert(format!("{}_mean", key), RecordValue::Scalar(mean(&vs)));
                        record.insert(format!("{}_median", key), RecordValue::Scalar(median(vs)));
                    }
                }
                Some(value) => record.insert(key, value),
                None => {}
            }
        }

        self.data.clear();
        record
    }
}
