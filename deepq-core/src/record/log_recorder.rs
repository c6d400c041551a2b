use super::{AggregateRecorder, Record, RecordStorage, Recorder};
use log::info;

/// Writes records through the `log` facade at `info` level.
///
/// Stored records are aggregated by [`RecordStorage`] and written on
/// [`AggregateRecorder::flush`].
#[derive(Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", record);
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if !self.storage.is_empty() {
            info!("iteration {}: {}", step, self.storage.aggregate());
        }
    }
}
