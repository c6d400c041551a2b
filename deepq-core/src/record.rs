//! Types and traits for recording training metrics.
//!
//! * [`Record`] - a container of key-value pairs
//! * [`RecordValue`] - the values a [`Record`] can hold
//! * [`Recorder`] / [`AggregateRecorder`] - destinations of records
//! * [`RecordStorage`] - aggregation of stored records
//! * [`LogRecorder`] - writes records through the `log` facade
//! * [`BufferedRecorder`] - keeps records in memory
//! * [`NullRecorder`] - discards all records
//!
//! ```rust
//! use deepq_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("iteration", RecordValue::Scalar(1000.0));
//! record.insert("mean_return", RecordValue::Scalar(21.5));
//! assert_eq!(record.get_scalar("mean_return").unwrap(), 21.5);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
