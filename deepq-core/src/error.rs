//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum DqnError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// More transitions were requested than the buffer holds.
    #[error("Cannot sample {requested} transitions from a buffer holding {available}")]
    InsufficientTransitions {
        /// Requested batch size.
        requested: usize,
        /// Logical size of the buffer.
        available: usize,
    },

    /// A batch without any transition was given to a computation that needs one.
    #[error("Empty batch")]
    EmptyBatch,

    /// Rows or columns of batched values do not line up.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Inconsistent configuration, detected before any environment interaction.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
