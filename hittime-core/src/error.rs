//! Error types for hittime-core.

use thiserror::Error;

/// Result type alias for hittime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for hittime operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Parallel arrays (or a mask) with unequal lengths.
    #[error("parallel array length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Batches with and without a charge column cannot be combined.
    #[error("cannot combine batches with mixed charge layouts")]
    ChargeLayoutMismatch,

    /// A PMT kind string that is neither "large" nor "small".
    #[error("unknown PMT kind: {0:?}")]
    UnknownPmtKind(String),
}
