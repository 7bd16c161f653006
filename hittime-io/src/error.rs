//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed hit CSV content.
    #[error("{source_name}:{line}: {message}")]
    InvalidFormat {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] hittime_core::Error),
}
