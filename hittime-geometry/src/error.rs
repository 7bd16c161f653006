//! Error types for hittime-geometry.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Geometry error types.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a description or config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed line in a geometry description file.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// No description files were supplied at all.
    #[error("no geometry description files supplied")]
    NoGeometryFiles,

    /// Invalid optical model constants.
    #[error("optical model error: {0}")]
    Config(String),

    /// Malformed optical model JSON.
    #[error("optical model JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] hittime_core::Error),
}
