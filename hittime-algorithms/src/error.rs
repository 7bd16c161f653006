//! Error types for hittime-algorithms.

use thiserror::Error;

/// Result type alias for algorithm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Algorithm error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A histogram needs at least one bin.
    #[error("histogram bin count must be at least 1")]
    ZeroBins,

    /// A histogram range must be finite with max above min.
    #[error("invalid histogram range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// Smoothing windows must be odd and nonzero.
    #[error("smoothing window length {window_length} must be odd and nonzero")]
    InvalidWindow { window_length: usize },

    /// The smoothing window cannot exceed the data length.
    #[error("smoothing window length {window_length} exceeds data length {len}")]
    WindowTooLarge { window_length: usize, len: usize },

    /// The polynomial order must be below the window length.
    #[error("polynomial order {polyorder} must be less than window length {window_length}")]
    InvalidPolyOrder {
        polyorder: usize,
        window_length: usize,
    },

    /// The polynomial fit produced a singular system.
    #[error("polynomial fit produced a singular system")]
    SingularFit,

    /// Alignment needs a non-empty input.
    #[error("alignment input is empty")]
    EmptyInput,

    /// Alignment input must be finite.
    #[error("hit times contain NaN or infinite values")]
    NonFiniteInput,

    /// The truncated data range spans less than one unit-width bin.
    #[error("alignment range [{min}, {max}] spans less than one bin")]
    EmptyRange { min: f64, max: f64 },

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] hittime_core::Error),
}
