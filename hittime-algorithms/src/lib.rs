//! hittime-algorithms: histogramming, peak finding, and alignment.
//!
//! The pipeline this crate implements turns raw PMT hit times into
//! peak-aligned hit-time distributions:
//!
//! 1. filter the batch ([`select_pmts`], [`select_time`], [`remove_invalid`]);
//! 2. subtract the expected time-of-flight ([`correct_tof`]);
//! 3. histogram, smooth, and locate the first significant peak, then
//!    shift the leading edge onto a canonical offset ([`align`]).
//!
//! [`correct_and_align`] composes the whole chain for one batch;
//! [`correct_and_align_batches`] runs independent batches in parallel.

pub mod align;
pub mod error;
pub mod histogram;
pub mod peaks;
pub mod processing;
pub mod savgol;

pub use align::{align, alignment_shift, AlignConfig};
pub use error::{Error, Result};
pub use histogram::Histogram;
pub use peaks::{find_peak_indices, peak_prominence};
pub use processing::{
    correct_and_align, correct_and_align_batches, correct_tof, remove_invalid, select_pmts,
    select_time, PmtFilter,
};
pub use savgol::{savgol_coefficients, savgol_filter};
