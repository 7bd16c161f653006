//! hittime-core: Core types for PMT hit-time processing.
//!
//! This crate provides the foundational data model shared by the geometry,
//! algorithm, and I/O crates: the columnar hit batch, 3D vectors, PMT id
//! conventions, and slice-level masking utilities.

pub mod batch;
pub mod error;
pub mod mask;
pub mod pmt;
pub mod vec3;

pub use batch::HitBatch;
pub use error::{Error, Result};
pub use mask::{non_nan_mask, time_window_mask};
pub use pmt::{is_detector_id, PmtKind, AUX_ID_MIN};
pub use vec3::Vec3;
