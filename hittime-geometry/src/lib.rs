//! hittime-geometry: PMT geometry tables and time-of-flight.
//!
//! Builds an immutable per-PMT lookup table (position, kind, manufacturer)
//! from plain-text geometry description files and computes the expected
//! photon time-of-flight from an event position to each PMT through the
//! two detector media.
//!
//! The table is constructed once at startup and then shared read-only;
//! construction failures (missing or malformed description files) surface
//! immediately as errors rather than during later lookups.

pub mod error;
pub mod optics;
pub mod parser;
pub mod table;
pub mod tof;

pub use error::{Error, Result};
pub use optics::OpticalModel;
pub use parser::{read_manufacturer_table, read_position_table, ManufacturerRecord, PositionRecord};
pub use table::{GeometryFiles, PmtTable, TableStats};
pub use tof::{expected_tof, expected_tof_batch};
