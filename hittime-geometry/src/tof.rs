//! Table-level time-of-flight with the zero fallback.

use crate::optics::OpticalModel;
use crate::table::PmtTable;
use hittime_core::Vec3;
use rayon::prelude::*;

/// Batches at least this large are mapped in parallel.
const PARALLEL_THRESHOLD: usize = 16 * 1024;

/// Expected time-of-flight for one PMT id, in nanoseconds.
///
/// Ids with unknown geometry get a TOF of exactly 0, as does any
/// degenerate geometry whose raw value is NaN. Callers should be aware
/// that unknown PMTs therefore silently receive no correction rather
/// than being rejected; filter the batch first when rejection is wanted.
#[must_use]
pub fn expected_tof(table: &PmtTable, model: &OpticalModel, id: u32, event_pos: Vec3) -> f64 {
    let Some(pmt_pos) = table.position(id) else {
        return 0.0;
    };
    let tof = model.time_of_flight(pmt_pos, event_pos);
    if tof.is_nan() {
        0.0
    } else {
        tof
    }
}

/// Expected time-of-flight for a batch of PMT ids.
///
/// Empty input yields empty output. Large batches are mapped with rayon;
/// the result order always matches the input order.
#[must_use]
pub fn expected_tof_batch(
    table: &PmtTable,
    model: &OpticalModel,
    ids: &[u32],
    event_pos: Vec3,
) -> Vec<f64> {
    if ids.len() >= PARALLEL_THRESHOLD {
        ids.par_iter()
            .map(|&id| expected_tof(table, model, id, event_pos))
            .collect()
    } else {
        ids.iter()
            .map(|&id| expected_tof(table, model, id, event_pos))
            .collect()
    }
}
