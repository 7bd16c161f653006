//! Hit selection, TOF correction and the combined alignment pipeline.

use hittime_core::{is_detector_id, non_nan_mask, time_window_mask, HitBatch, PmtKind, Vec3};
use hittime_geometry::{expected_tof_batch, OpticalModel, PmtTable};
use rayon::prelude::*;

use crate::align::{alignment_shift, AlignConfig};
use crate::error::Result;

/// Selection criteria for [`select_pmts`].
///
/// The default filter keeps every detector PMT; setting a kind or a
/// manufacturer narrows the selection to PMTs the geometry table maps
/// to that value. Hits on PMTs the table does not know are dropped by
/// such a filter, never misclassified.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PmtFilter {
    pub kind: Option<PmtKind>,
    pub manufacturer: Option<String>,
}

impl PmtFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PmtKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }
}

/// Keeps the hits that pass the filter.
///
/// Auxiliary-channel ids are dropped unconditionally, then the kind
/// and manufacturer criteria are applied in that order. All batch
/// columns are masked identically.
///
/// # Errors
/// Returns an error when the batch columns disagree in length.
pub fn select_pmts(batch: &HitBatch, table: &PmtTable, filter: &PmtFilter) -> Result<HitBatch> {
    let keep: Vec<bool> = batch
        .pmt_id
        .iter()
        .map(|&id| {
            if !is_detector_id(id) {
                return false;
            }
            if let Some(kind) = filter.kind {
                if table.kind(id) != Some(kind) {
                    return false;
                }
            }
            if let Some(tag) = &filter.manufacturer {
                if table.manufacturer(id) != Some(tag.as_str()) {
                    return false;
                }
            }
            true
        })
        .collect();
    Ok(batch.select(&keep)?)
}

/// Keeps the hits whose time lies in `[t_min, t_max]`. Either bound may
/// be `None` for a one-sided window; NaN times never pass.
///
/// # Errors
/// Returns an error when the batch columns disagree in length.
pub fn select_time(batch: &HitBatch, t_min: Option<f64>, t_max: Option<f64>) -> Result<HitBatch> {
    let keep = time_window_mask(&batch.time, t_min, t_max);
    Ok(batch.select(&keep)?)
}

/// Drops every hit with a NaN in any float column (time, and charge
/// when the batch carries one).
///
/// # Errors
/// Returns an error when the batch columns disagree in length.
pub fn remove_invalid(batch: &HitBatch) -> Result<HitBatch> {
    let keep = match &batch.charge {
        Some(charge) => non_nan_mask(&[&batch.time, charge])?,
        None => non_nan_mask(&[&batch.time])?,
    };
    Ok(batch.select(&keep)?)
}

/// Subtracts the expected TOF from each hit time, on a copy.
///
/// Hits on PMTs without a known position keep their time unchanged; the
/// per-id lookup reports a zero TOF for them.
#[must_use]
pub fn correct_tof(
    batch: &HitBatch,
    table: &PmtTable,
    model: &OpticalModel,
    event_pos: Vec3,
) -> HitBatch {
    let tof = expected_tof_batch(table, model, &batch.pmt_id, event_pos);
    let mut corrected = batch.clone();
    for (t, tof) in corrected.time.iter_mut().zip(&tof) {
        *t -= tof;
    }
    corrected
}

/// Runs the full pipeline on one event batch: PMT selection, TOF
/// correction, NaN removal, then leading-edge alignment.
///
/// Returns the aligned batch and the shift that was applied to its
/// times.
///
/// # Errors
/// Returns an error when the batch columns disagree in length or when
/// the surviving times cannot anchor an alignment (empty, non-finite,
/// or too narrow a span).
pub fn correct_and_align(
    batch: &HitBatch,
    table: &PmtTable,
    model: &OpticalModel,
    event_pos: Vec3,
    filter: &PmtFilter,
    config: &AlignConfig,
) -> Result<(HitBatch, f64)> {
    let selected = select_pmts(batch, table, filter)?;
    let corrected = correct_tof(&selected, table, model, event_pos);
    let mut cleaned = remove_invalid(&corrected)?;
    let shift = alignment_shift(&cleaned.time, config)?;
    cleaned.shift_time(shift);
    Ok((cleaned, shift))
}

/// Runs [`correct_and_align`] over independent event batches in
/// parallel, one event position per batch.
///
/// # Errors
/// Returns an error when `batches` and `event_positions` disagree in
/// length, or the first per-event error encountered.
pub fn correct_and_align_batches(
    batches: &[HitBatch],
    table: &PmtTable,
    model: &OpticalModel,
    event_positions: &[Vec3],
    filter: &PmtFilter,
    config: &AlignConfig,
) -> Result<Vec<(HitBatch, f64)>> {
    if batches.len() != event_positions.len() {
        return Err(hittime_core::Error::LengthMismatch {
            expected: batches.len(),
            actual: event_positions.len(),
        }
        .into());
    }
    batches
        .par_iter()
        .zip(event_positions.par_iter())
        .map(|(batch, &pos)| correct_and_align(batch, table, model, pos, filter, config))
        .collect()
}
