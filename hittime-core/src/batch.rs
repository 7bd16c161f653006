//! Columnar hit batches.
//!
//! A batch of hits is stored as parallel vectors (`SoA` layout) rather than
//! a vector of hit structs. The equal-length invariant that the original
//! parallel-array convention left implicit is enforced here: every
//! constructor and transform keeps all columns the same length.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A batch of PMT hits in columnar layout.
///
/// The charge column is optional and fixed at construction: a batch either
/// carries a charge per hit or it does not. All columns always have equal
/// length.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitBatch {
    /// Hit times [ns].
    pub time: Vec<f64>,
    /// PMT ids (dense geometry-table id space).
    pub pmt_id: Vec<u32>,
    /// Collected charges, when the source provides them.
    pub charge: Option<Vec<f64>>,
}

impl HitBatch {
    /// Creates a new empty batch without a charge column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty batch with the given capacity and no charge column.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            pmt_id: Vec::with_capacity(capacity),
            charge: None,
        }
    }

    /// Creates an empty batch with the given capacity and a charge column.
    #[must_use]
    pub fn with_charge(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            pmt_id: Vec::with_capacity(capacity),
            charge: Some(Vec::with_capacity(capacity)),
        }
    }

    /// Builds a batch from time and id columns.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the columns differ in length.
    pub fn from_parts(time: Vec<f64>, pmt_id: Vec<u32>) -> Result<Self> {
        if time.len() != pmt_id.len() {
            return Err(Error::LengthMismatch {
                expected: time.len(),
                actual: pmt_id.len(),
            });
        }
        Ok(Self {
            time,
            pmt_id,
            charge: None,
        })
    }

    /// Builds a batch from time, id, and charge columns.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if any column differs in length.
    pub fn from_parts_with_charge(
        time: Vec<f64>,
        pmt_id: Vec<u32>,
        charge: Vec<f64>,
    ) -> Result<Self> {
        if time.len() != pmt_id.len() {
            return Err(Error::LengthMismatch {
                expected: time.len(),
                actual: pmt_id.len(),
            });
        }
        if time.len() != charge.len() {
            return Err(Error::LengthMismatch {
                expected: time.len(),
                actual: charge.len(),
            });
        }
        Ok(Self {
            time,
            pmt_id,
            charge: Some(charge),
        })
    }

    /// Returns the number of hits in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns true if the batch carries a charge column.
    #[must_use]
    pub fn has_charge(&self) -> bool {
        self.charge.is_some()
    }

    /// Clears all columns, keeping the charge layout.
    pub fn clear(&mut self) {
        self.time.clear();
        self.pmt_id.clear();
        if let Some(charge) = &mut self.charge {
            charge.clear();
        }
    }

    /// Pushes a single hit into a batch without a charge column.
    ///
    /// # Panics
    /// Panics if the batch has a charge column; use [`Self::push_charged`].
    pub fn push(&mut self, time: f64, pmt_id: u32) {
        assert!(
            self.charge.is_none(),
            "push on a batch with a charge column"
        );
        self.time.push(time);
        self.pmt_id.push(pmt_id);
    }

    /// Pushes a single hit with its charge.
    ///
    /// # Panics
    /// Panics if the batch has no charge column; use [`Self::push`].
    pub fn push_charged(&mut self, time: f64, pmt_id: u32, charge: f64) {
        let column = self
            .charge
            .as_mut()
            .expect("push_charged on a batch without a charge column");
        column.push(charge);
        self.time.push(time);
        self.pmt_id.push(pmt_id);
    }

    /// Appends all hits from another batch.
    ///
    /// # Errors
    /// Returns [`Error::ChargeLayoutMismatch`] if one batch has a charge
    /// column and the other does not.
    pub fn append(&mut self, other: &HitBatch) -> Result<()> {
        match (&mut self.charge, &other.charge) {
            (Some(dst), Some(src)) => dst.extend_from_slice(src),
            (None, None) => {}
            _ => return Err(Error::ChargeLayoutMismatch),
        }
        self.time.extend_from_slice(&other.time);
        self.pmt_id.extend_from_slice(&other.pmt_id);
        Ok(())
    }

    /// Returns a new batch containing the hits where `keep` is true,
    /// with every column masked identically.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the mask length differs from
    /// the batch length.
    pub fn select(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: keep.len(),
            });
        }
        let kept = keep.iter().filter(|&&k| k).count();
        let mut out = if self.has_charge() {
            Self::with_charge(kept)
        } else {
            Self::with_capacity(kept)
        };
        for (i, &k) in keep.iter().enumerate() {
            if !k {
                continue;
            }
            out.time.push(self.time[i]);
            out.pmt_id.push(self.pmt_id[i]);
            if let (Some(dst), Some(src)) = (&mut out.charge, &self.charge) {
                dst.push(src[i]);
            }
        }
        Ok(out)
    }

    /// Adds a constant shift to every hit time in place.
    pub fn shift_time(&mut self, delta: f64) {
        for t in &mut self.time {
            *t += delta;
        }
    }

    /// Merges per-trigger readout batches into a single event batch.
    ///
    /// Each part is a `(trigger_time, batch)` pair; hit times are offset
    /// by the trigger time relative to the first trigger, so the merged
    /// batch lives on the first trigger's time axis. An empty slice
    /// yields an empty batch.
    ///
    /// # Errors
    /// Returns [`Error::ChargeLayoutMismatch`] if the parts disagree on
    /// whether a charge column is present.
    pub fn merge_triggered(parts: &[(f64, HitBatch)]) -> Result<Self> {
        let Some((first_trigger, first)) = parts.first() else {
            return Ok(Self::new());
        };
        let total = parts.iter().map(|(_, b)| b.len()).sum();
        let mut merged = if first.has_charge() {
            Self::with_charge(total)
        } else {
            Self::with_capacity(total)
        };
        for (trigger, batch) in parts {
            let start = merged.len();
            merged.append(batch)?;
            let offset = trigger - first_trigger;
            if offset != 0.0 {
                for t in &mut merged.time[start..] {
                    *t += offset;
                }
            }
        }
        Ok(merged)
    }
}
