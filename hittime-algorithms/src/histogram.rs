//! Fixed-range 1D histogram used by the alignment engine.

use crate::error::{Error, Result};
use crate::peaks::find_peak_indices;
use crate::savgol::savgol_filter;

/// A histogram with uniform bins over a fixed closed range.
///
/// Bin `i` covers the half-open interval `[edge_i, edge_{i+1})`, except
/// for the last bin which also includes the upper range bound. Counts
/// are stored as floats so the histogram can be smoothed and normalized
/// in place after filling.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<f64>,
}

impl Histogram {
    /// Creates an empty histogram with `bins` uniform bins over
    /// `[min, max]`.
    ///
    /// # Errors
    /// Returns an error when `bins` is zero or the range is non-finite
    /// or inverted.
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::ZeroBins);
        }
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidRange { min, max });
        }
        let width = (max - min) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
        // Pin the last edge so the closed upper bound is exact.
        edges[bins] = max;
        Ok(Self {
            edges,
            counts: vec![0.0; bins],
        })
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    #[must_use]
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Returns the bin index containing `x`, or `None` when `x` is NaN
    /// or outside the range.
    #[must_use]
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        if !(x >= self.min() && x <= self.max()) {
            return None;
        }
        let bins = self.counts.len();
        let span = self.max() - self.min();
        let mut idx = ((x - self.min()) / span * bins as f64) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        // Rounding in the scaled index can land one bin off; settle
        // against the actual edges.
        if idx > 0 && x < self.edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && x >= self.edges[idx + 1] {
            idx += 1;
        }
        Some(idx)
    }

    /// Returns the center of bin `idx`.
    ///
    /// # Panics
    /// Panics when `idx` is out of range.
    #[must_use]
    pub fn center(&self, idx: usize) -> f64 {
        (self.edges[idx] + self.edges[idx + 1]) / 2.0
    }

    /// Returns the count in bin `idx`.
    ///
    /// # Panics
    /// Panics when `idx` is out of range.
    #[must_use]
    pub fn value(&self, idx: usize) -> f64 {
        self.counts[idx]
    }

    /// Replaces the counts with a fresh tally of `values`. NaN values
    /// and values outside the range are dropped.
    pub fn fill(&mut self, values: &[f64]) {
        self.counts.iter_mut().for_each(|c| *c = 0.0);
        for &v in values {
            if let Some(idx) = self.bin_index(v) {
                self.counts[idx] += 1.0;
            }
        }
    }

    /// Sum of count times bin width over all bins.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(c, e)| c * (e[1] - e[0]))
            .sum()
    }

    /// Scales the counts so the integral equals `factor`. A zero
    /// integral leaves the counts at zero.
    pub fn normalize(&mut self, factor: f64) {
        let integral = self.integral();
        if integral == 0.0 {
            return;
        }
        for c in &mut self.counts {
            *c = *c / integral * factor;
        }
    }

    /// Smooths the counts with a Savitzky-Golay filter, then rounds
    /// each count up to the next integer and clamps negatives to zero.
    ///
    /// The rounding keeps isolated single counts visible to the peak
    /// search instead of letting the filter dilute them below the
    /// prominence threshold.
    ///
    /// # Errors
    /// Propagates the filter's window validation errors.
    pub fn smooth(&mut self, window_length: usize, polyorder: usize) -> Result<()> {
        let smoothed = savgol_filter(&self.counts, window_length, polyorder)?;
        self.counts = smoothed
            .into_iter()
            .map(|v| {
                let v = v.ceil();
                if v < 0.0 {
                    0.0
                } else {
                    v
                }
            })
            .collect();
        Ok(())
    }

    /// Indices of local maxima with prominence at or above the
    /// threshold, ascending.
    #[must_use]
    pub fn peak_bin_indices(&self, prominence: f64) -> Vec<usize> {
        find_peak_indices(&self.counts, prominence)
    }

    /// Index of the tallest bin, first occurrence on ties.
    #[must_use]
    pub fn max_bin_index(&self) -> usize {
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        best
    }
}
