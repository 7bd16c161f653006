//! Leading-edge alignment of hit-time distributions.
//!
//! After TOF correction the prompt-light cluster of an event still sits
//! at an arbitrary absolute time. Alignment histograms the times in
//! unit-width bins, smooths the histogram, locates the first prominent
//! peak, walks back to the leading edge of that peak and shifts the
//! times so the edge lands at a fixed small offset. Events aligned this
//! way can be overlaid or fed to waveform templates that expect the
//! signal to start near zero.

use crate::error::{Error, Result};
use crate::histogram::Histogram;

/// Histogram ranges are clamped to this many ns on either side of zero
/// before binning, so a stray far-out time cannot allocate an absurd
/// number of bins.
const RANGE_CLAMP_NS: f64 = 100_000.0;

/// Smoothing window applied to the time histogram before peak search.
const SMOOTH_WINDOW: usize = 5;
const SMOOTH_POLYORDER: usize = 3;

/// Knobs for the alignment search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlignConfig {
    /// Minimum prominence for a histogram peak to anchor the alignment.
    pub prominence: f64,
    /// Fraction of the peak height at which the leading edge is taken.
    pub max_ratio: f64,
    /// Time (ns) the leading edge is moved to.
    pub offset: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            prominence: 20.0,
            max_ratio: 0.1,
            offset: 2.0,
        }
    }
}

impl AlignConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prominence(mut self, prominence: f64) -> Self {
        self.prominence = prominence;
        self
    }

    #[must_use]
    pub fn with_max_ratio(mut self, max_ratio: f64) -> Self {
        self.max_ratio = max_ratio;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Computes the time shift that brings the leading edge of the first
/// prominent peak to `config.offset`.
///
/// The times are histogrammed in unit-width bins over their truncated
/// span, smoothed, and searched for peaks at the configured prominence.
/// When no peak qualifies the tallest bin anchors the search instead; a
/// warning is logged but the shift is still produced. From the anchor
/// the edge finder walks toward earlier bins while the smoothed count
/// stays at or above `max_ratio` times the anchor height; the leading
/// edge is half a bin before the stopping bin's center.
///
/// # Errors
/// Returns an error when `times` is empty or contains non-finite
/// values, or when the truncated span covers less than one bin or is
/// too narrow to smooth.
pub fn alignment_shift(times: &[f64], config: &AlignConfig) -> Result<f64> {
    if times.is_empty() {
        return Err(Error::EmptyInput);
    }
    if times.iter().any(|t| !t.is_finite()) {
        return Err(Error::NonFiniteInput);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &t in times {
        min = min.min(t);
        max = max.max(t);
    }
    let lo = min.trunc().max(-RANGE_CLAMP_NS);
    let hi = max.trunc().min(RANGE_CLAMP_NS);
    let bins = hi - lo;
    if bins < 1.0 {
        return Err(Error::EmptyRange { min: lo, max: hi });
    }

    let mut hist = Histogram::new(bins as usize, lo, hi)?;
    hist.fill(times);
    hist.smooth(SMOOTH_WINDOW, SMOOTH_POLYORDER)?;

    let peaks = hist.peak_bin_indices(config.prominence);
    let anchor = if let Some(&first) = peaks.first() {
        first
    } else {
        log::warn!(
            "no histogram peak with prominence >= {} over {} bins, anchoring on the tallest bin",
            config.prominence,
            hist.bin_count()
        );
        hist.max_bin_index()
    };

    let anchor_value = hist.value(anchor);
    let mut edge = anchor;
    while edge > 0 && hist.value(edge) >= config.max_ratio * anchor_value {
        edge -= 1;
    }

    let leading_edge = hist.center(edge) - 0.5;
    Ok(-leading_edge + config.offset)
}

/// Shifts `times` by [`alignment_shift`] and returns the aligned copy
/// together with the shift that was applied.
///
/// # Errors
/// Propagates the errors of [`alignment_shift`].
pub fn align(times: &[f64], config: &AlignConfig) -> Result<(Vec<f64>, f64)> {
    let shift = alignment_shift(times, config)?;
    let aligned = times.iter().map(|t| t + shift).collect();
    Ok((aligned, shift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn clustered_times() -> Vec<f64> {
        // One stray early hit, a 120-hit cluster around 101.5 and a
        // stray late hit that stretches the histogram range.
        let mut times = vec![0.5];
        times.extend_from_slice(&[100.5; 30]);
        times.extend_from_slice(&[101.5; 60]);
        times.extend_from_slice(&[102.5; 30]);
        times.push(150.2);
        times
    }

    #[test]
    fn test_config_builders() {
        let config = AlignConfig::new()
            .with_prominence(5.0)
            .with_max_ratio(0.25)
            .with_offset(0.0);
        assert_relative_eq!(config.prominence, 5.0);
        assert_relative_eq!(config.max_ratio, 0.25);
        assert_relative_eq!(config.offset, 0.0);
        let default = AlignConfig::default();
        assert_relative_eq!(default.prominence, 20.0);
        assert_relative_eq!(default.max_ratio, 0.1);
        assert_relative_eq!(default.offset, 2.0);
    }

    #[test]
    fn test_shift_from_prominent_peak() {
        // Smoothed cluster: bins 99..=103 hold [6, 33, 50, 33, 6]; the
        // 0.1 ratio walk from the apex at 101 stops on bin 98, so the
        // leading edge is 98.0 and the shift moves it to +2.
        let times = clustered_times();
        let shift = alignment_shift(&times, &AlignConfig::default()).unwrap();
        assert_relative_eq!(shift, -96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_align_returns_shifted_copy() {
        let times = clustered_times();
        let (aligned, shift) = align(&times, &AlignConfig::default()).unwrap();
        assert_eq!(aligned.len(), times.len());
        for (a, t) in aligned.iter().zip(&times) {
            assert_relative_eq!(*a, t + shift, epsilon = 1e-12);
        }
        assert_relative_eq!(aligned[1], 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_sparse_input_falls_back_to_tallest_bin() {
        // Four isolated hits never reach the default prominence, so the
        // anchor falls back to the tallest (first) bin: its center is
        // 40.5, the leading edge 40.0, and the shift -38.
        let times = vec![40.0, 42.0, 43.0, 190.0];
        let shift = alignment_shift(&times, &AlignConfig::default()).unwrap();
        assert_relative_eq!(shift, -38.0, epsilon = 1e-9);
        let (aligned, _) = align(&times, &AlignConfig::default()).unwrap();
        let expected = [2.0, 4.0, 5.0, 152.0];
        for (a, e) in aligned.iter().zip(&expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_range_is_clamped_to_bound() {
        let config = AlignConfig::default();
        // Both hits sit beyond the clamp, so the histogram spans the
        // full [-100000, 100000] window with every count dropped and
        // the fallback anchors on bin 0 at the lower clamp edge.
        let times = vec![-250_000.0, 250_000.0];
        let shift = alignment_shift(&times, &config).unwrap();
        assert_relative_eq!(shift, 100_002.0, epsilon = 1e-9);
        // Only the upper edge is pinned: the range becomes
        // [99990, 100000], the late cluster lands outside it and the
        // one surviving hit in bin 0 sets the leading edge at 99990.
        let times = vec![99_990.0, 150_000.0, 150_001.0, 150_002.5];
        let shift = alignment_shift(&times, &config).unwrap();
        assert_relative_eq!(shift, -99_988.0, epsilon = 1e-9);
    }

    #[test]
    fn test_range_truncates_toward_zero() {
        // A fractional negative minimum truncates to -5, not -6: bin 0
        // covers [-5, -4) and holds the two -4.x hits while the stray
        // -5.5 falls below the range. The leading edge is -5, so the
        // shift is 5 + offset.
        let times = vec![-5.5, -4.2, -4.1, 3.9];
        let shift = alignment_shift(&times, &AlignConfig::default()).unwrap();
        assert_relative_eq!(shift, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_and_non_finite_inputs() {
        let config = AlignConfig::default();
        assert!(matches!(alignment_shift(&[], &config), Err(Error::EmptyInput)));
        assert!(matches!(
            alignment_shift(&[1.0, f64::NAN, 3.0], &config),
            Err(Error::NonFiniteInput)
        ));
        assert!(matches!(
            alignment_shift(&[1.0, f64::INFINITY], &config),
            Err(Error::NonFiniteInput)
        ));
    }

    #[test]
    fn test_degenerate_span() {
        let config = AlignConfig::default();
        // All times truncate to the same integer: no bins at all.
        assert!(matches!(
            alignment_shift(&[5.1, 5.2, 5.9], &config),
            Err(Error::EmptyRange { .. })
        ));
        // A span narrower than the smoothing window propagates the
        // filter error.
        assert!(matches!(
            alignment_shift(&[0.5, 3.5], &config),
            Err(Error::WindowTooLarge { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let times = clustered_times();
        let config = AlignConfig::default();
        let first = alignment_shift(&times, &config).unwrap();
        let second = alignment_shift(&times, &config).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
