//! Local maxima detection with prominence filtering.
//!
//! A peak is a sample strictly higher than its neighbors; a plateau of
//! equal samples bounded by lower ones counts once, at its middle index.
//! The first and last samples are never peaks. Prominence measures how
//! far a peak rises above the higher of the two valleys separating it
//! from taller terrain, which filters noise ripples without any
//! smoothing assumptions.

/// Measures the prominence of the peak at `peak`.
///
/// Walks outward in both directions until a strictly higher sample or
/// the signal edge is reached, recording the lowest sample seen on each
/// side. The prominence is the peak height minus the higher of the two
/// minima.
#[must_use]
pub fn peak_prominence(values: &[f64], peak: usize) -> f64 {
    let peak_value = values[peak];

    let mut left_min = peak_value;
    let mut i = peak;
    loop {
        if values[i] > peak_value {
            break;
        }
        if values[i] < left_min {
            left_min = values[i];
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = peak_value;
    let mut i = peak;
    while i < values.len() && values[i] <= peak_value {
        if values[i] < right_min {
            right_min = values[i];
        }
        i += 1;
    }

    peak_value - left_min.max(right_min)
}

/// Finds the indices of all local maxima with prominence at or above
/// `min_prominence`, in ascending order.
///
/// Plateaus report their middle index, rounded down for an even run. An
/// empty or short signal, or one with no interior maxima, yields an
/// empty vector.
#[must_use]
pub fn find_peak_indices(values: &[f64], min_prominence: f64) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }

    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            // Scan across a possible plateau of equal samples.
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                let midpoint = (i + ahead - 1) / 2;
                if peak_prominence(values, midpoint) >= min_prominence {
                    peaks.push(midpoint);
                }
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_peak() {
        let values = vec![0.0, 1.0, 3.0, 1.0, 0.0];
        assert_eq!(find_peak_indices(&values, 0.0), vec![2]);
    }

    #[test]
    fn test_plateau_reports_middle_index() {
        let values = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(find_peak_indices(&values, 0.0), vec![2]);
        // An even plateau rounds down.
        let values = vec![0.0, 2.0, 2.0, 0.0];
        assert_eq!(find_peak_indices(&values, 0.0), vec![1]);
    }

    #[test]
    fn test_edges_are_never_peaks() {
        let values = vec![3.0, 1.0, 0.0, 1.0, 2.0];
        assert!(find_peak_indices(&values, 0.0).is_empty());
        // Monotone signals have no interior maxima either.
        let values = vec![0.0, 1.0, 2.0, 3.0];
        assert!(find_peak_indices(&values, 0.0).is_empty());
    }

    #[test]
    fn test_plateau_touching_edge_is_not_a_peak() {
        let values = vec![0.0, 1.0, 2.0, 2.0];
        assert!(find_peak_indices(&values, 0.0).is_empty());
    }

    #[test]
    fn test_prominence_walk_stops_at_higher_ground() {
        let values = vec![0.0, 5.0, 3.0, 4.0, 0.0];
        // The taller peak drops all the way to the signal floor.
        assert_relative_eq!(peak_prominence(&values, 1), 5.0);
        // The smaller one only rises above the valley at 3.0.
        assert_relative_eq!(peak_prominence(&values, 3), 1.0);
        assert_eq!(find_peak_indices(&values, 2.0), vec![1]);
        assert_eq!(find_peak_indices(&values, 0.5), vec![1, 3]);
    }

    #[test]
    fn test_multiple_peaks_in_order() {
        let values = vec![0.0, 2.0, 0.0, 3.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peak_indices(&values, 1.0), vec![1, 3, 5]);
    }

    #[test]
    fn test_prominence_at_threshold_is_kept() {
        // The threshold is inclusive: the first peak rises exactly 1.0
        // above the floor and still qualifies alongside the taller one.
        let values = vec![0.0, 1.0, 0.0, 3.0, 0.0];
        assert_relative_eq!(peak_prominence(&values, 1), 1.0);
        assert_eq!(find_peak_indices(&values, 1.0), vec![1, 3]);
        assert_eq!(find_peak_indices(&values, 1.0 + f64::EPSILON), vec![3]);
    }

    #[test]
    fn test_short_signals() {
        assert!(find_peak_indices(&[], 0.0).is_empty());
        assert!(find_peak_indices(&[1.0], 0.0).is_empty());
        assert!(find_peak_indices(&[1.0, 2.0], 0.0).is_empty());
    }
}
