//! Keep-masks over parallel hit arrays.
//!
//! These operate on plain slices so they can be used on any parallel-array
//! data; [`crate::HitBatch`] methods build on them for the columnar case.

use crate::error::{Error, Result};

/// Builds a keep-mask that is true where none of the supplied columns
/// is NaN at that index.
///
/// An entry is invalid if ANY column is NaN there, so a single bad field
/// drops the whole row. An empty column set yields an empty mask.
///
/// # Errors
/// Returns [`Error::LengthMismatch`] if the columns differ in length.
pub fn non_nan_mask(columns: &[&[f64]]) -> Result<Vec<bool>> {
    let Some((first, rest)) = columns.split_first() else {
        return Ok(Vec::new());
    };
    for column in rest {
        if column.len() != first.len() {
            return Err(Error::LengthMismatch {
                expected: first.len(),
                actual: column.len(),
            });
        }
    }
    Ok((0..first.len())
        .map(|i| columns.iter().all(|column| !column[i].is_nan()))
        .collect())
}

/// Builds a keep-mask for `t_min <= t <= t_max`.
///
/// Either bound may be `None`, meaning unbounded on that side. NaN times
/// satisfy neither comparison and are always dropped.
#[must_use]
pub fn time_window_mask(times: &[f64], t_min: Option<f64>, t_max: Option<f64>) -> Vec<bool> {
    let lo = t_min.unwrap_or(f64::NEG_INFINITY);
    let hi = t_max.unwrap_or(f64::INFINITY);
    times.iter().map(|&t| t >= lo && t <= hi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_nan_mask_or_semantics() {
        // An index is dropped if any array is invalid there.
        let times = [1.0, f64::NAN, 3.0];
        let charges = [1.0, 2.0, f64::NAN];
        let mask = non_nan_mask(&[&times, &charges]).unwrap();
        assert_eq!(mask, vec![true, false, false]);
    }

    #[test]
    fn test_non_nan_mask_single_column() {
        let times = [f64::NAN, 2.0];
        assert_eq!(non_nan_mask(&[&times]).unwrap(), vec![false, true]);
    }

    #[test]
    fn test_non_nan_mask_ragged_input() {
        let a = [1.0, 2.0];
        let b = [1.0];
        assert!(non_nan_mask(&[&a, &b]).is_err());
    }

    #[test]
    fn test_non_nan_mask_no_columns() {
        assert!(non_nan_mask(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_time_window_bounds() {
        let times = [0.0, 5.0, 10.0, 15.0];
        assert_eq!(
            time_window_mask(&times, Some(5.0), Some(10.0)),
            vec![false, true, true, false]
        );
        assert_eq!(
            time_window_mask(&times, None, Some(5.0)),
            vec![true, true, false, false]
        );
        assert_eq!(
            time_window_mask(&times, Some(10.0), None),
            vec![false, false, true, true]
        );
        assert_eq!(
            time_window_mask(&times, None, None),
            vec![true, true, true, true]
        );
    }

    #[test]
    fn test_time_window_drops_nan() {
        let times = [1.0, f64::NAN];
        assert_eq!(time_window_mask(&times, None, None), vec![true, false]);
    }
}
