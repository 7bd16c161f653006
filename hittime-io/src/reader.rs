//! Hit-batch CSV reading.

use crate::error::{Error, Result};
use hittime_core::HitBatch;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn invalid(source_name: &str, line: usize, message: impl Into<String>) -> Error {
    Error::InvalidFormat {
        source_name: source_name.to_string(),
        line,
        message: message.into(),
    }
}

/// Reads a hit batch from a CSV file.
///
/// # Errors
/// Returns an error when the file cannot be opened or its content is
/// malformed.
pub fn read_batch<P: AsRef<Path>>(path: P) -> Result<HitBatch> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse_batch(BufReader::new(file), &path.display().to_string())
}

/// Parses a hit batch from CSV text.
///
/// The first line must be the header `time,pmt_id` or
/// `time,pmt_id,charge`; the charge column is carried when the header
/// names it. `nan` is a valid time or charge value. Blank lines are
/// skipped. `source_name` labels parse errors, which carry 1-based line
/// numbers.
///
/// # Errors
/// Returns an error on a missing or unrecognized header, a row with
/// the wrong number of columns, or an unparseable field.
pub fn parse_batch<R: BufRead>(reader: R, source_name: &str) -> Result<HitBatch> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(invalid(source_name, 1, "missing header line")),
    };
    let has_charge = match header.trim() {
        "time,pmt_id" => false,
        "time,pmt_id,charge" => true,
        other => {
            return Err(invalid(
                source_name,
                1,
                format!("unrecognized header '{other}'"),
            ))
        }
    };

    let mut batch = if has_charge {
        HitBatch::with_charge(0)
    } else {
        HitBatch::new()
    };

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line?;
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let mut fields = row.split(',');
        let time = parse_field::<f64>(&mut fields, source_name, line_no, "time")?;
        let pmt_id = parse_field::<u32>(&mut fields, source_name, line_no, "pmt_id")?;
        let charge = if has_charge {
            Some(parse_field::<f64>(&mut fields, source_name, line_no, "charge")?)
        } else {
            None
        };
        if fields.next().is_some() {
            return Err(invalid(source_name, line_no, "unexpected extra column"));
        }

        match charge {
            Some(charge) => batch.push_charged(time, pmt_id, charge),
            None => batch.push(time, pmt_id),
        }
    }
    Ok(batch)
}

fn parse_field<T: std::str::FromStr>(
    fields: &mut std::str::Split<'_, char>,
    source_name: &str,
    line: usize,
    column: &str,
) -> Result<T> {
    let raw = fields
        .next()
        .ok_or_else(|| invalid(source_name, line, format!("missing {column} column")))?
        .trim();
    raw.parse()
        .map_err(|_| invalid(source_name, line, format!("invalid {column} value '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_parse_without_charge() {
        let batch = parse_batch("time,pmt_id\n1.5,3\n2.5,60000\n".as_bytes(), "test").unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch.has_charge());
        assert_relative_eq!(batch.time[0], 1.5);
        assert_eq!(batch.pmt_id, vec![3, 60_000]);
    }

    #[test]
    fn test_parse_with_charge_and_nan() {
        let text = "time,pmt_id,charge\n1.5,3,0.25\nnan,4,NaN\n";
        let batch = parse_batch(text.as_bytes(), "test").unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.time[1].is_nan());
        let charge = batch.charge.as_deref().unwrap();
        assert_relative_eq!(charge[0], 0.25);
        assert!(charge[1].is_nan());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let batch = parse_batch("time,pmt_id\n\n1.0,1\n\n".as_bytes(), "test").unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_batch("".as_bytes(), "test").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line: 1, .. }));
    }

    #[test]
    fn test_unrecognized_header() {
        let err = parse_batch("x,y,z\n".as_bytes(), "test").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("test:1"), "unexpected error: {message}");
        assert!(message.contains("unrecognized header"));
    }

    #[test]
    fn test_row_errors_carry_line_numbers() {
        let err = parse_batch("time,pmt_id\n1.0,1\nbad,2\n".as_bytes(), "hits.csv").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line: 3, .. }));
        assert!(err.to_string().contains("invalid time value 'bad'"));

        let err = parse_batch("time,pmt_id\n1.0,-3\n".as_bytes(), "hits.csv").unwrap_err();
        assert!(err.to_string().contains("invalid pmt_id value '-3'"));

        let err = parse_batch("time,pmt_id\n1.0\n".as_bytes(), "hits.csv").unwrap_err();
        assert!(err.to_string().contains("missing pmt_id column"));

        let err = parse_batch("time,pmt_id\n1.0,1,9.0\n".as_bytes(), "hits.csv").unwrap_err();
        assert!(err.to_string().contains("unexpected extra column"));
    }

    #[test]
    fn test_read_batch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "time,pmt_id\n10.5,7\n").unwrap();
        let batch = read_batch(file.path()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.pmt_id[0], 7);
    }

    #[test]
    fn test_read_batch_missing_file() {
        let err = read_batch("/nonexistent/hits.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
