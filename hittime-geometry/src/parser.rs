//! Geometry description-file parsing.
//!
//! Two plain-text table formats feed the PMT table, both with
//! whitespace-separated columns and `#` / `"` comment lines:
//!
//! - position tables: column 0 is the PMT id, the last two columns are the
//!   polar and azimuthal angles in degrees (columns in between are ignored);
//! - manufacturer tables: column 0 is the PMT id, column 1 the tag.
//!
//! Malformed lines are reported with the file path and 1-based line number.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One row of a position description file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRecord {
    /// PMT id.
    pub id: u32,
    /// Polar angle from the +z axis [degrees].
    pub theta_deg: f64,
    /// Azimuthal angle [degrees].
    pub phi_deg: f64,
}

/// One row of a manufacturer description file.
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturerRecord {
    /// PMT id.
    pub id: u32,
    /// Manufacturer tag.
    pub tag: String,
}

/// Returns true for comment lines. The description files mark comments
/// with `#` or a double quote as the first non-blank character.
fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('"')
}

fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

/// Reads a position description file.
///
/// # Errors
/// Returns an I/O error if the file cannot be opened and a
/// [`Error::Parse`] for any malformed row.
pub fn read_position_table(path: &Path) -> Result<Vec<PositionRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if is_comment(&line) || line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 3 {
            return Err(parse_error(
                path,
                line_no,
                format!("expected at least 3 columns, got {}", columns.len()),
            ));
        }
        let id = columns[0]
            .parse::<u32>()
            .map_err(|e| parse_error(path, line_no, format!("bad PMT id {:?}: {e}", columns[0])))?;
        let theta_deg = columns[columns.len() - 2].parse::<f64>().map_err(|e| {
            parse_error(
                path,
                line_no,
                format!("bad theta {:?}: {e}", columns[columns.len() - 2]),
            )
        })?;
        let phi_deg = columns[columns.len() - 1].parse::<f64>().map_err(|e| {
            parse_error(
                path,
                line_no,
                format!("bad phi {:?}: {e}", columns[columns.len() - 1]),
            )
        })?;
        records.push(PositionRecord {
            id,
            theta_deg,
            phi_deg,
        });
    }
    Ok(records)
}

/// Reads a manufacturer description file.
///
/// # Errors
/// Returns an I/O error if the file cannot be opened and a
/// [`Error::Parse`] for any malformed row.
pub fn read_manufacturer_table(path: &Path) -> Result<Vec<ManufacturerRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if is_comment(&line) || line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 2 {
            return Err(parse_error(
                path,
                line_no,
                format!("expected at least 2 columns, got {}", columns.len()),
            ));
        }
        let id = columns[0]
            .parse::<u32>()
            .map_err(|e| parse_error(path, line_no, format!("bad PMT id {:?}: {e}", columns[0])))?;
        records.push(ManufacturerRecord {
            id,
            tag: columns[1].to_string(),
        });
    }
    Ok(records)
}
