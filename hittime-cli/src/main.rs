//!
//! Command-line interface for PMT hit-time TOF correction and alignment.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand, ValueEnum};

use hittime_algorithms::{correct_and_align, select_time, AlignConfig, PmtFilter};
use hittime_core::{PmtKind, Vec3};
use hittime_geometry::{GeometryFiles, OpticalModel, PmtTable};
use hittime_io::{read_batch, BatchWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    HitIo(#[from] hittime_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] hittime_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] hittime_geometry::Error),

    #[error("Alignment error: {0}")]
    Algorithms(#[from] hittime_algorithms::Error),
}

/// PMT kind selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// Large PMTs
    Large,
    /// Small PMTs
    Small,
}

impl From<Kind> for PmtKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Large => PmtKind::Large,
            Kind::Small => PmtKind::Small,
        }
    }
}

fn parse_event_pos(raw: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z in mm, got '{raw}'"));
    }
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid coordinate '{s}'"))
    };
    let pos = Vec3::new(coord(parts[0])?, coord(parts[1])?, coord(parts[2])?);
    if pos.has_nan() {
        return Err(format!("event position '{raw}' contains NaN"));
    }
    Ok(pos)
}

/// PMT hit-time TOF correction and peak alignment.
#[derive(Parser)]
#[command(name = "hittime")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// TOF-correct and peak-align a hit CSV file
    Align {
        /// Input hit CSV file
        input: PathBuf,

        /// Directory with the geometry description files
        #[arg(short, long)]
        geometry: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Reconstructed event position in mm, as x,y,z
        #[arg(long, value_parser = parse_event_pos, default_value = "0,0,0")]
        event_pos: Vec3,

        /// Keep only PMTs of this kind
        #[arg(short, long, value_enum)]
        kind: Option<Kind>,

        /// Keep only PMTs with this manufacturer tag
        #[arg(short, long)]
        manufacturer: Option<String>,

        /// Drop hits earlier than this time (ns)
        #[arg(long)]
        t_min: Option<f64>,

        /// Drop hits later than this time (ns)
        #[arg(long)]
        t_max: Option<f64>,

        /// Minimum histogram peak prominence
        #[arg(long, default_value = "20.0")]
        prominence: f64,

        /// Fraction of the peak height defining its leading edge
        #[arg(long, default_value = "0.1")]
        max_ratio: f64,

        /// Time the leading edge is moved to (ns)
        #[arg(long, default_value = "2.0")]
        offset: f64,

        /// Optical model JSON overriding the built-in constants
        #[arg(long)]
        optics: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about a geometry directory
    Info {
        /// Directory with the geometry description files
        geometry: PathBuf,

        /// Optical model JSON (sets the PMT surface radius)
        #[arg(long)]
        optics: Option<PathBuf>,
    },
}

fn load_model(optics: Option<&PathBuf>) -> Result<OpticalModel> {
    match optics {
        Some(path) => Ok(OpticalModel::from_file(path)?),
        None => Ok(OpticalModel::default()),
    }
}

fn load_table(geometry: &Path, model: &OpticalModel) -> Result<PmtTable> {
    let files = GeometryFiles::from_dir(geometry);
    Ok(PmtTable::load(&files, model.pmt_radius_mm)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Align {
            input,
            geometry,
            output,
            event_pos,
            kind,
            manufacturer,
            t_min,
            t_max,
            prominence,
            max_ratio,
            offset,
            optics,
            verbose,
        } => {
            // Alignment pipeline:
            // 1. Load the optical model and the geometry table
            // 2. Read the hit CSV and apply the optional time window
            // 3. Select PMTs, subtract the expected TOF, drop NaN rows
            // 4. Shift the leading edge of the first peak to the offset
            // 5. Write the aligned CSV

            if verbose {
                eprintln!("Geometry: {}", geometry.display());
                eprintln!(
                    "Event position: ({}, {}, {}) mm",
                    event_pos.x, event_pos.y, event_pos.z
                );
                eprintln!("Prominence: {}", prominence);
                eprintln!("Max ratio: {}", max_ratio);
                eprintln!("Offset: {} ns", offset);
            }

            let start = Instant::now();

            let model = load_model(optics.as_ref())?;
            let table = load_table(&geometry, &model)?;
            if verbose {
                eprintln!("Loaded {} geometry id slots", table.len());
            }

            let batch = read_batch(&input)?;
            if verbose {
                eprintln!("Read {} hits from {}", batch.len(), input.display());
            }

            let windowed = select_time(&batch, t_min, t_max)?;
            if verbose && (t_min.is_some() || t_max.is_some()) {
                eprintln!("  {} hits inside the time window", windowed.len());
            }

            let mut filter = PmtFilter::new();
            if let Some(kind) = kind {
                filter = filter.with_kind(kind.into());
            }
            if let Some(tag) = manufacturer {
                filter = filter.with_manufacturer(tag);
            }
            let config = AlignConfig::new()
                .with_prominence(prominence)
                .with_max_ratio(max_ratio)
                .with_offset(offset);

            let (aligned, shift) =
                correct_and_align(&windowed, &table, &model, event_pos, &filter, &config)?;

            let mut writer = BatchWriter::create(&output)?;
            writer.write_batch(&aligned)?;

            let elapsed = start.elapsed();
            println!(
                "Aligned {} of {} hits in {:.2}s",
                aligned.len(),
                batch.len(),
                elapsed.as_secs_f64()
            );
            println!("Shift: {:.3} ns", shift);
            println!("Output: {}", output.display());
        }

        Commands::Info { geometry, optics } => {
            let model = load_model(optics.as_ref())?;
            let table = load_table(&geometry, &model)?;
            let stats = table.stats();

            println!("Geometry: {}", geometry.display());
            println!("Id slots: {}", stats.slots);
            println!("With position: {}", stats.with_position);
            println!("Large PMTs: {}", stats.large);
            println!("Small PMTs: {}", stats.small);
            if stats.manufacturers.is_empty() {
                println!("Manufacturers: none");
            } else {
                println!("Manufacturers:");
                for (tag, count) in &stats.manufacturers {
                    println!("  {}: {}", tag, count);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_pos() {
        let pos = parse_event_pos("100, -200,0.5").unwrap();
        assert_eq!(pos, Vec3::new(100.0, -200.0, 0.5));
        assert!(parse_event_pos("1,2").is_err());
        assert!(parse_event_pos("1,2,three").is_err());
    }

    #[test]
    fn test_parse_event_pos_rejects_nan() {
        let err = parse_event_pos("0,nan,0").unwrap_err();
        assert!(err.contains("NaN"));
    }
}
