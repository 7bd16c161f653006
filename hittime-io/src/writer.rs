//! Hit-batch CSV writing.

use crate::Result;
use hittime_core::HitBatch;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for hit-batch CSV output.
///
/// Produces the same format [`crate::read_batch`] consumes; the header
/// follows the batch's charge layout.
pub struct BatchWriter {
    writer: BufWriter<File>,
}

impl BatchWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error when the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes a batch as CSV, header included.
    ///
    /// # Errors
    /// Returns an error when writing fails.
    pub fn write_batch(&mut self, batch: &HitBatch) -> Result<()> {
        if let Some(charge) = &batch.charge {
            writeln!(self.writer, "time,pmt_id,charge")?;
            for ((t, id), q) in batch.time.iter().zip(&batch.pmt_id).zip(charge) {
                writeln!(self.writer, "{t},{id},{q}")?;
            }
        } else {
            writeln!(self.writer, "time,pmt_id")?;
            for (t, id) in batch.time.iter().zip(&batch.pmt_id) {
                writeln!(self.writer, "{t},{id}")?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error when the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
