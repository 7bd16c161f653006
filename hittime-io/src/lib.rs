//! hittime-io: hit-batch file exchange.
//!
//! Reads and writes hit batches as small CSV files with a `time,pmt_id`
//! or `time,pmt_id,charge` header. This is the exchange surface used by
//! the command-line tools and tests; production detector formats live
//! upstream of this crate.

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::{parse_batch, read_batch};
pub use writer::BatchWriter;
