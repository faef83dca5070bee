//! Submission output and progress reporting.

mod csv;
pub mod progress;
mod types;
mod writer;

pub use csv::{CsvWriter, write_submission};
pub use types::Prediction;
pub use writer::OutputWriter;
