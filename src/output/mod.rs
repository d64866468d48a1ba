//! Output format writers.

mod csv;
mod json;
pub mod progress;
mod writer;

pub use csv::{CsvWriter, write_co_occurrence_csv, write_nights_csv, write_summary_csv};
pub use json::{JsonActivityFile, JsonActivityWriter, JsonContext, JsonRow, JsonSettings};
pub use writer::OutputWriter;
