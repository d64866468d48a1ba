//! Output writer trait definition.

use crate::activity::DenseRow;
use crate::error::Result;

/// Trait for writing the zero-filled activity table.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single row with its scaled count, if rescaling is on.
    fn write_row(&mut self, row: &DenseRow, scaled: Option<f64>) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}
