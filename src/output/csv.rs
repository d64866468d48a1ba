//! CSV output writers.

use crate::activity::compare::CoOccurrence;
use crate::activity::summary::SpeciesSummary;
use crate::activity::{DenseRow, SolarInterval};
use crate::constants::confidence::DECIMAL_PLACES;
use crate::constants::{BIN_LABEL_FORMAT, UTF8_BOM};
use crate::error::Result;
use crate::output::OutputWriter;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Open a CSV file, writing the UTF-8 BOM first when requested.
fn create_csv(path: &Path, bom: bool) -> Result<BufWriter<File>> {
    let mut writer = BufWriter::new(File::create(path)?);
    if bom {
        writer.write_all(UTF8_BOM)?;
    }
    Ok(writer)
}

/// Activity table CSV writer.
///
/// Columns: `Time bin,Species[,<facet>],Count[,Scaled count]`.
pub struct CsvWriter {
    writer: BufWriter<File>,
    facet_column: Option<String>,
    scaled: bool,
}

impl CsvWriter {
    /// Create a new CSV writer.
    ///
    /// `facet_column` names the facet header; pass `None` for unfaceted
    /// tables. `scaled` adds the scaled count column.
    pub fn new(path: &Path, facet_column: Option<String>, scaled: bool, bom: bool) -> Result<Self> {
        Ok(Self {
            writer: create_csv(path, bom)?,
            facet_column,
            scaled,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        let mut header = "Time bin,Species".to_string();
        if let Some(ref facet) = self.facet_column {
            header.push(',');
            header.push_str(&escape_csv(facet));
        }
        header.push_str(",Count");
        if self.scaled {
            header.push_str(",Scaled count");
        }

        writeln!(self.writer, "{header}")?;
        Ok(())
    }

    fn write_row(&mut self, row: &DenseRow, scaled: Option<f64>) -> Result<()> {
        write!(
            self.writer,
            "{},{}",
            format_bin(row.bin),
            escape_csv(&row.species)
        )?;
        if self.facet_column.is_some() {
            write!(
                self.writer,
                ",{}",
                escape_csv(row.facet.as_deref().unwrap_or_default())
            )?;
        }
        write!(self.writer, ",{}", row.count)?;
        if self.scaled {
            write!(self.writer, ",")?;
            if let Some(value) = scaled {
                write!(self.writer, "{value}")?;
            }
        }

        writeln!(self.writer)?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write night intervals as `Night start,Night end`.
pub fn write_nights_csv(path: &Path, nights: &[SolarInterval], bom: bool) -> Result<()> {
    let mut writer = create_csv(path, bom)?;
    writeln!(writer, "Night start,Night end")?;
    for night in nights {
        writeln!(writer, "{},{}", format_bin(night.start), format_bin(night.end))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write per-species summaries.
pub fn write_summary_csv(path: &Path, summaries: &[SpeciesSummary], bom: bool) -> Result<()> {
    let mut writer = create_csv(path, bom)?;
    writeln!(
        writer,
        "Species,Detections,Mean confidence,Max confidence,First seen,Last seen,Active bins"
    )?;
    for s in summaries {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            escape_csv(&s.species),
            s.detections,
            s.mean_confidence
                .map(|c| format!("{c:.decimal$}", decimal = DECIMAL_PLACES))
                .unwrap_or_default(),
            s.max_confidence
                .map(|c| format!("{c:.decimal$}", decimal = DECIMAL_PLACES))
                .unwrap_or_default(),
            s.first_seen.map(format_bin).unwrap_or_default(),
            s.last_seen.map(format_bin).unwrap_or_default(),
            s.active_bins,
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the co-occurrence matrix with species as both header and first column.
pub fn write_co_occurrence_csv(path: &Path, matrix: &CoOccurrence, bom: bool) -> Result<()> {
    let mut writer = create_csv(path, bom)?;
    let header: Vec<String> = std::iter::once("Species".to_string())
        .chain(matrix.species.iter().map(|s| escape_csv(s)))
        .collect();
    writeln!(writer, "{}", header.join(","))?;

    for (species, counts) in matrix.species.iter().zip(&matrix.counts) {
        let cells: Vec<String> = counts.iter().map(ToString::to_string).collect();
        writeln!(writer, "{},{}", escape_csv(species), cells.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_bin(ts: NaiveDateTime) -> String {
    ts.format(BIN_LABEL_FORMAT).to_string()
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
