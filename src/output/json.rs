//! JSON output format writer.

use crate::activity::scaling::DominantSpecies;
use crate::activity::{DenseRow, ObservationWindow, SolarInterval};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// JSON activity document.
#[derive(Debug, Serialize)]
pub struct JsonActivityFile {
    /// When the document was written.
    pub generated_at: DateTime<Utc>,
    /// Settings that shaped the table.
    pub settings: JsonSettings,
    /// Confidence-filtered observation window.
    pub window: ObservationWindow,
    /// Species in table order.
    pub species: Vec<String>,
    /// Facet values, empty when unfaceted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<String>,
    /// Zero-filled rows.
    pub rows: Vec<JsonRow>,
    /// Night intervals, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nights: Option<Vec<SolarInterval>>,
    /// Species rescaled for display.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dominant: Vec<DominantSpecies>,
}

/// Settings echoed into the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSettings {
    /// Minimum confidence threshold.
    pub min_confidence: f32,
    /// Bin unit label, e.g. `1h`.
    pub bin: String,
    /// Reference time zone name.
    pub timezone: String,
    /// Facet column name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_column: Option<String>,
    /// Latitude used for nights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude used for nights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Single table row in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRow {
    /// Time bin start.
    pub bin: NaiveDateTime,
    /// Species label.
    pub species: String,
    /// Facet label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    /// Detection count.
    pub count: u64,
    /// Display value after rescaling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled_count: Option<f64>,
}

/// Parts of the document known before the rows are written.
#[derive(Debug, Clone)]
pub struct JsonContext {
    /// Settings block.
    pub settings: JsonSettings,
    /// Observation window.
    pub window: ObservationWindow,
    /// Species in table order.
    pub species: Vec<String>,
    /// Facet values.
    pub facets: Vec<String>,
    /// Night intervals.
    pub nights: Option<Vec<SolarInterval>>,
    /// Dominant species.
    pub dominant: Vec<DominantSpecies>,
}

/// Writer collecting rows into one JSON document at finalize.
pub struct JsonActivityWriter {
    output_path: PathBuf,
    context: JsonContext,
    rows: Vec<JsonRow>,
}

impl JsonActivityWriter {
    /// Create a new JSON writer.
    pub fn new(output_path: &Path, context: JsonContext) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            context,
            rows: Vec::new(),
        }
    }
}

impl OutputWriter for JsonActivityWriter {
    fn write_header(&mut self) -> Result<()> {
        // Written as part of the document at finalize.
        Ok(())
    }

    fn write_row(&mut self, row: &DenseRow, scaled: Option<f64>) -> Result<()> {
        self.rows.push(JsonRow {
            bin: row.bin,
            species: row.species.clone(),
            facet: row.facet.clone(),
            count: row.count,
            scaled_count: scaled,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let context = self.context.clone();
        let document = JsonActivityFile {
            generated_at: Utc::now(),
            settings: context.settings,
            window: context.window,
            species: context.species,
            facets: context.facets,
            rows: std::mem::take(&mut self.rows),
            nights: context.nights,
            dominant: context.dominant,
        };

        let file = File::create(&self.output_path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &document).map_err(|e| {
            Error::JsonWrite {
                path: self.output_path.clone(),
                source: e,
            }
        })
    }
}
