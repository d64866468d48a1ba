//! Header alias resolution.

use crate::error::{Error, Result};
use std::path::Path;

const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "datetime", "date_time", "detected_at"];
const DATE_ALIASES: &[&str] = &["date"];
const TIME_ALIASES: &[&str] = &["time"];
const SPECIES_ALIASES: &[&str] = &[
    "species",
    "common name",
    "com_name",
    "common_name",
    "scientific name",
    "sci_name",
    "scientific_name",
    "label",
];
const CONFIDENCE_ALIASES: &[&str] = &["confidence", "score", "probability"];

/// Where the timestamp of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampColumns {
    /// One combined date-time column.
    Single(usize),
    /// Separate date and time columns.
    DateAndTime {
        /// Date column index.
        date: usize,
        /// Time column index.
        time: usize,
    },
}

/// Column indices of the fields a detection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Timestamp source.
    pub timestamp: TimestampColumns,
    /// Species label column.
    pub species: usize,
    /// Confidence column.
    pub confidence: usize,
    /// Facet column, when faceting was requested.
    pub facet: Option<usize>,
}

impl ColumnMap {
    /// Resolve required columns from a header row.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] naming the first required column
    /// that could not be found, including the facet column if requested.
    pub fn resolve(headers: &[&str], facet_column: Option<&str>, path: &Path) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias))
        };
        let missing = |column: &str| Error::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        };

        let timestamp = if let Some(idx) = find(TIMESTAMP_ALIASES) {
            TimestampColumns::Single(idx)
        } else if let (Some(date), Some(time)) = (find(DATE_ALIASES), find(TIME_ALIASES)) {
            TimestampColumns::DateAndTime { date, time }
        } else {
            return Err(missing("timestamp"));
        };

        let species = find(SPECIES_ALIASES).ok_or_else(|| missing("species"))?;
        let confidence = find(CONFIDENCE_ALIASES).ok_or_else(|| missing("confidence"))?;

        let facet = match facet_column {
            Some(name) => {
                let wanted = name.trim().to_lowercase();
                Some(
                    normalized
                        .iter()
                        .position(|h| *h == wanted)
                        .ok_or_else(|| missing(name))?,
                )
            }
            None => None,
        };

        Ok(Self {
            timestamp,
            species,
            confidence,
            facet,
        })
    }

    /// Highest column index referenced.
    pub fn max_index(&self) -> usize {
        let ts = match self.timestamp {
            TimestampColumns::Single(idx) => idx,
            TimestampColumns::DateAndTime { date, time } => date.max(time),
        };
        ts.max(self.species)
            .max(self.confidence)
            .max(self.facet.unwrap_or(0))
    }
}
