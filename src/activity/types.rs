//! Activity data model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// A single species detection, already resolved to an absolute instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// When the detection happened.
    pub timestamp: DateTime<Utc>,
    /// Species label.
    pub species: String,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Optional facet label (site, station, recorder).
    pub facet: Option<String>,
}

impl Detection {
    /// Create an unfaceted detection.
    pub fn new(timestamp: DateTime<Utc>, species: impl Into<String>, confidence: f32) -> Self {
        Self {
            timestamp,
            species: species.into(),
            confidence,
            facet: None,
        }
    }

    /// Attach a facet label.
    #[must_use]
    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facet = Some(facet.into());
        self
    }
}

/// Local wall-clock bounds of the confidence-filtered detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObservationWindow {
    /// Earliest detection.
    pub start: NaiveDateTime,
    /// Latest detection.
    pub end: NaiveDateTime,
}

impl ObservationWindow {
    /// True if `[start, end]` overlaps this window.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Grouping key of an aggregated cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    /// Floored time bin.
    pub bin: NaiveDateTime,
    /// Species label.
    pub species: String,
    /// Facet label, when faceting.
    pub facet: Option<String>,
}

/// One non-empty (bin, species, facet) combination and its count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedCell {
    /// Floored time bin.
    pub bin: NaiveDateTime,
    /// Species label.
    pub species: String,
    /// Facet label, when faceting.
    pub facet: Option<String>,
    /// Number of detections.
    pub count: u64,
}

/// One row of the zero-filled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenseRow {
    /// Time bin.
    pub bin: NaiveDateTime,
    /// Species label.
    pub species: String,
    /// Facet label, when faceting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    /// Number of detections, zero when the combination was not observed.
    pub count: u64,
}

/// Zero-filled activity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenseTable {
    /// Every bin of the observation window, ascending.
    pub bins: Vec<NaiveDateTime>,
    /// Target species in output order.
    pub species: Vec<String>,
    /// Facet values; empty when the table is not faceted.
    pub facets: Vec<String>,
    /// Rows in bin, species, facet order.
    pub rows: Vec<DenseRow>,
}

impl DenseTable {
    /// True if rows carry a facet dimension.
    pub fn is_faceted(&self) -> bool {
        !self.facets.is_empty()
    }

    /// Total count over all rows.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Iterate the rows of one species.
    pub fn rows_for<'a>(&'a self, species: &'a str) -> impl Iterator<Item = &'a DenseRow> + 'a {
        self.rows.iter().filter(move |r| r.species == species)
    }
}

/// A contiguous dark period, sunset to next sunrise, in the reference wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolarInterval {
    /// Sunset.
    pub start: NaiveDateTime,
    /// Following sunrise.
    pub end: NaiveDateTime,
}
