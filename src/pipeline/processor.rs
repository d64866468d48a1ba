//! Activity table construction.

use crate::activity::compare::{CoOccurrence, co_occurrence};
use crate::activity::scaling::{DominantSpecies, find_dominant, scaled_counts};
use crate::activity::summary::{SpeciesSummary, summarize};
use crate::activity::{
    AggregateParams, BinUnit, DenseTable, Detection, ObservationWindow, SolarInterval,
    SpeciesSelection, aggregate, filter, zero_fill,
};
use crate::config::OutputFormat;
use crate::constants::output_files;
use crate::error::{Error, Result};
use crate::output::{
    CsvWriter, JsonActivityWriter, JsonContext, JsonSettings, OutputWriter, write_nights_csv,
};
use crate::solar::SiteLocation;
use chrono::TimeZone;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for building an activity table.
#[derive(Debug, Clone)]
pub struct ActivityOptions {
    /// Minimum confidence threshold.
    pub min_confidence: f32,
    /// Which species to keep.
    pub selection: SpeciesSelection,
    /// Time bin unit.
    pub bin: BinUnit,
    /// Group by the detection facet as well.
    pub faceted: bool,
    /// Recording site for night shading.
    pub location: Option<SiteLocation>,
    /// Compute night intervals when a location is known.
    pub nights: bool,
    /// Magnitude ratio for dominant species rescaling, `None` to disable.
    pub scaling: Option<f64>,
}

/// Everything the writers need for one activity run.
#[derive(Debug, Clone)]
pub struct ActivityReport {
    /// Confidence-filtered observation window.
    pub window: ObservationWindow,
    /// Zero-filled table.
    pub table: DenseTable,
    /// Night intervals, `None` when shading was not computed.
    pub nights: Option<Vec<SolarInterval>>,
    /// Species rescaled for display.
    pub dominant: Vec<DominantSpecies>,
    /// Scaled count per table row, present when rescaling was requested.
    pub scaled: Option<Vec<f64>>,
    /// Detections that passed the confidence filter and species selection.
    pub detections_used: u64,
}

/// Filter, aggregate, zero-fill and optionally shade nights and rescale.
///
/// Returns `None` when nothing passes the confidence filter or the species
/// selection resolves to no species.
pub fn build_activity<Tz: TimeZone>(
    detections: &[Detection],
    options: &ActivityOptions,
    tz: &Tz,
) -> Option<ActivityReport> {
    let params = AggregateParams {
        min_confidence: options.min_confidence,
        selection: options.selection.clone(),
        bin: options.bin,
        faceted: options.faceted,
    };
    let aggregation = aggregate(detections, &params, tz)?;
    let detections_used = aggregation.total();
    let table = zero_fill(&aggregation);

    let nights = if options.nights {
        options
            .location
            .as_ref()
            .and_then(|site| compute_nights(site, tz, &aggregation.window))
    } else {
        None
    };

    let (dominant, scaled) = match options.scaling {
        Some(ratio) => {
            let dominant = find_dominant(&table, ratio);
            for d in &dominant {
                info!("Scaling {} counts by 1/{}", d.species, d.divisor);
            }
            let scaled = scaled_counts(&table, &dominant);
            (dominant, Some(scaled))
        }
        None => (Vec::new(), None),
    };

    debug!(
        "Activity table: {} bins x {} species, {} rows",
        table.bins.len(),
        table.species.len(),
        table.rows.len()
    );

    Some(ActivityReport {
        window: aggregation.window,
        table,
        nights,
        dominant,
        scaled,
        detections_used,
    })
}

#[cfg(feature = "solar")]
fn compute_nights<Tz: TimeZone>(
    site: &SiteLocation,
    tz: &Tz,
    window: &ObservationWindow,
) -> Option<Vec<SolarInterval>> {
    let nights = crate::solar::night_intervals(site, tz, window);
    debug!("Computed {} night intervals", nights.len());
    Some(nights)
}

#[cfg(not(feature = "solar"))]
fn compute_nights<Tz: TimeZone>(
    _site: &SiteLocation,
    _tz: &Tz,
    _window: &ObservationWindow,
) -> Option<Vec<SolarInterval>> {
    info!("Night shading is not available in this build, skipping");
    None
}

/// Per-species summary over confidence-filtered detections.
///
/// Returns `None` under the same conditions as [`build_activity`].
pub fn build_summary<Tz: TimeZone>(
    detections: &[Detection],
    min_confidence: f32,
    selection: &SpeciesSelection,
    bin: BinUnit,
    tz: &Tz,
) -> Option<Vec<SpeciesSummary>> {
    let filtered = filter::filter_by_confidence(detections, min_confidence);
    if filtered.is_empty() {
        return None;
    }
    let species = filter::resolve_species(&filtered, selection);
    if species.is_empty() {
        return None;
    }
    Some(summarize(filtered.iter().copied(), &species, bin, tz))
}

/// Co-occurrence matrix for the selected species.
///
/// Returns `Ok(None)` when there is nothing to aggregate.
///
/// # Errors
///
/// Returns [`crate::Error::InsufficientSpecies`] when fewer than two of the
/// selected species were detected.
pub fn build_comparison<Tz: TimeZone>(
    detections: &[Detection],
    min_confidence: f32,
    selection: &SpeciesSelection,
    bin: BinUnit,
    tz: &Tz,
) -> Result<Option<CoOccurrence>> {
    let params = AggregateParams {
        min_confidence,
        selection: selection.clone(),
        bin,
        faceted: false,
    };
    aggregate(detections, &params, tz)
        .map(|aggregation| co_occurrence(&aggregation))
        .transpose()
}

/// Create the output directory if needed.
///
/// # Errors
///
/// Returns [`Error::OutputDirCreateFailed`] if it cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Write the activity table in every requested format, plus the nights
/// table when nights were computed and CSV was requested.
///
/// Returns the paths written.
///
/// # Errors
///
/// Returns an error if the output directory or any file cannot be written.
pub fn write_activity(
    report: &ActivityReport,
    output_dir: &Path,
    formats: &[OutputFormat],
    settings: &JsonSettings,
    csv_bom_enabled: bool,
) -> Result<Vec<PathBuf>> {
    ensure_output_dir(output_dir)?;
    let mut written = Vec::new();

    for &format in formats {
        let path = match format {
            OutputFormat::Csv => output_dir.join(output_files::ACTIVITY_CSV),
            OutputFormat::Json => output_dir.join(output_files::ACTIVITY_JSON),
        };
        debug!("Writing {} output: {}", format, path.display());

        let mut writer: Box<dyn OutputWriter> = match format {
            OutputFormat::Csv => Box::new(CsvWriter::new(
                &path,
                settings
                    .facet_column
                    .clone()
                    .filter(|_| report.table.is_faceted()),
                report.scaled.is_some(),
                csv_bom_enabled,
            )?),
            OutputFormat::Json => Box::new(JsonActivityWriter::new(
                &path,
                JsonContext {
                    settings: settings.clone(),
                    window: report.window,
                    species: report.table.species.clone(),
                    facets: report.table.facets.clone(),
                    nights: report.nights.clone(),
                    dominant: report.dominant.clone(),
                },
            )),
        };

        writer.write_header()?;
        for (idx, row) in report.table.rows.iter().enumerate() {
            let scaled = report.scaled.as_ref().and_then(|s| s.get(idx).copied());
            writer.write_row(row, scaled)?;
        }
        writer.finalize()?;
        written.push(path);

        if format == OutputFormat::Csv
            && let Some(nights) = &report.nights
        {
            let nights_path = output_dir.join(output_files::NIGHTS_CSV);
            write_nights_csv(&nights_path, nights, csv_bom_enabled)?;
            written.push(nights_path);
        }
    }

    Ok(written)
}
