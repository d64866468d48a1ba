//! Display rescaling of dominant species.
//!
//! A species detected an order of magnitude more often than the rest flattens
//! every other series on a shared axis. This module flags such species and
//! derives a power-of-ten divisor for display. Raw counts are never changed;
//! scaled values are an extra column for the renderer.

use crate::activity::DenseTable;
use serde::Serialize;
use std::collections::HashMap;

/// A species rescaled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominantSpecies {
    /// Species label.
    pub species: String,
    /// Power of ten its counts are divided by.
    pub divisor: u64,
}

/// Flag species whose total is at least `magnitude_ratio` times the median
/// total of the other detected species.
///
/// Needs at least two species with detections. Species whose peak already
/// fits under the other species' peak are not flagged.
pub fn find_dominant(table: &DenseTable, magnitude_ratio: f64) -> Vec<DominantSpecies> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    let mut peaks: HashMap<&str, u64> = HashMap::new();
    for row in &table.rows {
        *totals.entry(row.species.as_str()).or_insert(0) += row.count;
        let peak = peaks.entry(row.species.as_str()).or_insert(0);
        *peak = (*peak).max(row.count);
    }

    let detected: Vec<&str> = table
        .species
        .iter()
        .map(String::as_str)
        .filter(|s| totals.get(s).copied().unwrap_or(0) > 0)
        .collect();
    if detected.len() < 2 {
        return Vec::new();
    }

    let mut dominant = Vec::new();
    for &species in &detected {
        let mut others: Vec<u64> = detected
            .iter()
            .filter(|&&s| s != species)
            .map(|s| totals[s])
            .collect();
        others.sort_unstable();

        #[allow(clippy::cast_precision_loss)]
        let total = totals[species] as f64;
        if total < magnitude_ratio * median(&others) {
            continue;
        }

        let other_peak = detected
            .iter()
            .filter(|&&s| s != species)
            .map(|s| peaks[s])
            .max()
            .unwrap_or(0)
            .max(1);

        let mut divisor: u64 = 1;
        while peaks[species] > other_peak.saturating_mul(divisor) {
            divisor = divisor.saturating_mul(10);
        }
        if divisor > 1 {
            dominant.push(DominantSpecies {
                species: species.to_string(),
                divisor,
            });
        }
    }

    dominant
}

/// Display value for every row of `table`, in row order.
pub fn scaled_counts(table: &DenseTable, dominant: &[DominantSpecies]) -> Vec<f64> {
    let divisors: HashMap<&str, u64> = dominant
        .iter()
        .map(|d| (d.species.as_str(), d.divisor))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let divisor = divisors.get(row.species.as_str()).copied().unwrap_or(1);
            #[allow(clippy::cast_precision_loss)]
            let scaled = row.count as f64 / divisor as f64;
            scaled
        })
        .collect()
}

/// Median of sorted values.
#[allow(clippy::cast_precision_loss)]
fn median(sorted: &[u64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2] as f64,
        n => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
    }
}
