//! Per-species detection summaries.

use crate::activity::{BinUnit, Detection, to_local};
use chrono::{NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Totals for one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesSummary {
    /// Species label.
    pub species: String,
    /// Number of detections.
    pub detections: u64,
    /// Mean confidence, `None` without detections.
    pub mean_confidence: Option<f32>,
    /// Highest confidence, `None` without detections.
    pub max_confidence: Option<f32>,
    /// First detection (reference wall clock).
    pub first_seen: Option<NaiveDateTime>,
    /// Last detection (reference wall clock).
    pub last_seen: Option<NaiveDateTime>,
    /// Number of bins with at least one detection.
    pub active_bins: usize,
}

#[derive(Default)]
struct Accumulator {
    detections: u64,
    confidence_sum: f64,
    max_confidence: f32,
    first: Option<NaiveDateTime>,
    last: Option<NaiveDateTime>,
    bins: BTreeSet<NaiveDateTime>,
}

/// Summarize `species` over detections that already passed filtering.
///
/// Species without detections get a zero row so every requested species is
/// reported, in the order given.
pub fn summarize<'a, I, Tz>(
    detections: I,
    species: &[String],
    bin: BinUnit,
    tz: &Tz,
) -> Vec<SpeciesSummary>
where
    I: IntoIterator<Item = &'a Detection>,
    Tz: TimeZone,
{
    let mut acc: HashMap<&str, Accumulator> = species
        .iter()
        .map(|s| (s.as_str(), Accumulator::default()))
        .collect();

    for detection in detections {
        let Some(entry) = acc.get_mut(detection.species.as_str()) else {
            continue;
        };
        let local = to_local(&detection.timestamp, tz);
        entry.detections += 1;
        entry.confidence_sum += f64::from(detection.confidence);
        entry.max_confidence = entry.max_confidence.max(detection.confidence);
        entry.first = Some(entry.first.map_or(local, |f| f.min(local)));
        entry.last = Some(entry.last.map_or(local, |l| l.max(local)));
        entry.bins.insert(bin.floor(local));
    }

    species
        .iter()
        .map(|name| {
            let a = acc.remove(name.as_str()).unwrap_or_default();
            let seen = a.detections > 0;
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let mean = seen.then(|| (a.confidence_sum / a.detections as f64) as f32);
            SpeciesSummary {
                species: name.clone(),
                detections: a.detections,
                mean_confidence: mean,
                max_confidence: seen.then_some(a.max_confidence),
                first_seen: a.first,
                last_seen: a.last,
                active_bins: a.bins.len(),
            }
        })
        .collect()
}
