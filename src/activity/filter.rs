//! Confidence filtering and species selection.

use crate::activity::Detection;
use crate::constants::NO_DETECTION_LABEL;
use std::collections::HashMap;

/// Which species an activity table covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeciesSelection {
    /// Every species observed above the confidence threshold.
    #[default]
    All,
    /// Exactly these species, in this order, observed or not.
    List(Vec<String>),
    /// The `n` most frequently detected species.
    TopN(usize),
}

/// True for labels that mark the absence of a detection.
pub fn is_no_detection(species: &str) -> bool {
    species.trim().eq_ignore_ascii_case(NO_DETECTION_LABEL)
}

/// Keep detections at or above `min_confidence` that name a species.
pub fn filter_by_confidence(detections: &[Detection], min_confidence: f32) -> Vec<&Detection> {
    detections
        .iter()
        .filter(|d| d.confidence >= min_confidence && !is_no_detection(&d.species))
        .collect()
}

/// Species ordered by descending detection count.
///
/// Ties keep the order in which species were first encountered.
pub fn rank_species<'a, I>(detections: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, detection) in detections.into_iter().enumerate() {
        counts
            .entry(detection.species.as_str())
            .or_insert((0, index))
            .0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(species, (count, first))| (species, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(species, count, _)| (species.to_string(), count))
        .collect()
}

/// The `n` most frequent species, or fewer if fewer exist.
pub fn select_top_n<'a, I>(detections: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Detection>,
{
    rank_species(detections)
        .into_iter()
        .take(n)
        .map(|(species, _)| species)
        .collect()
}

/// Resolve a selection against the confidence-filtered detections.
///
/// Explicit lists are deduplicated but otherwise kept as given, including
/// species that never occur.
pub fn resolve_species(filtered: &[&Detection], selection: &SpeciesSelection) -> Vec<String> {
    match selection {
        SpeciesSelection::All => rank_species(filtered.iter().copied())
            .into_iter()
            .map(|(species, _)| species)
            .collect(),
        SpeciesSelection::TopN(n) => select_top_n(filtered.iter().copied(), *n),
        SpeciesSelection::List(list) => {
            let mut resolved: Vec<String> = Vec::with_capacity(list.len());
            for species in list {
                let species = species.trim();
                if !species.is_empty() && !resolved.iter().any(|s| s == species) {
                    resolved.push(species.to_string());
                }
            }
            resolved
        }
    }
}
