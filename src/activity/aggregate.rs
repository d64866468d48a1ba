//! Binning and counting of detections.

use crate::activity::filter::{filter_by_confidence, resolve_species};
use crate::activity::{
    AggregatedCell, BinUnit, CellKey, Detection, ObservationWindow, SpeciesSelection,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Parameters for [`aggregate`].
#[derive(Debug, Clone)]
pub struct AggregateParams {
    /// Minimum confidence (inclusive).
    pub min_confidence: f32,
    /// Species to keep.
    pub selection: SpeciesSelection,
    /// Bin width.
    pub bin: BinUnit,
    /// Group by facet label as well.
    pub faceted: bool,
}

/// Sparse per-bin counts for the selected species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Target species, in output order.
    pub species: Vec<String>,
    /// Bin width used for the cells.
    pub bin: BinUnit,
    /// Whether cells carry facet labels.
    pub faceted: bool,
    /// Window of the confidence-filtered detections, before species filtering.
    pub window: ObservationWindow,
    cells: BTreeMap<CellKey, u64>,
}

impl Aggregation {
    /// Non-empty cells in key order.
    pub fn cells(&self) -> impl Iterator<Item = AggregatedCell> + '_ {
        self.cells.iter().map(|(key, &count)| AggregatedCell {
            bin: key.bin,
            species: key.species.clone(),
            facet: key.facet.clone(),
            count,
        })
    }

    /// Count for a key, zero if absent.
    pub fn count(&self, key: &CellKey) -> u64 {
        self.cells.get(key).copied().unwrap_or(0)
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if no selected species was detected.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> u64 {
        self.cells.values().sum()
    }

    /// Distinct facet labels present in the cells, sorted.
    ///
    /// Empty when not faceted or when no cell exists.
    pub fn facet_values(&self) -> Vec<String> {
        self.cells
            .keys()
            .filter_map(|key| key.facet.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bins with at least one detection of `species`.
    pub fn active_bins(&self, species: &str) -> BTreeSet<NaiveDateTime> {
        self.cells
            .iter()
            .filter(|(key, count)| key.species == species && **count > 0)
            .map(|(key, _)| key.bin)
            .collect()
    }
}

/// Convert an absolute instant to the reference wall clock.
pub fn to_local<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    ts.with_timezone(tz).naive_local()
}

/// Wall-clock span of a set of detections, `None` if the set is empty.
pub fn observation_window<'a, I, Tz>(detections: I, tz: &Tz) -> Option<ObservationWindow>
where
    I: IntoIterator<Item = &'a Detection>,
    Tz: TimeZone,
{
    // Local time can run backwards across a DST fall-back.
    let mut iter = detections.into_iter().map(|d| to_local(&d.timestamp, tz));
    let first = iter.next()?;
    let (start, end) = iter.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
    Some(ObservationWindow { start, end })
}

/// Count detections per (bin, species[, facet]).
///
/// Only detections whose species is in `species` are counted. In faceted
/// mode a missing facet label counts under the empty label.
pub fn count_cells<'a, I, Tz>(
    detections: I,
    species: &[String],
    bin: BinUnit,
    faceted: bool,
    tz: &Tz,
) -> BTreeMap<CellKey, u64>
where
    I: IntoIterator<Item = &'a Detection>,
    Tz: TimeZone,
{
    let wanted: HashSet<&str> = species.iter().map(String::as_str).collect();
    let mut counts: HashMap<CellKey, u64> = HashMap::new();

    for detection in detections {
        if !wanted.contains(detection.species.as_str()) {
            continue;
        }
        let key = CellKey {
            bin: bin.floor(to_local(&detection.timestamp, tz)),
            species: detection.species.clone(),
            facet: faceted.then(|| detection.facet.clone().unwrap_or_default()),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    counts.into_iter().collect()
}

/// Filter, select species and count detections per bin.
///
/// Returns `None` when nothing passes the confidence filter or the species
/// selection resolves to no species. An aggregation with zero cells (the
/// selected species were never detected) is a valid result.
pub fn aggregate<Tz: TimeZone>(
    detections: &[Detection],
    params: &AggregateParams,
    tz: &Tz,
) -> Option<Aggregation> {
    let filtered = filter_by_confidence(detections, params.min_confidence);
    let window = observation_window(filtered.iter().copied(), tz)?;

    let species = resolve_species(&filtered, &params.selection);
    if species.is_empty() {
        debug!("Species selection resolved to no species");
        return None;
    }

    let cells = count_cells(
        filtered.iter().copied(),
        &species,
        params.bin,
        params.faceted,
        tz,
    );

    debug!(
        "Aggregated {} detections into {} cells for {} species",
        filtered.len(),
        cells.len(),
        species.len()
    );

    Some(Aggregation {
        species,
        bin: params.bin,
        faceted: params.faceted,
        window,
        cells,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn params(selection: SpeciesSelection) -> AggregateParams {
        AggregateParams {
            min_confidence: 0.5,
            selection,
            bin: BinUnit::Hours(1),
            faceted: false,
        }
    }

    #[test]
    fn test_counts_sum_to_filtered_detections() {
        let detections = vec![
            Detection::new(at(10, 5), "A", 0.9),
            Detection::new(at(10, 50), "A", 0.7),
            Detection::new(at(11, 5), "B", 0.6),
            Detection::new(at(11, 6), "B", 0.2),
            Detection::new(at(12, 0), "nocall", 0.99),
        ];
        let agg = aggregate(&detections, &params(SpeciesSelection::All), &Utc).unwrap();
        assert_eq!(agg.total(), 3);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.species, vec!["A", "B"]);
    }

    #[test]
    fn test_window_ignores_species_filter() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9),
            Detection::new(at(12, 30), "A", 0.9),
        ];
        let agg = aggregate(
            &detections,
            &params(SpeciesSelection::List(vec!["B".into()])),
            &Utc,
        )
        .unwrap();
        assert!(agg.is_empty());
        assert_eq!(agg.window.start, to_local(&at(10, 0), &Utc));
        assert_eq!(agg.window.end, to_local(&at(12, 30), &Utc));
    }

    #[test]
    fn test_nothing_above_threshold_is_none() {
        let detections = vec![Detection::new(at(10, 0), "A", 0.1)];
        assert!(aggregate(&detections, &params(SpeciesSelection::All), &Utc).is_none());
    }

    #[test]
    fn test_empty_selection_is_none() {
        let detections = vec![Detection::new(at(10, 0), "A", 0.9)];
        assert!(aggregate(&detections, &params(SpeciesSelection::List(vec![])), &Utc).is_none());
        assert!(aggregate(&detections, &params(SpeciesSelection::TopN(0)), &Utc).is_none());
    }

    #[test]
    fn test_top_n_restricts_counted_species() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9),
            Detection::new(at(10, 1), "B", 0.9),
            Detection::new(at(10, 2), "B", 0.9),
        ];
        let agg = aggregate(&detections, &params(SpeciesSelection::TopN(1)), &Utc).unwrap();
        assert_eq!(agg.species, vec!["B"]);
        assert_eq!(agg.total(), 2);
    }

    #[test]
    fn test_binning_uses_reference_zone() {
        let detections = vec![Detection::new(at(23, 30), "A", 0.9)];
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut p = params(SpeciesSelection::All);
        p.bin = BinUnit::Days(1);
        let agg = aggregate(&detections, &p, &tz).unwrap();
        let cell = agg.cells().next().unwrap();
        assert_eq!(cell.bin.to_string(), "2024-05-02 00:00:00");
    }

    #[test]
    fn test_faceted_cells_and_values() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9).with_facet("north"),
            Detection::new(at(10, 5), "A", 0.9).with_facet("south"),
            Detection::new(at(10, 6), "A", 0.9).with_facet("north"),
        ];
        let mut p = params(SpeciesSelection::All);
        p.faceted = true;
        let agg = aggregate(&detections, &p, &Utc).unwrap();
        assert_eq!(agg.facet_values(), vec!["north", "south"]);
        let key = CellKey {
            bin: BinUnit::Hours(1).floor(to_local(&at(10, 0), &Utc)),
            species: "A".into(),
            facet: Some("north".into()),
        };
        assert_eq!(agg.count(&key), 2);
    }
}
