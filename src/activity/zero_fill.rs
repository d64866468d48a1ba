//! Zero-filling of sparse aggregations into dense tables.

use crate::activity::{Aggregation, CellKey, DenseRow, DenseTable, ObservationWindow};
use tracing::warn;

/// Expand an aggregation over its own window, species and facets.
///
/// Facet values come from the aggregated cells. When faceting was requested
/// but nothing was aggregated, the facet set cannot be known and the table
/// degrades to a species by time grid.
pub fn zero_fill(aggregation: &Aggregation) -> DenseTable {
    let facets = aggregation.faceted.then(|| aggregation.facet_values());
    expand(
        aggregation,
        &aggregation.window,
        &aggregation.species,
        facets.as_deref(),
    )
}

/// Build the full bin x species [x facet] grid, defaulting counts to zero.
///
/// `window` must come from the confidence-filtered detections so that a
/// species without detections still spans the whole recording period.
pub fn expand(
    aggregation: &Aggregation,
    window: &ObservationWindow,
    species: &[String],
    facets: Option<&[String]>,
) -> DenseTable {
    let bins = aggregation.bin.bins(window.start, window.end);

    let facets: Vec<String> = match facets {
        Some([]) => {
            warn!("No aggregated rows to infer facet values from; producing an unfaceted table");
            Vec::new()
        }
        Some(values) => values.to_vec(),
        None => Vec::new(),
    };

    // `None` stands for the single unfaceted column.
    let facet_keys: Vec<Option<String>> = if facets.is_empty() {
        vec![None]
    } else {
        facets.iter().cloned().map(Some).collect()
    };

    let mut rows = Vec::with_capacity(bins.len() * species.len() * facet_keys.len());
    for &bin in &bins {
        for name in species {
            for facet in &facet_keys {
                let key = CellKey {
                    bin,
                    species: name.clone(),
                    facet: facet.clone(),
                };
                rows.push(DenseRow {
                    bin,
                    species: name.clone(),
                    facet: facet.clone(),
                    count: aggregation.count(&key),
                });
            }
        }
    }

    DenseTable {
        bins,
        species: species.to_vec(),
        facets,
        rows,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::activity::{AggregateParams, BinUnit, Detection, SpeciesSelection, aggregate};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn hourly(selection: SpeciesSelection, faceted: bool) -> AggregateParams {
        AggregateParams {
            min_confidence: 0.0,
            selection,
            bin: BinUnit::Hours(1),
            faceted,
        }
    }

    #[test]
    fn test_dst_fall_back_keeps_every_detection() {
        use chrono_tz::Europe::Helsinki;

        // 03:50 EEST, then 03:05 EET after clocks go back.
        let detections = vec![
            Detection::new(Utc.with_ymd_and_hms(2024, 10, 27, 0, 50, 0).unwrap(), "Owl", 0.9),
            Detection::new(Utc.with_ymd_and_hms(2024, 10, 27, 1, 5, 0).unwrap(), "Owl", 0.9),
        ];
        let params = AggregateParams {
            min_confidence: 0.0,
            selection: SpeciesSelection::All,
            bin: BinUnit::Minutes(10),
            faceted: false,
        };
        let agg = aggregate(&detections, &params, &Helsinki).unwrap();
        assert!(agg.window.start <= agg.window.end);

        let table = zero_fill(&agg);
        assert_eq!(table.total(), agg.total());
        assert_eq!(table.total(), 2);
        assert_eq!(table.bins.len(), 6);
    }

    #[test]
    fn test_gap_is_filled_with_zero() {
        let detections = vec![
            Detection::new(at(10, 0), "Bird A", 0.9),
            Detection::new(at(12, 0), "Bird A", 0.9),
        ];
        let agg = aggregate(&detections, &hourly(SpeciesSelection::All, false), &Utc).unwrap();
        let table = zero_fill(&agg);

        let counts: Vec<(String, u64)> = table
            .rows
            .iter()
            .map(|r| (r.bin.format("%H:%M").to_string(), r.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("10:00".to_string(), 1),
                ("11:00".to_string(), 0),
                ("12:00".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_unobserved_species_spans_full_window() {
        let detections = vec![
            Detection::new(at(10, 0), "Bird A", 0.9),
            Detection::new(at(12, 0), "Bird A", 0.9),
        ];
        let selection = SpeciesSelection::List(vec!["Bird B".into()]);
        let agg = aggregate(&detections, &hourly(selection, false), &Utc).unwrap();
        let table = zero_fill(&agg);

        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|r| r.count == 0 && r.species == "Bird B"));
        assert_eq!(table.rows[0].bin.format("%H:%M").to_string(), "10:00");
        assert_eq!(table.rows[2].bin.format("%H:%M").to_string(), "12:00");
    }

    #[test]
    fn test_faceted_row_count() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9).with_facet("north"),
            Detection::new(at(11, 0), "B", 0.9).with_facet("south"),
            Detection::new(at(12, 0), "A", 0.9).with_facet("east"),
        ];
        let agg = aggregate(&detections, &hourly(SpeciesSelection::All, true), &Utc).unwrap();
        let table = zero_fill(&agg);

        assert_eq!(table.facets, vec!["east", "north", "south"]);
        assert_eq!(table.rows.len(), 3 * 2 * 3);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_faceted_empty_aggregation_degrades() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9).with_facet("north"),
            Detection::new(at(11, 0), "A", 0.9).with_facet("south"),
        ];
        let selection = SpeciesSelection::List(vec!["Z".into()]);
        let agg = aggregate(&detections, &hourly(selection, true), &Utc).unwrap();
        let table = zero_fill(&agg);

        assert!(!table.is_faceted());
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.facet.is_none()));
    }

    #[test]
    fn test_no_duplicate_rows() {
        let detections = vec![
            Detection::new(at(10, 0), "A", 0.9),
            Detection::new(at(10, 10), "B", 0.9),
            Detection::new(at(13, 0), "A", 0.9),
        ];
        let agg = aggregate(&detections, &hourly(SpeciesSelection::All, false), &Utc).unwrap();
        let table = zero_fill(&agg);

        let mut keys: Vec<_> = table
            .rows
            .iter()
            .map(|r| (r.bin, r.species.clone()))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
        assert_eq!(before, table.bins.len() * table.species.len());
    }
}
