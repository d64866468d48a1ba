//! Cross-species comparison.

use crate::activity::Aggregation;
use crate::error::{Error, Result};
use serde::Serialize;

/// Species x species matrix of shared active bins.
///
/// `counts[i][j]` is the number of bins in which both `species[i]` and
/// `species[j]` were detected; the diagonal holds each species' active bins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoOccurrence {
    /// Species in matrix order.
    pub species: Vec<String>,
    /// Shared active bin counts.
    pub counts: Vec<Vec<usize>>,
}

impl CoOccurrence {
    /// Shared bins for a pair of species, `None` if either is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<usize> {
        let i = self.species.iter().position(|s| s == a)?;
        let j = self.species.iter().position(|s| s == b)?;
        Some(self.counts[i][j])
    }
}

/// Count bins shared by every pair of detected species.
///
/// Species of the aggregation that were never detected are left out.
///
/// # Errors
///
/// Returns [`Error::InsufficientSpecies`] if fewer than two species have
/// detections.
pub fn co_occurrence(aggregation: &Aggregation) -> Result<CoOccurrence> {
    let active: Vec<(String, _)> = aggregation
        .species
        .iter()
        .map(|s| (s.clone(), aggregation.active_bins(s)))
        .filter(|(_, bins)| !bins.is_empty())
        .collect();

    if active.len() < 2 {
        return Err(Error::InsufficientSpecies {
            found: active.len(),
        });
    }

    let counts = active
        .iter()
        .map(|(_, a)| {
            active
                .iter()
                .map(|(_, b)| a.intersection(b).count())
                .collect()
        })
        .collect();

    Ok(CoOccurrence {
        species: active.into_iter().map(|(s, _)| s).collect(),
        counts,
    })
}
