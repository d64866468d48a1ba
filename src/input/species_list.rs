//! Species list file reading.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a species allow-list.
///
/// # File Format
/// - One species per line, matched against the detection species label
/// - BirdNET style `Genus species_Common Name` lines keep the common name
/// - Blank lines and lines starting with `#` are ignored
///
/// # Errors
/// - Returns error if file cannot be read
/// - Returns error if file contains invalid UTF-8
pub fn read_species_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::SpeciesListRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut species = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::SpeciesListRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let label = trimmed
            .split_once('_')
            .map_or(trimmed, |(_, common)| common.trim());
        if !label.is_empty() {
            species.push(label.to_string());
        }
    }

    Ok(species)
}
