//! Input discovery and loading.

use crate::activity::Detection;
use crate::constants::DETECTION_EXTENSIONS;
use crate::error::{Error, Result};
use crate::input::parse_detection_file;
use crate::output::progress;
use chrono::TimeZone;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Collect detection exports from paths (files and directories).
///
/// Explicit files are taken as given; directories are searched recursively
/// for `.csv`, `.tsv` and `.txt` files. The result is sorted so runs are
/// reproducible.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_detection_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_detection_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_detection_files_recursive(&path, files)?;
        } else if is_detection_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a detection export extension.
fn is_detection_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        DETECTION_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Parse every file into one detection list.
///
/// # Errors
///
/// Returns [`Error::NoDetectionFiles`] for an empty file list, or the first
/// parse error encountered.
pub fn load_detections<Tz: TimeZone>(
    files: &[PathBuf],
    facet_column: Option<&str>,
    tz: &Tz,
    show_progress: bool,
) -> Result<Vec<Detection>> {
    if files.is_empty() {
        return Err(Error::NoDetectionFiles);
    }

    let pb = progress::create_file_progress(files.len(), show_progress);
    let mut detections = Vec::new();
    for file in files {
        let parsed = parse_detection_file(file, facet_column, tz)?;
        detections.extend(parsed);
        progress::inc_progress(pb.as_ref());
    }
    progress::finish_progress(pb, "done");

    info!(
        "Loaded {} detections from {} file(s)",
        detections.len(),
        files.len()
    );
    Ok(detections)
}
