//! Detection file parsing.
//!
//! Uses the `csv` crate for quoting and escaping. The delimiter is sniffed
//! from the header line so comma, semicolon and tab separated exports all
//! read the same way.

use crate::activity::Detection;
use crate::constants::UTF8_BOM;
use crate::error::{Error, Result};
use crate::input::{ColumnMap, TimestampColumns, parse_timestamp};
use chrono::TimeZone;
use std::path::Path;
use tracing::debug;

/// Guess the field delimiter from the first line.
///
/// Picks whichever of tab, semicolon and comma occurs most often, preferring
/// that order on ties. Defaults to comma.
pub fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    [b'\t', b';', b',']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, n)| n > 0)
        .fold(None, |best: Option<(u8, usize)>, cand| match best {
            Some(b) if b.1 >= cand.1 => Some(b),
            _ => Some(cand),
        })
        .map_or(b',', |(d, _)| d)
}

/// Parse a detection export from disk.
///
/// Returns `Ok(vec![])` if the file is empty or has only a header.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - A required column is missing
/// - A row has an unparseable timestamp, confidence or empty species
pub fn parse_detection_file<Tz: TimeZone>(
    path: &Path,
    facet_column: Option<&str>,
    tz: &Tz,
) -> Result<Vec<Detection>> {
    let bytes = std::fs::read(path).map_err(|e| Error::DetectionParseFailed {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    let content = std::str::from_utf8(bytes).map_err(|e| Error::DetectionParseFailed {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let detections = parse_detections(content, path, facet_column, tz)?;
    debug!(
        "Read {} detections from {}",
        detections.len(),
        path.display()
    );
    Ok(detections)
}

/// Parse detection rows from in-memory text.
///
/// `source` is only used in error messages.
///
/// # Errors
///
/// See [`parse_detection_file`].
pub fn parse_detections<Tz: TimeZone>(
    content: &str,
    source: &Path,
    facet_column: Option<&str>,
    tz: &Tz,
) -> Result<Vec<Detection>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(sniff_delimiter(content))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::DetectionParseFailed {
            path: source.to_path_buf(),
            source: Box::new(e),
        })?
        .clone();
    let header_fields: Vec<&str> = headers.iter().collect();
    let columns = ColumnMap::resolve(&header_fields, facet_column, source)?;

    let mut detections = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| Error::InvalidDetectionFormat {
            message: format!("{} line {line}: {e}", source.display()),
        })?;

        if record.len() <= columns.max_index() {
            return Err(Error::InvalidDetectionFormat {
                message: format!(
                    "{} line {line}: expected at least {} fields, found {}",
                    source.display(),
                    columns.max_index() + 1,
                    record.len()
                ),
            });
        }
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let raw_timestamp = match columns.timestamp {
            TimestampColumns::Single(idx) => field(idx).to_string(),
            TimestampColumns::DateAndTime { date, time } => {
                format!("{} {}", field(date), field(time))
            }
        };
        let timestamp = parse_timestamp(&raw_timestamp, tz)?;

        let species = field(columns.species);
        if species.is_empty() {
            return Err(Error::InvalidDetectionFormat {
                message: format!("{} line {line}: empty species label", source.display()),
            });
        }

        let confidence: f32 = field(columns.confidence).parse().map_err(|_| {
            Error::InvalidDetectionFormat {
                message: format!(
                    "{} line {line}: invalid confidence '{}'",
                    source.display(),
                    field(columns.confidence)
                ),
            }
        })?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidDetectionFormat {
                message: format!(
                    "{} line {line}: confidence {confidence} outside 0.0-1.0",
                    source.display()
                ),
            });
        }

        let facet = columns
            .facet
            .map(|idx| field(idx).to_string())
            .filter(|f| !f.is_empty());

        detections.push(Detection {
            timestamp,
            species: species.to_string(),
            confidence,
            facet,
        });
    }

    Ok(detections)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("single"), b',');
        // Commas inside a semicolon export do not win.
        assert_eq!(sniff_delimiter("date;\"Owl, Barn\";x;y"), b';');
    }

    #[test]
    fn test_parse_generic_csv() {
        let content = "timestamp,species,confidence\n\
                       2024-05-01T10:00:00Z,Parus major,0.85\n\
                       2024-05-01T10:05:00Z,\"Owl, Barn\",0.92\n";
        let detections = parse_detections(content, Path::new("t.csv"), None, &Utc).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].species, "Parus major");
        assert_eq!(detections[1].species, "Owl, Barn");
        assert_eq!(detections[1].confidence, 0.92);
        assert!(detections[0].facet.is_none());
    }

    #[test]
    fn test_parse_birdnet_pi_tab_separated() {
        let content = "Date\tTime\tSci_Name\tCom_Name\tConfidence\n\
                       2024-05-01\t05:12:30\tTurdus merula\tEurasian Blackbird\t0.81\n";
        let detections = parse_detections(content, Path::new("t.txt"), None, &Utc).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].species, "Eurasian Blackbird");
        assert_eq!(
            detections[0].timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 5, 12, 30).unwrap()
        );
    }

    #[test]
    fn test_parse_facet_column() {
        let content = "timestamp,species,confidence,site\n\
                       2024-05-01 10:00:00,A,0.5,north\n\
                       2024-05-01 10:00:00,A,0.5,\n";
        let detections =
            parse_detections(content, Path::new("t.csv"), Some("site"), &Utc).unwrap();
        assert_eq!(detections[0].facet.as_deref(), Some("north"));
        assert!(detections[1].facet.is_none());
    }

    #[test]
    fn test_missing_column_is_error() {
        let content = "timestamp,species\n2024-05-01 10:00:00,A\n";
        let result = parse_detections(content, Path::new("t.csv"), None, &Utc);
        assert!(matches!(result, Err(Error::MissingColumn { .. })));
    }

    #[test]
    fn test_invalid_confidence_is_error() {
        let content = "timestamp,species,confidence\n2024-05-01 10:00:00,A,high\n";
        let result = parse_detections(content, Path::new("t.csv"), None, &Utc);
        assert!(matches!(result, Err(Error::InvalidDetectionFormat { .. })));

        let content = "timestamp,species,confidence\n2024-05-01 10:00:00,A,85\n";
        let result = parse_detections(content, Path::new("t.csv"), None, &Utc);
        assert!(matches!(result, Err(Error::InvalidDetectionFormat { .. })));
    }

    #[test]
    fn test_short_row_is_error() {
        let content = "timestamp,species,confidence\n2024-05-01 10:00:00,A\n";
        let result = parse_detections(content, Path::new("t.csv"), None, &Utc);
        assert!(matches!(result, Err(Error::InvalidDetectionFormat { .. })));
    }

    #[test]
    fn test_parse_file_with_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(UTF8_BOM).unwrap();
        writeln!(file, "Timestamp,Species,Confidence").unwrap();
        writeln!(file, "2024-05-01 10:00:00,A,0.5").unwrap();
        file.flush().unwrap();

        let detections = parse_detection_file(file.path(), None, &Utc).unwrap();
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn test_header_only_and_empty_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,species,confidence").unwrap();
        file.flush().unwrap();
        assert!(
            parse_detection_file(file.path(), None, &Utc)
                .unwrap()
                .is_empty()
        );

        let empty = NamedTempFile::new().unwrap();
        assert!(
            parse_detection_file(empty.path(), None, &Utc)
                .unwrap()
                .is_empty()
        );
    }
}
