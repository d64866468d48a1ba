//! Timestamp parsing.

use crate::constants::NAIVE_TIMESTAMP_FORMATS;
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a timestamp into an absolute instant.
///
/// Values with an offset (RFC 3339 or `YYYY-MM-DD HH:MM:SS+HH:MM`) keep it.
/// Naive values are read as wall-clock time in `tz`; ambiguous times resolve
/// to the earlier instant.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if no format matches or the local
/// time does not exist in `tz` (skipped by a DST transition).
pub fn parse_timestamp<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let value = value.trim();
    let invalid = || Error::InvalidTimestamp {
        value: value.to_string(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(invalid)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(invalid)
}
