//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::activity::BinUnit;
use chrono_tz::Tz;

/// Parse and validate confidence value (0.0-1.0).
pub fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "confidence must be between 0.0 and 1.0, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate latitude value (-90.0 to 90.0).
pub fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, -90.0, 90.0, "latitude")
}

/// Parse and validate longitude value (-180.0 to 180.0).
pub fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, -180.0, 180.0, "longitude")
}

/// Parse a magnitude ratio, which must exceed 1.
pub fn parse_magnitude_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if !value.is_finite() || value <= 1.0 {
        return Err(format!(
            "magnitude ratio must be a finite number greater than 1, got {value}"
        ));
    }
    Ok(value)
}

/// Parse a bin unit such as `10min`, `1h` or `1d`.
pub fn parse_bin(s: &str) -> Result<BinUnit, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Parse an IANA time zone name.
pub fn parse_timezone(s: &str) -> Result<Tz, String> {
    crate::config::parse_timezone(s).map_err(|e| e.to_string())
}

/// Parse a positive count (at least 1).
pub fn parse_top_n(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("top must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a valid count")),
    }
}
