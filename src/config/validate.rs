//! Configuration validation.

use crate::activity::BinUnit;
use crate::config::Config;
use crate::constants::confidence;
use crate::error::{Error, Result};
use chrono_tz::Tz;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    validate_location(config)?;
    validate_scaling(config)?;
    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if !(confidence::MIN..=confidence::MAX).contains(&defaults.min_confidence) {
        return Err(Error::ConfigValidation {
            message: format!(
                "min_confidence must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                defaults.min_confidence
            ),
        });
    }

    if defaults.top_n == Some(0) {
        return Err(Error::ConfigValidation {
            message: "top_n must be at least 1".to_string(),
        });
    }

    defaults.bin.parse::<BinUnit>()?;
    parse_timezone(&defaults.timezone)?;

    Ok(())
}

/// Validate site coordinates.
fn validate_location(config: &Config) -> Result<()> {
    if let Some(lat) = config.location.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(Error::InvalidLatitude { value: lat });
    }

    if let Some(lon) = config.location.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(Error::InvalidLongitude { value: lon });
    }

    Ok(())
}

/// Validate rescaling settings.
fn validate_scaling(config: &Config) -> Result<()> {
    let ratio = config.scaling.magnitude_ratio;
    if !ratio.is_finite() || ratio <= 1.0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "scaling.magnitude_ratio must be a finite number greater than 1, got {ratio}"
            ),
        });
    }
    Ok(())
}

/// Parse an IANA time zone name.
///
/// # Errors
///
/// Returns [`Error::InvalidTimezone`] for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse::<Tz>().map_err(|_| Error::InvalidTimezone {
        value: name.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_confidence() {
        let mut config = Config::default();
        config.defaults.min_confidence = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_top_n() {
        let mut config = Config::default();
        config.defaults.top_n = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_bin() {
        let mut config = Config::default();
        config.defaults.bin = "7min".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidBinUnit { .. })
        ));
    }

    #[test]
    fn test_validate_bad_timezone() {
        let mut config = Config::default();
        config.defaults.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidTimezone { .. })
        ));
    }

    #[test]
    fn test_validate_invalid_latitude() {
        let mut config = Config::default();
        config.location.latitude = Some(100.0);
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn test_validate_invalid_longitude() {
        let mut config = Config::default();
        config.location.longitude = Some(200.0);
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidLongitude { .. })
        ));
    }

    #[test]
    fn test_validate_scaling_ratio() {
        let mut config = Config::default();
        config.scaling.magnitude_ratio = 1.0;
        assert!(validate_config(&config).is_err());
        config.scaling.magnitude_ratio = f64::NAN;
        assert!(validate_config(&config).is_err());
        config.scaling.magnitude_ratio = f64::INFINITY;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Helsinki").unwrap(), Tz::Europe__Helsinki);
        assert_eq!(parse_timezone("UTC").unwrap(), Tz::UTC);
    }
}
