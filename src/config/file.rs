//! Configuration file loading.

use crate::config::{Config, validate_config};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Load and validate configuration from a TOML file.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or fails
/// validation.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_config(&config)?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load configuration from `explicit` or the platform default location.
///
/// When no platform config directory exists the defaults are used.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config_file(path),
        None => match super::config_file_path() {
            Ok(path) => load_config_file(&path),
            Err(_) => Ok(Config::default()),
        },
    }
}

/// Write configuration as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    std::fs::write(path, contents).map_err(|e| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config_file(Path::new("/nonexistent/birda-activity.toml")).unwrap();
        assert_eq!(config.defaults.bin, "1h");
        assert!(config.location.latitude.is_none());
    }

    #[test]
    fn test_load_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[defaults]
min_confidence = 0.25
bin = "30min"
timezone = "Europe/Helsinki"
formats = ["csv", "json"]

[location]
latitude = 60.17
longitude = 24.94

[scaling]
enabled = true
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.defaults.min_confidence, 0.25);
        assert_eq!(config.defaults.bin, "30min");
        assert_eq!(
            config.defaults.formats,
            vec![OutputFormat::Csv, OutputFormat::Json]
        );
        assert_eq!(config.location.latitude, Some(60.17));
        assert!(config.scaling.enabled);
        assert_eq!(config.scaling.magnitude_ratio, 10.0);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();
        assert!(matches!(
            load_config_file(file.path()),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[location]\nlatitude = 123.0").unwrap();
        assert!(matches!(
            load_config_file(file.path()),
            Err(Error::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.defaults.top_n = Some(5);

        save_config(&config, &path).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.defaults.top_n, Some(5));
    }
}
