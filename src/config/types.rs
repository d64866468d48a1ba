//! Configuration type definitions.

use crate::constants::{
    DEFAULT_BIN, DEFAULT_MIN_CONFIDENCE, DEFAULT_TIMEZONE, scaling::DEFAULT_MAGNITUDE_RATIO,
};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Recording site used for night shading.
    #[serde(default)]
    pub location: LocationConfig,

    /// Dominant species rescaling.
    #[serde(default)]
    pub scaling: ScalingConfig,
}

/// Default activity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Minimum confidence threshold.
    pub min_confidence: f32,

    /// Time bin unit, e.g. `1h` or `10min`.
    pub bin: String,

    /// Limit tables to the most frequent species.
    pub top_n: Option<usize>,

    /// IANA time zone for binning and timestamps without offset.
    pub timezone: String,

    /// Column used as facet (e.g. site).
    pub facet_column: Option<String>,

    /// Output formats.
    pub formats: Vec<OutputFormat>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            bin: DEFAULT_BIN.to_string(),
            top_n: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            facet_column: None,
            formats: vec![OutputFormat::Csv],
        }
    }
}

/// Recording site coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Latitude (-90.0 to 90.0).
    pub latitude: Option<f64>,
    /// Longitude (-180.0 to 180.0).
    pub longitude: Option<f64>,
}

/// Dominant species rescaling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Emit a scaled count column for dominant species.
    pub enabled: bool,
    /// Total-count ratio over the median of other species.
    pub magnitude_ratio: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            magnitude_ratio: DEFAULT_MAGNITUDE_RATIO,
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated tables.
    Csv,
    /// Single JSON document.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
