//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birda-activity";

/// Default minimum confidence threshold for detections.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.1;

/// Default time bin unit.
pub const DEFAULT_BIN: &str = "1h";

/// Default reference time zone.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Species label that classifiers emit when nothing was detected.
pub const NO_DETECTION_LABEL: &str = "nocall";

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for confidence formatting.
    pub const DECIMAL_PLACES: usize = 4;
}

/// Output file names.
pub mod output_files {
    /// Dense activity table.
    pub const ACTIVITY_CSV: &str = "activity.csv";
    /// Dense activity table plus nights as JSON.
    pub const ACTIVITY_JSON: &str = "activity.json";
    /// Night intervals.
    pub const NIGHTS_CSV: &str = "nights.csv";
    /// Per-species summary.
    pub const SUMMARY_CSV: &str = "summary.csv";
    /// Species co-occurrence matrix.
    pub const CO_OCCURRENCE_CSV: &str = "co_occurrence.csv";
}

/// Extensions recognised as detection exports when scanning directories.
pub const DETECTION_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Timestamp formats accepted for naive (offset-less) timestamps.
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Label format for time bins in output tables.
pub const BIN_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Dominant species rescaling constants.
pub mod scaling {
    /// Default total-count ratio over the median of other species.
    pub const DEFAULT_MAGNITUDE_RATIO: f64 = 10.0;
}

/// Solar geometry constants.
pub mod solar {
    /// Julian date of the J2000.0 epoch.
    pub const J2000: f64 = 2_451_545.0;

    /// Julian date of the Unix epoch.
    pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

    /// Sun altitude at sunrise/sunset in degrees (refraction plus disc radius).
    pub const HORIZON_ALTITUDE_DEG: f64 = -0.833;

    /// Obliquity of the ecliptic in degrees.
    pub const OBLIQUITY_DEG: f64 = 23.4397;

    /// Argument of perihelion of the Earth in degrees.
    pub const PERIHELION_DEG: f64 = 102.9372;

    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
