//! Error types for birda-activity.

/// Result type alias for birda-activity operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birda-activity.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No detection files found.
    #[error("no detection files found in the provided paths")]
    NoDetectionFiles,

    /// Failed to open or read a detection file.
    #[error("failed to parse detection file '{path}'")]
    DetectionParseFailed {
        /// Path to the detection file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A required column is absent from a detection file.
    #[error("detection file '{path}' is missing required column: {column}")]
    MissingColumn {
        /// Path to the detection file.
        path: std::path::PathBuf,
        /// Logical name of the missing column.
        column: String,
    },

    /// Invalid detection file content.
    #[error("invalid detection file format: {message}")]
    InvalidDetectionFormat {
        /// Description of the format error.
        message: String,
    },

    /// Timestamp could not be parsed or resolved to an absolute instant.
    #[error("invalid timestamp: '{value}'")]
    InvalidTimestamp {
        /// The offending value.
        value: String,
    },

    /// Invalid time bin unit.
    #[error("invalid bin unit '{value}': {reason}")]
    InvalidBinUnit {
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown time zone name.
    #[error("unknown time zone: {value}")]
    InvalidTimezone {
        /// The offending value.
        value: String,
    },

    /// Invalid latitude value.
    #[error("invalid latitude: {value} (must be -90.0 to 90.0)")]
    InvalidLatitude {
        /// Invalid latitude value.
        value: f64,
    },

    /// Invalid longitude value.
    #[error("invalid longitude: {value} (must be -180.0 to 180.0)")]
    InvalidLongitude {
        /// Invalid longitude value.
        value: f64,
    },

    /// An operation comparing species got fewer than two of them.
    #[error("species comparison needs at least 2 species with detections, found {found}")]
    InsufficientSpecies {
        /// Number of species available.
        found: usize,
    },

    /// Failed to read species list file.
    #[error("failed to read species list file '{path}'")]
    SpeciesListRead {
        /// Path to the species list file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write JSON output.
    #[error("failed to write JSON output '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
