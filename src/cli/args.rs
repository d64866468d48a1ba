//! CLI argument definitions.

use crate::activity::BinUnit;
use crate::cli::validators::{
    parse_bin, parse_confidence, parse_latitude, parse_longitude, parse_magnitude_ratio,
    parse_timezone, parse_top_n,
};
use crate::config::OutputFormat;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Species activity tables from bird detection exports.
#[derive(Debug, Parser)]
#[command(name = "birda-activity")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Detection files or directories to aggregate.
    pub inputs: Vec<PathBuf>,

    /// Options shared by all activity commands.
    #[command(flatten)]
    pub activity: ActivityArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write per-species detection totals.
    Summary {
        /// Detection files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Write a species co-occurrence matrix.
    Compare {
        /// Detection files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Activity options. Unset values fall back to the config file.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActivityArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "BIRDA_ACTIVITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum confidence threshold (0.0-1.0).
    #[arg(short = 'c', long, global = true, value_parser = parse_confidence,
          env = "BIRDA_ACTIVITY_MIN_CONFIDENCE")]
    pub min_confidence: Option<f32>,

    /// Species to include (comma-separated labels).
    #[arg(long, global = true, value_delimiter = ',', conflicts_with_all = ["slist", "top"])]
    pub species: Option<Vec<String>>,

    /// Path to species list file, one label per line.
    #[arg(long, global = true, conflicts_with = "top", env = "BIRDA_ACTIVITY_SPECIES_LIST")]
    pub slist: Option<PathBuf>,

    /// Keep only the N most frequently detected species.
    #[arg(long, global = true, value_parser = parse_top_n)]
    pub top: Option<usize>,

    /// Time bin unit (e.g. 10min, 1h, 1d).
    #[arg(short, long, global = true, value_parser = parse_bin, env = "BIRDA_ACTIVITY_BIN")]
    pub bin: Option<BinUnit>,

    /// Column to facet by (e.g. site or station).
    #[arg(long, global = true, env = "BIRDA_ACTIVITY_FACET")]
    pub facet: Option<String>,

    /// IANA time zone for bins and timestamps without offset.
    #[arg(long, global = true, value_parser = parse_timezone, env = "BIRDA_ACTIVITY_TIMEZONE")]
    pub timezone: Option<Tz>,

    /// Latitude for night shading (-90.0 to 90.0).
    #[arg(long, global = true, value_parser = parse_latitude, requires = "lon",
          env = "BIRDA_ACTIVITY_LATITUDE")]
    pub lat: Option<f64>,

    /// Longitude for night shading (-180.0 to 180.0).
    #[arg(long, global = true, value_parser = parse_longitude, requires = "lat",
          env = "BIRDA_ACTIVITY_LONGITUDE")]
    pub lon: Option<f64>,

    /// Skip night interval computation.
    #[arg(long, global = true)]
    pub no_nights: bool,

    /// Add a scaled count column for dominant species.
    #[arg(long, global = true)]
    pub scale_dominant: bool,

    /// Total-count ratio that marks a species as dominant.
    #[arg(long, global = true, value_parser = parse_magnitude_ratio)]
    pub magnitude_ratio: Option<f64>,

    /// Output formats (comma-separated: csv,json).
    #[arg(short, long, global = true, value_delimiter = ',', env = "BIRDA_ACTIVITY_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory.
    #[arg(short, long, global = true, default_value = ".", env = "BIRDA_ACTIVITY_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Omit the UTF-8 BOM from CSV output.
    #[arg(long, global = true)]
    pub no_csv_bom: bool,

    /// Disable progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Suppress progress and info output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
