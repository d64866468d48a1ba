//! Birda Activity - species activity tables from bird detection exports.
//!
//! This crate turns sparse detection records into dense, zero-filled
//! time-bin series per species, with optional night intervals for shading.

#![warn(missing_docs)]

pub mod activity;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod solar;

use activity::{BinUnit, SpeciesSelection};
use chrono_tz::Tz;
use clap::Parser;
use cli::{ActivityArgs, Cli, Command};
use config::{Config, OutputFormat, load_config, parse_timezone, save_config};
use constants::output_files;
use output::JsonSettings;
use pipeline::{
    ActivityOptions, build_activity, build_comparison, build_summary, collect_input_files,
    ensure_output_dir, load_detections, write_activity,
};
use solar::SiteLocation;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the birda-activity CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.activity.verbose, cli.activity.quiet);

    let config = load_config(cli.activity.config.as_deref())?;

    if let Some(command) = cli.command {
        return handle_command(command, &cli.activity, &config);
    }

    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    run_activity(&cli.inputs, &cli.activity, &config)
}

/// Settings after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Minimum confidence threshold.
    pub min_confidence: f32,
    /// Species selection.
    pub selection: SpeciesSelection,
    /// Time bin unit.
    pub bin: BinUnit,
    /// Reference time zone.
    pub timezone: Tz,
    /// Facet column name.
    pub facet_column: Option<String>,
    /// Recording site.
    pub location: Option<SiteLocation>,
    /// Compute night intervals.
    pub nights: bool,
    /// Dominant species magnitude ratio, `None` when rescaling is off.
    pub scaling: Option<f64>,
    /// Output formats.
    pub formats: Vec<OutputFormat>,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Write a UTF-8 BOM to CSV files.
    pub csv_bom: bool,
    /// Show progress bars.
    pub progress: bool,
}

/// Merge CLI arguments over configuration values.
///
/// # Errors
///
/// Returns an error if a config value is invalid or the species list file
/// cannot be read.
pub fn resolve_settings(args: &ActivityArgs, config: &Config) -> Result<Settings> {
    let defaults = &config.defaults;

    let selection = if let Some(species) = &args.species {
        SpeciesSelection::List(species.clone())
    } else if let Some(path) = &args.slist {
        info!("Loading species list: {}", path.display());
        let species = input::read_species_list(path)?;
        info!("Species list loaded: {} species", species.len());
        SpeciesSelection::List(species)
    } else if let Some(n) = args.top.or(defaults.top_n) {
        SpeciesSelection::TopN(n)
    } else {
        SpeciesSelection::All
    };

    let bin = match args.bin {
        Some(bin) => bin,
        None => defaults.bin.parse()?,
    };
    let timezone = match args.timezone {
        Some(tz) => tz,
        None => parse_timezone(&defaults.timezone)?,
    };

    let location = match (
        args.lat.or(config.location.latitude),
        args.lon.or(config.location.longitude),
    ) {
        (Some(lat), Some(lon)) => Some(SiteLocation::new(lat, lon)?),
        (None, None) => None,
        _ => {
            warn!("Only one of latitude/longitude is set; night shading disabled");
            None
        }
    };

    let scaling = (args.scale_dominant || config.scaling.enabled).then(|| {
        args.magnitude_ratio
            .unwrap_or(config.scaling.magnitude_ratio)
    });

    Ok(Settings {
        min_confidence: args.min_confidence.unwrap_or(defaults.min_confidence),
        selection,
        bin,
        timezone,
        facet_column: args.facet.clone().or_else(|| defaults.facet_column.clone()),
        location,
        nights: !args.no_nights,
        scaling,
        formats: args
            .format
            .clone()
            .unwrap_or_else(|| defaults.formats.clone()),
        output_dir: args.output_dir.clone(),
        csv_bom: !args.no_csv_bom,
        progress: !args.quiet && !args.no_progress,
    })
}

/// Load every detection file under `inputs` with the resolved settings.
fn load_inputs(inputs: &[PathBuf], settings: &Settings) -> Result<Vec<activity::Detection>> {
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoDetectionFiles);
    }
    info!("Found {} detection file(s)", files.len());

    load_detections(
        &files,
        settings.facet_column.as_deref(),
        &settings.timezone,
        settings.progress,
    )
}

/// Build and write the activity table.
fn run_activity(inputs: &[PathBuf], args: &ActivityArgs, config: &Config) -> Result<()> {
    use std::time::Instant;

    let start = Instant::now();
    let settings = resolve_settings(args, config)?;
    let detections = load_inputs(inputs, &settings)?;

    let options = ActivityOptions {
        min_confidence: settings.min_confidence,
        selection: settings.selection.clone(),
        bin: settings.bin,
        faceted: settings.facet_column.is_some(),
        location: settings.location,
        nights: settings.nights,
        scaling: settings.scaling,
    };

    let Some(report) = build_activity(&detections, &options, &settings.timezone) else {
        info!(
            "No detections at or above confidence {} for the selected species; nothing written",
            settings.min_confidence
        );
        return Ok(());
    };

    let json_settings = JsonSettings {
        min_confidence: settings.min_confidence,
        bin: settings.bin.to_string(),
        timezone: settings.timezone.name().to_string(),
        facet_column: settings.facet_column.clone(),
        lat: settings.location.map(|l| l.latitude),
        lon: settings.location.map(|l| l.longitude),
    };
    let written = write_activity(
        &report,
        &settings.output_dir,
        &settings.formats,
        &json_settings,
        settings.csv_bom,
    )?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    info!(
        "Complete: {} detections, {} species, {} bins, {} rows in {:.2}s",
        report.detections_used,
        report.table.species.len(),
        report.table.bins.len(),
        report.table.rows.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_summary(inputs: &[PathBuf], args: &ActivityArgs, config: &Config) -> Result<()> {
    let settings = resolve_settings(args, config)?;
    let detections = load_inputs(inputs, &settings)?;

    let Some(summaries) = build_summary(
        &detections,
        settings.min_confidence,
        &settings.selection,
        settings.bin,
        &settings.timezone,
    ) else {
        info!("No detections passed the filters; nothing written");
        return Ok(());
    };

    ensure_output_dir(&settings.output_dir)?;
    let path = settings.output_dir.join(output_files::SUMMARY_CSV);
    output::write_summary_csv(&path, &summaries, settings.csv_bom)?;
    info!("Wrote summary of {} species to {}", summaries.len(), path.display());
    Ok(())
}

fn run_compare(inputs: &[PathBuf], args: &ActivityArgs, config: &Config) -> Result<()> {
    let settings = resolve_settings(args, config)?;
    let detections = load_inputs(inputs, &settings)?;

    let Some(matrix) = build_comparison(
        &detections,
        settings.min_confidence,
        &settings.selection,
        settings.bin,
        &settings.timezone,
    )?
    else {
        info!("No detections passed the filters; nothing written");
        return Ok(());
    };

    ensure_output_dir(&settings.output_dir)?;
    let path = settings.output_dir.join(output_files::CO_OCCURRENCE_CSV);
    output::write_co_occurrence_csv(&path, &matrix, settings.csv_bom)?;
    info!(
        "Wrote co-occurrence of {} species to {}",
        matrix.species.len(),
        path.display()
    );
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, args: &ActivityArgs, config: &Config) -> Result<()> {
    match command {
        Command::Summary { inputs } => run_summary(&inputs, args, config),
        Command::Compare { inputs } => run_compare(&inputs, args, config),
        Command::Config { action } => handle_config_command(action, args.config.as_deref()),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction, explicit: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nSet [location] latitude/longitude to enable night shading.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(&path))?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{rendered}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
