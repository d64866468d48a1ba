//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print a short usage guide, mentioning the active site if one is configured.
pub fn print_smart_help(config: &Config) {
    println!("{}", usage_text(config));
}

/// Build the usage guide shown when no inputs are given.
pub fn usage_text(config: &Config) -> String {
    let mut text = String::from("Usage: birda-activity [FILES]... [OPTIONS]\n\n");
    text.push_str("Examples:\n");
    text.push_str("  birda-activity BirdDB.txt -b 1h\n");
    text.push_str("  birda-activity results/ --top 10 --lat 60.17 --lon 24.94\n");
    text.push_str("  birda-activity summary results/\n");
    text.push_str("  birda-activity compare results/ -b 30min\n\n");

    match (config.location.latitude, config.location.longitude) {
        _ if !crate::solar::is_available() => {
            text.push_str("Night shading is not available in this build.\n");
        }
        (Some(lat), Some(lon)) => {
            text.push_str(&format!(
                "Night shading uses the configured site ({lat:.4}, {lon:.4}).\n"
            ));
        }
        _ => {
            text.push_str("Set --lat/--lon or [location] in the config file to shade nights.\n");
            text.push_str("Create a config file with 'birda-activity config init'.\n");
        }
    }

    text.push_str("\nRun 'birda-activity -h' for all options.");
    text
}
