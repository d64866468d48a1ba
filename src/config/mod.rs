//! Configuration loading and management.
//!
//! Settings are layered: built-in defaults, then the TOML file, then CLI
//! flags and `BIRDA_ACTIVITY_*` environment variables (handled by clap).

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config, load_config_file, save_config};
pub use paths::{config_dir, config_file_path};
pub use types::{Config, DefaultsConfig, LocationConfig, OutputFormat, ScalingConfig};
pub use validate::{parse_timezone, validate_config};
