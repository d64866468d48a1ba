//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Configuration directory for the current platform.
///
/// - Linux: `~/.config/birda-activity/`
/// - macOS: `~/Library/Application Support/birda-activity/`
/// - Windows: `%APPDATA%\birda-activity\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path to `config.toml`.
pub fn config_file_path() -> Result<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
