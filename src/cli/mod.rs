//! CLI argument parsing and command handling.

mod args;
pub mod help;
pub mod validators;

pub use args::{ActivityArgs, Cli, Command, ConfigAction};
