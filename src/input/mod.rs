//! Detection export reading.
//!
//! Normalizes delimited detection exports with a timestamp column (BirdNET-Pi
//! exports, generic tables) into [`Detection`](crate::activity::Detection)
//! records with absolute timestamps.

mod columns;
mod parser;
mod species_list;
mod timestamp;

pub use columns::{ColumnMap, TimestampColumns};
pub use parser::{parse_detection_file, parse_detections, sniff_delimiter};
pub use species_list::read_species_list;
pub use timestamp::parse_timestamp;
