//! Species activity aggregation.
//!
//! Turns sparse detections into dense, zero-filled time-bin series:
//! filtering and species selection, binning and counting, zero-filling,
//! plus post-processing (summaries, co-occurrence, dominant species scaling).

mod aggregate;
mod bin;
pub mod compare;
pub mod filter;
pub mod scaling;
pub mod summary;
mod types;
mod zero_fill;

pub use aggregate::{
    AggregateParams, Aggregation, aggregate, count_cells, observation_window, to_local,
};
pub use bin::BinUnit;
pub use filter::SpeciesSelection;
pub use types::{
    AggregatedCell, CellKey, DenseRow, DenseTable, Detection, ObservationWindow, SolarInterval,
};
pub use zero_fill::{expand, zero_fill};
