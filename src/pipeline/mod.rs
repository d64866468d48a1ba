//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{collect_input_files, load_detections};
pub use processor::{
    ActivityOptions, ActivityReport, build_activity, build_comparison, build_summary,
    ensure_output_dir, write_activity,
};
