//! Command-line interface for segmenting text volumes.
//!
//! The `segment` command reads a plain-text volume, runs the configured
//! segmentation and renders the regions as text or JSON. It can also write
//! the mean-substituted volume and the region mask back as text volumes.

mod commands;
mod output;
mod volume;

pub use commands::{
    AlgorithmArg, Cli, CliError, Command, ConnectivityArg, ExecutionSummary, OutputFormat,
    SegmentCommand, render_summary, run_cli,
};
pub use output::{VoxelArg, VoxelParseError, write_volume};
pub use volume::{Volume, VolumeError, read_volume};
