//! Command implementations and argument parsing for the regionseg CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use regionseg_core::{
    Connectivity, MergeAlgorithm, RegionId, SegmentError, SegmentationBuilder,
    SegmentationResult, VolumeShape, write_region_table,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::output::{VoxelArg, selection_mask, write_volume_file};
use super::volume::{Volume, VolumeError, read_volume};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "regionseg", about = "Segment scalar volumes into regions.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Segment a text volume, print its regions and optionally write the
    /// segmented volumes.
    Segment(SegmentCommand),
}

/// Options accepted by the `segment` command.
#[derive(Debug, Args, Clone)]
pub struct SegmentCommand {
    /// Path to a text volume: an `x y [z]` header followed by the values.
    pub path: PathBuf,

    /// Primary merge algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Statistical)]
    pub algorithm: AlgorithmArg,

    /// Which neighbouring voxels are connected.
    #[arg(long, value_enum, default_value_t = ConnectivityArg::Face)]
    pub connectivity: ConnectivityArg,

    /// Segmentation complexity; higher values yield more regions.
    #[arg(long, default_value_t = 1.0)]
    pub complexity: f64,

    /// Regions smaller than this are absorbed into a neighbour; 0 disables.
    #[arg(long = "min-size", default_value_t = 0)]
    pub min_size: usize,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Writes the volume with every voxel replaced by its region mean.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Writes the region label of every voxel.
    #[arg(long, value_name = "PATH")]
    pub mask: Option<PathBuf>,

    /// Reduces the mask to the region containing this voxel.
    #[arg(long, value_name = "X,Y[,Z]", requires = "mask")]
    pub voxel: Option<VoxelArg>,
}

/// Merge algorithms selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// Size-adaptive threshold derived from the value spread.
    Threshold,
    /// Statistical region merging.
    Statistical,
}

impl From<AlgorithmArg> for MergeAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Threshold => Self::Threshold,
            AlgorithmArg::Statistical => Self::Statistical,
        }
    }
}

/// Voxel connectivity selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectivityArg {
    /// Face neighbours only.
    Face,
    /// Face, edge and corner neighbours.
    Full,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(value: ConnectivityArg) -> Self {
        match value {
            ConnectivityArg::Face => Self::Face,
            ConnectivityArg::Full => Self::Full,
        }
    }
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header lines followed by a tab-separated region table.
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input file is not a valid text volume.
    #[error("`{path}`: {source}")]
    Volume {
        /// Path of the rejected volume.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: VolumeError,
    },
    /// An output volume could not be written.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Destination that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The selected voxel lies outside the volume.
    #[error(
        "voxel {voxel} lies outside the {}x{}x{} volume",
        .shape.x(),
        .shape.y(),
        .shape.z()
    )]
    VoxelOutOfRange {
        /// The requested voxel.
        voxel: VoxelArg,
        /// Extents of the loaded volume.
        shape: VolumeShape,
    },
    /// Configuration or segmentation failed.
    #[error(transparent)]
    Core(#[from] SegmentError),
}

/// Outcome of a `segment` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Input name derived from the file stem.
    pub input: String,
    /// Algorithm that produced the result.
    pub algorithm: MergeAlgorithm,
    /// Requested output format.
    pub format: OutputFormat,
    /// Segmentation labels and regions.
    pub result: SegmentationResult,
    /// Region containing the voxel passed with `--voxel`.
    pub selected: Option<RegionId>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading the input or segmenting it fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use regionseg_cli::cli::{
/// #     AlgorithmArg, Cli, Command, ConnectivityArg, OutputFormat, SegmentCommand, run_cli,
/// # };
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "4 1\n0 0 10 10\n")?;
/// let cli = Cli {
///     command: Command::Segment(SegmentCommand {
///         path: file.path().to_path_buf(),
///         algorithm: AlgorithmArg::Threshold,
///         connectivity: ConnectivityArg::Face,
///         complexity: 1.0,
///         min_size: 0,
///         format: OutputFormat::Text,
///         output: None,
///         mask: None,
///         voxel: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.region_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Segment(segment) => {
            Span::current().record("command", field::display("segment"));
            run_segment(segment)
        }
    }
}

#[instrument(
    name = "cli.segment",
    err,
    skip(command),
    fields(path = %command.path.display(), algorithm = ?command.algorithm),
)]
pub(super) fn run_segment(command: SegmentCommand) -> Result<ExecutionSummary, CliError> {
    let algorithm = MergeAlgorithm::from(command.algorithm);
    let segmentation = SegmentationBuilder::new()
        .with_algorithm(algorithm)
        .with_connectivity(command.connectivity.into())
        .with_complexity(command.complexity)
        .with_min_region_size(command.min_size)
        .build()?;

    let Volume { shape, values } = load_volume(&command.path)?;
    let selected_voxel = command
        .voxel
        .map(|voxel| {
            voxel
                .index_in(shape)
                .ok_or(CliError::VoxelOutOfRange { voxel, shape })
        })
        .transpose()?;
    let result = segmentation.run(shape, &values)?;
    let selected = selected_voxel.and_then(|index| result.labels().get(index).copied());

    if let Some(path) = &command.output {
        write_volume_file(path, shape, &result.mean_image())?;
    }
    if let Some(path) = &command.mask {
        match selected {
            Some(label) => write_volume_file(path, shape, &selection_mask(&result, label))?,
            None => write_volume_file(path, shape, &result.label_image())?,
        }
    }

    let input = derive_input_name(&command.path);
    info!(
        input = input.as_str(),
        regions = result.region_count(),
        "segment command completed"
    );
    Ok(ExecutionSummary {
        input,
        algorithm,
        format: command.format,
        result,
        selected,
    })
}

#[instrument(name = "cli.load_volume", err)]
pub(super) fn load_volume(path: &Path) -> Result<Volume, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_volume(BufReader::new(file)).map_err(|source| CliError::Volume {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_input_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "volume".to_owned(), ToOwned::to_owned)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    algorithm: MergeAlgorithm,
    region_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_region: Option<RegionId>,
    #[serde(flatten)]
    result: &'a SegmentationResult,
}

/// Renders `summary` to `writer` in its requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Text => render_text(summary, writer),
        OutputFormat::Json => {
            let report = JsonReport {
                input: &summary.input,
                algorithm: summary.algorithm,
                region_count: summary.result.region_count(),
                selected_region: summary.selected,
                result: &summary.result,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)
        }
    }
}

fn render_text(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let shape = summary.result.shape();
    writeln!(writer, "input: {}", summary.input)?;
    writeln!(writer, "shape: {}x{}x{}", shape.x(), shape.y(), shape.z())?;
    writeln!(writer, "algorithm: {}", summary.algorithm.as_str())?;
    writeln!(writer, "threshold: {}", summary.result.threshold())?;
    writeln!(writer, "regions: {}", summary.result.region_count())?;
    if let Some(label) = summary.selected {
        writeln!(writer, "selected region: {}", label.get())?;
    }
    write_region_table(summary.result.regions(), writer)
}
