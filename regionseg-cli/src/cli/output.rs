//! Volume outputs of the `segment` command.
//!
//! Segmented volumes are written in the same text format [`read_volume`]
//! accepts: the extents on the first line, then one row of `x` values per
//! line.
//!
//! [`read_volume`]: super::read_volume

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use regionseg_core::{RegionId, SegmentationResult, VolumeShape};
use thiserror::Error;
use tracing::{debug, instrument};

use super::commands::CliError;

/// A voxel coordinate given as `x,y` or `x,y,z`.
///
/// # Examples
/// ```
/// use regionseg_cli::cli::VoxelArg;
///
/// let voxel: VoxelArg = "3,1".parse()?;
/// assert_eq!(voxel, VoxelArg { x: 3, y: 1, z: 0 });
/// assert_eq!(voxel.to_string(), "3,1,0");
/// # Ok::<(), regionseg_cli::cli::VoxelParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelArg {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Slice; `0` for planar volumes.
    pub z: usize,
}

impl VoxelArg {
    /// Returns the linear index of the voxel, or `None` when it lies outside
    /// `shape`.
    #[must_use]
    pub fn index_in(&self, shape: VolumeShape) -> Option<usize> {
        (self.x < shape.x() && self.y < shape.y() && self.z < shape.z())
            .then(|| shape.index(self.x, self.y, self.z))
    }
}

impl fmt::Display for VoxelArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Error returned when a voxel coordinate cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("`{provided}` is not a voxel; expected `x,y` or `x,y,z`")]
pub struct VoxelParseError {
    /// The rejected input.
    pub provided: String,
}

impl FromStr for VoxelArg {
    type Err = VoxelParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || VoxelParseError {
            provided: value.to_owned(),
        };
        let coordinates = value
            .split(',')
            .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match coordinates.as_slice() {
            [x, y] => Ok(Self { x: *x, y: *y, z: 0 }),
            [x, y, z] => Ok(Self {
                x: *x,
                y: *y,
                z: *z,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Writes `values` as a text volume of the given `shape`.
///
/// # Errors
/// Returns [`io::Error`] when writing fails.
///
/// # Examples
/// ```
/// use regionseg_cli::cli::write_volume;
/// use regionseg_core::VolumeShape;
///
/// let mut buffer = Vec::new();
/// write_volume(&mut buffer, VolumeShape::planar(2, 2), &[1, 2, 3, 4])?;
/// assert_eq!(String::from_utf8(buffer).expect("volume is UTF-8"), "2 2\n1 2\n3 4\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_volume<T: fmt::Display>(
    mut writer: impl Write,
    shape: VolumeShape,
    values: &[T],
) -> io::Result<()> {
    if shape.z() == 1 {
        writeln!(writer, "{} {}", shape.x(), shape.y())?;
    } else {
        writeln!(writer, "{} {} {}", shape.x(), shape.y(), shape.z())?;
    }
    if shape.x() == 0 {
        return Ok(());
    }
    for row in values.chunks(shape.x()) {
        let mut tokens = row.iter();
        if let Some(first) = tokens.next() {
            write!(writer, "{first}")?;
        }
        for value in tokens {
            write!(writer, " {value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Label volume with every voxel of `selected` set to `1` and the rest `0`.
pub(super) fn selection_mask(result: &SegmentationResult, selected: RegionId) -> Vec<u8> {
    result
        .labels()
        .iter()
        .map(|&label| u8::from(label == selected))
        .collect()
}

#[instrument(
    name = "cli.write_volume",
    err,
    skip(path, values),
    fields(path = %path.display()),
)]
pub(super) fn write_volume_file<T: fmt::Display>(
    path: &Path,
    shape: VolumeShape,
    values: &[T],
) -> Result<(), CliError> {
    let to_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_volume(&mut writer, shape, values).map_err(to_error)?;
    writer.flush().map_err(to_error)?;
    debug!(voxels = values.len(), "volume written");
    Ok(())
}
