//! Plain-text volume reader.
//!
//! The first non-blank line after stripping `#` comments holds the extents
//! `x y [z]`. Every following line holds whitespace-separated voxel values in
//! x-fastest order. Line numbers in errors are 1-based.

use std::io::{self, BufRead};

use regionseg_core::VolumeShape;
use thiserror::Error;

/// A volume read from text, not yet checked against its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Declared extents.
    pub shape: VolumeShape,
    /// Voxel values in file order.
    pub values: Vec<f64>,
}

/// Errors raised while reading a text volume.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// Reading the underlying stream failed.
    #[error("failed to read volume: {0}")]
    Read(#[from] io::Error),
    /// The input ended before a header line.
    #[error("volume has no `x y [z]` header line")]
    MissingHeader,
    /// The header line is malformed.
    #[error("line {line}: invalid header: {reason}")]
    InvalidHeader {
        /// Line holding the header.
        line: usize,
        /// Why the header was rejected.
        reason: String,
    },
    /// A value token is not a number.
    #[error("line {line}: `{token}` is not a number")]
    InvalidValue {
        /// Line holding the token.
        line: usize,
        /// The rejected token.
        token: String,
    },
}

/// Reads a text volume from `reader`.
///
/// # Errors
/// Returns [`VolumeError`] on I/O failure, a missing or malformed header, or
/// a token that does not parse as `f64`.
///
/// # Examples
/// ```
/// use regionseg_cli::cli::read_volume;
///
/// let volume = read_volume("# demo\n2 2\n0 1\n2 3\n".as_bytes())?;
/// assert_eq!(volume.shape.len(), 4);
/// assert_eq!(volume.values, vec![0.0, 1.0, 2.0, 3.0]);
/// # Ok::<(), regionseg_cli::cli::VolumeError>(())
/// ```
pub fn read_volume(reader: impl BufRead) -> Result<Volume, VolumeError> {
    let mut shape = None;
    let mut values = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let content = strip_comment(&line);
        if content.trim().is_empty() {
            continue;
        }
        match shape {
            None => shape = Some(parse_header(content, line_number)?),
            Some(_) => {
                for token in content.split_whitespace() {
                    let value = token.parse::<f64>().map_err(|_| VolumeError::InvalidValue {
                        line: line_number,
                        token: token.to_owned(),
                    })?;
                    values.push(value);
                }
            }
        }
    }

    let shape = shape.ok_or(VolumeError::MissingHeader)?;
    Ok(Volume { shape, values })
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(content, _)| content)
}

fn parse_header(content: &str, line: usize) -> Result<VolumeShape, VolumeError> {
    let invalid = |reason: String| VolumeError::InvalidHeader { line, reason };
    let extents = content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| invalid(format!("`{token}` is not a non-negative integer")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match extents.as_slice() {
        [x, y] => Ok(VolumeShape::planar(*x, *y)),
        [x, y, z] => Ok(VolumeShape::new(*x, *y, *z)),
        other => Err(invalid(format!(
            "expected 2 or 3 extents, found {}",
            other.len()
        ))),
    }
}
