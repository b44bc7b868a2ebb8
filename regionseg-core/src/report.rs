//! Region identifiers and summaries produced by finalization.

use std::io::{self, Write};

/// Dense, 1-based identifier of a finalized region.
///
/// # Examples
/// ```
/// use regionseg_core::RegionId;
///
/// let id = RegionId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RegionId(usize);

impl RegionId {
    /// Creates a region identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying label.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// Label, size and mean value of one finalized region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionSummary {
    label: RegionId,
    size: usize,
    mean: f64,
}

impl RegionSummary {
    pub(crate) const fn new(label: RegionId, size: usize, mean: f64) -> Self {
        Self { label, size, mean }
    }

    /// Returns the region label.
    #[must_use]
    #[rustfmt::skip]
    pub const fn label(&self) -> RegionId { self.label }

    /// Returns the number of nodes in the region.
    #[must_use]
    #[rustfmt::skip]
    pub const fn size(&self) -> usize { self.size }

    /// Returns the mean node value of the region.
    #[must_use]
    #[rustfmt::skip]
    pub const fn mean(&self) -> f64 { self.mean }
}

/// Writes `regions` as a tab-separated `Region/Size/Mean` table.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, Segmenter, write_region_table};
///
/// let mut segmenter = Segmenter::new(&[1.0, 1.0], vec![Edge::new(0, 1, 0.0)])?;
/// segmenter.sort_edges()?;
/// segmenter.merge_threshold(1.0)?;
/// segmenter.finalize()?;
/// let mut out = Vec::new();
/// write_region_table(&segmenter.report()?, &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "Region\tSize\tMean\n1\t2\t1\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_region_table(regions: &[RegionSummary], mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "Region\tSize\tMean")?;
    for region in regions {
        writeln!(
            writer,
            "{}\t{}\t{}",
            region.label.get(),
            region.size,
            region.mean
        )?;
    }
    Ok(())
}
