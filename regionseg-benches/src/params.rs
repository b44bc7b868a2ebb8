//! Benchmark parameter types used as Criterion input identifiers.

use std::fmt;

use regionseg_core::VolumeShape;

/// Parameters of a single segmentation benchmark run.
#[derive(Clone, Debug)]
pub struct SegmentBenchParams {
    /// Extents of the synthetic volume.
    pub shape: VolumeShape,
    /// Edge count produced for the volume.
    pub edge_count: usize,
}

impl fmt::Display for SegmentBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{},e={}",
            self.shape.x(),
            self.shape.y(),
            self.shape.z(),
            self.edge_count
        )
    }
}
