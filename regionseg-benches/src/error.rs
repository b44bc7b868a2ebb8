//! Benchmark setup error type.
//!
//! Setup functions propagate failures with `?` and the benchmark entry point
//! panics once with the aggregated message.

use regionseg_core::SegmentError;

use crate::volume::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic volume generation failed.
    #[error("synthetic volume generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building or driving a segmentation failed.
    #[error("segmentation failed: {0}")]
    Segment(#[from] SegmentError),
}
