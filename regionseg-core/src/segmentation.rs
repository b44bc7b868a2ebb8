//! End-to-end segmentation of regular voxel volumes.

use tracing::{info, instrument};

use crate::{
    Result,
    builder::MergeAlgorithm,
    grid::{Connectivity, VolumeShape, grid_edges},
    report::{RegionId, RegionSummary},
    segmenter::Segmenter,
};

/// A validated segmentation configuration, built by
/// [`SegmentationBuilder`](crate::SegmentationBuilder).
///
/// # Examples
/// ```
/// use regionseg_core::{MergeAlgorithm, SegmentationBuilder, VolumeShape};
///
/// let segmentation = SegmentationBuilder::new()
///     .with_algorithm(MergeAlgorithm::Threshold)
///     .build()?;
/// let values = [0.0, 0.0, 10.0, 10.0];
/// let result = segmentation.run(VolumeShape::planar(4, 1), &values)?;
/// assert_eq!(result.region_count(), 2);
/// assert_eq!(result.label_image(), vec![1, 1, 2, 2]);
/// assert_eq!(result.mean_image(), vec![0.0, 0.0, 10.0, 10.0]);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Segmentation {
    algorithm: MergeAlgorithm,
    connectivity: Connectivity,
    complexity: f64,
    min_region_size: usize,
}

impl Segmentation {
    pub(crate) fn new(
        algorithm: MergeAlgorithm,
        connectivity: Connectivity,
        complexity: f64,
        min_region_size: usize,
    ) -> Self {
        Self {
            algorithm,
            connectivity,
            complexity,
            min_region_size,
        }
    }

    /// Returns the primary merge algorithm.
    #[must_use]
    #[rustfmt::skip]
    pub fn algorithm(&self) -> MergeAlgorithm { self.algorithm }

    /// Returns the grid connectivity.
    #[must_use]
    #[rustfmt::skip]
    pub fn connectivity(&self) -> Connectivity { self.connectivity }

    /// Returns the complexity.
    #[must_use]
    #[rustfmt::skip]
    pub fn complexity(&self) -> f64 { self.complexity }

    /// Returns the minimum region size, `0` when the clean-up pass is off.
    #[must_use]
    #[rustfmt::skip]
    pub fn min_region_size(&self) -> usize { self.min_region_size }

    /// Segments a volume: builds the grid edges, sorts them, runs the
    /// primary policy, absorbs small regions when configured and finalizes.
    ///
    /// Both algorithms are driven by the threshold `stddev(values) /
    /// complexity`, so a larger complexity yields more regions and scaling
    /// the values leaves the partition unchanged.
    ///
    /// # Errors
    /// Returns [`SegmentError::ShapeMismatch`](crate::SegmentError::ShapeMismatch)
    /// when `values` does not fill `shape` and
    /// [`SegmentError::InvalidWeight`](crate::SegmentError::InvalidWeight)
    /// when a non-finite value produces a non-finite edge weight.
    #[instrument(
        name = "segment.run",
        err,
        skip(self, values),
        fields(
            voxels = values.len(),
            algorithm = self.algorithm.as_str(),
            connectivity = ?self.connectivity,
            complexity = self.complexity,
            min_region_size = self.min_region_size,
        ),
    )]
    pub fn run(&self, shape: VolumeShape, values: &[f64]) -> Result<SegmentationResult> {
        let edges = grid_edges(shape, values, self.connectivity)?;
        let mut segmenter = Segmenter::new(values, edges)?;
        segmenter.sort_edges()?;

        let threshold = population_stddev(values) / self.complexity;
        match self.algorithm {
            MergeAlgorithm::Threshold => segmenter.merge_threshold(threshold)?,
            MergeAlgorithm::Statistical => {
                // Zero spread means every value is equal, and any positive
                // scale then merges the whole volume.
                let scale = if threshold > 0.0 { threshold } else { 1.0 };
                segmenter.merge_statistical(scale)?
            }
        };
        if self.min_region_size > 0 {
            segmenter.merge_small(self.min_region_size)?;
        }
        let regions = segmenter.finalize()?;

        let result = SegmentationResult {
            shape,
            labels: segmenter.labels()?,
            regions: segmenter.report()?,
            threshold,
        };
        info!(regions, voxels = values.len(), "segmentation complete");
        Ok(result)
    }
}

/// Population standard deviation; `0` for an empty slice.
fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Labels and region statistics of a segmented volume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentationResult {
    shape: VolumeShape,
    labels: Vec<RegionId>,
    regions: Vec<RegionSummary>,
    threshold: f64,
}

impl SegmentationResult {
    /// Returns the shape of the segmented volume.
    #[must_use]
    #[rustfmt::skip]
    pub fn shape(&self) -> VolumeShape { self.shape }

    /// Returns the region label of every voxel.
    #[must_use]
    pub fn labels(&self) -> &[RegionId] {
        &self.labels
    }

    /// Returns one summary per region, ordered by label.
    #[must_use]
    pub fn regions(&self) -> &[RegionSummary] {
        &self.regions
    }

    /// Returns the number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Returns the threshold `stddev / complexity` derived from the volume.
    #[must_use]
    #[rustfmt::skip]
    pub fn threshold(&self) -> f64 { self.threshold }

    /// Returns the labels as plain integers in voxel order.
    #[must_use]
    pub fn label_image(&self) -> Vec<usize> {
        self.labels.iter().map(|label| label.get()).collect()
    }

    /// Returns the volume with every voxel replaced by its region mean.
    #[must_use]
    pub fn mean_image(&self) -> Vec<f64> {
        self.labels
            .iter()
            .map(|label| {
                self.regions
                    .get(label.get().wrapping_sub(1))
                    .map_or(f64::NAN, RegionSummary::mean)
            })
            .collect()
    }
}
