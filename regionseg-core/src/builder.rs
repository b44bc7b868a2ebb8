//! Builder utilities for configuring grid segmentations.
//!
//! Exposes the merge algorithm selection surface and the validation applied
//! before constructing [`Segmentation`] instances.

use crate::{Result, error::SegmentError, grid::Connectivity, segmentation::Segmentation};

/// Primary merge policy applied by [`Segmentation::run`].
///
/// # Examples
/// ```
/// use regionseg_core::MergeAlgorithm;
///
/// assert_eq!(MergeAlgorithm::default(), MergeAlgorithm::Statistical);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergeAlgorithm {
    /// Size-adaptive threshold merging with `threshold = stddev / complexity`.
    Threshold,
    /// Statistical region merging scaled by `stddev / complexity`.
    #[default]
    Statistical,
}

impl MergeAlgorithm {
    /// Returns a stable lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Statistical => "statistical",
        }
    }
}

/// Configures and constructs [`Segmentation`] instances.
///
/// # Examples
/// ```
/// use regionseg_core::{Connectivity, MergeAlgorithm, SegmentationBuilder};
///
/// let segmentation = SegmentationBuilder::new()
///     .with_algorithm(MergeAlgorithm::Threshold)
///     .with_connectivity(Connectivity::Full)
///     .with_complexity(2.0)
///     .with_min_region_size(4)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(segmentation.algorithm(), MergeAlgorithm::Threshold);
/// assert_eq!(segmentation.min_region_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentationBuilder {
    algorithm: MergeAlgorithm,
    connectivity: Connectivity,
    complexity: f64,
    min_region_size: usize,
}

impl Default for SegmentationBuilder {
    fn default() -> Self {
        Self {
            algorithm: MergeAlgorithm::Statistical,
            connectivity: Connectivity::Face,
            complexity: 1.0,
            min_region_size: 0,
        }
    }
}

impl SegmentationBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use regionseg_core::{Connectivity, MergeAlgorithm, SegmentationBuilder};
    ///
    /// let builder = SegmentationBuilder::new();
    /// assert_eq!(builder.algorithm(), MergeAlgorithm::Statistical);
    /// assert_eq!(builder.connectivity(), Connectivity::Face);
    /// assert_eq!(builder.complexity(), 1.0);
    /// assert_eq!(builder.min_region_size(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the primary merge algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: MergeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the configured merge algorithm.
    #[must_use]
    pub fn algorithm(&self) -> MergeAlgorithm {
        self.algorithm
    }

    /// Selects which neighbouring voxels are connected.
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Returns the configured connectivity.
    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Overrides the complexity. Higher values produce more, smaller regions.
    ///
    /// # Examples
    /// ```
    /// use regionseg_core::SegmentationBuilder;
    ///
    /// let builder = SegmentationBuilder::new().with_complexity(0.5);
    /// assert_eq!(builder.complexity(), 0.5);
    /// ```
    #[must_use]
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    /// Returns the configured complexity.
    #[must_use]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    /// Sets the minimum region size; `0` disables the clean-up pass.
    #[must_use]
    pub fn with_min_region_size(mut self, size: usize) -> Self {
        self.min_region_size = size;
        self
    }

    /// Returns the configured minimum region size.
    #[must_use]
    pub fn min_region_size(&self) -> usize {
        self.min_region_size
    }

    /// Validates the configuration and constructs a [`Segmentation`].
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidParameter`] unless the complexity is
    /// finite and strictly positive.
    ///
    /// # Examples
    /// ```
    /// use regionseg_core::SegmentationBuilder;
    ///
    /// assert!(SegmentationBuilder::new().with_complexity(0.0).build().is_err());
    /// assert!(SegmentationBuilder::new().build().is_ok());
    /// ```
    pub fn build(self) -> Result<Segmentation> {
        if !(self.complexity.is_finite() && self.complexity > 0.0) {
            return Err(SegmentError::InvalidParameter {
                name: "complexity",
                expected: "finite and > 0",
                value: self.complexity,
            });
        }

        Ok(Segmentation::new(
            self.algorithm,
            self.connectivity,
            self.complexity,
            self.min_region_size,
        ))
    }
}
