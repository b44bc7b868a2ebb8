//! Size-adaptive threshold merging.

use crate::{
    Result,
    edge::{Edge, EdgeList},
    error::SegmentError,
    store::RegionStore,
};

use super::{MergePolicy, distinct_roots, ensure_mergeable, record_merges};

/// Merges two regions when the connecting edge weight stays within both
/// regions' tolerances.
///
/// Every tolerance starts at `threshold`, so a node's first merge accepts any
/// edge of weight at most `threshold`. After a merge the surviving region's
/// tolerance becomes `weight + threshold / size`: larger regions accept edges
/// close to the heaviest one they already contain.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, EdgeList, MergePolicy, RegionStore, ThresholdMerge};
///
/// let mut store = RegionStore::new(&[0.0, 0.2, 5.0]);
/// let mut edges = EdgeList::from(vec![Edge::new(0, 1, 0.2), Edge::new(1, 2, 4.8)]);
/// edges.sort();
/// let policy = ThresholdMerge::new(1.0)?;
/// assert_eq!(policy.apply(&mut store, &edges)?, 2);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdMerge {
    threshold: f64,
}

impl ThresholdMerge {
    /// Creates the policy.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidParameter`] when `threshold` is negative
    /// or NaN.
    pub fn new(threshold: f64) -> Result<Self> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(SegmentError::InvalidParameter {
                name: "threshold",
                expected: "non-negative",
                value: threshold,
            });
        }
        Ok(Self { threshold })
    }

    /// Returns the configured base threshold.
    #[must_use]
    #[rustfmt::skip]
    pub fn threshold(&self) -> f64 { self.threshold }

    /// Processes a single edge and returns the surviving root when it merged
    /// two regions.
    pub(crate) fn step(&self, store: &mut RegionStore, edge: &Edge) -> Option<usize> {
        let (left, right) = distinct_roots(store, edge)?;
        let weight = edge.weight();
        if weight > store.root_tolerance(left) || weight > store.root_tolerance(right) {
            return None;
        }
        let root = store.union_roots(left, right);
        let relaxed = weight + self.threshold / store.root_size(root) as f64;
        store.set_tolerance(root, relaxed);
        Some(root)
    }
}

impl MergePolicy for ThresholdMerge {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn apply(&self, store: &mut RegionStore, edges: &EdgeList) -> Result<usize> {
        ensure_mergeable(self.name(), store, edges)?;
        store.seed_tolerance(self.threshold);
        let merges = edges
            .iter()
            .filter(|edge| self.step(store, edge).is_some())
            .count();
        let regions = store.region_count();
        record_merges(self.name(), merges, regions);
        Ok(regions)
    }
}
