//! Statistical region merging (Nock & Nielsen, 2004).
//!
//! The tolerance per region is the reduced form `(L + ln(1 + s)) / s` with
//! `L = 2 ln(6N)`, without the size-capped exponent of the published bound.

use crate::{Result, edge::EdgeList, error::SegmentError, store::RegionStore};

use super::{MergePolicy, distinct_roots, ensure_mergeable, record_merges};

/// Merges two regions when the squared difference of their means falls below
/// `complexity² · (b(left) + b(right))`.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, EdgeList, MergePolicy, RegionStore, StatisticalMerge};
///
/// let mut store = RegionStore::new(&[10.0, 10.5, 90.0]);
/// let mut edges = EdgeList::from(vec![Edge::new(0, 1, 0.5), Edge::new(1, 2, 79.5)]);
/// edges.sort();
/// let policy = StatisticalMerge::new(1.0)?;
/// assert_eq!(policy.apply(&mut store, &edges)?, 2);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatisticalMerge {
    complexity: f64,
}

impl StatisticalMerge {
    /// Creates the policy.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidParameter`] unless `complexity` is
    /// strictly positive.
    pub fn new(complexity: f64) -> Result<Self> {
        if complexity.is_nan() || complexity <= 0.0 {
            return Err(SegmentError::InvalidParameter {
                name: "complexity",
                expected: "strictly positive",
                value: complexity,
            });
        }
        Ok(Self { complexity })
    }

    /// Returns the configured complexity.
    #[must_use]
    #[rustfmt::skip]
    pub fn complexity(&self) -> f64 { self.complexity }
}

/// Logarithmic normalisation `2 ln(6N)` for a store of `node_count` nodes.
fn log_normaliser(node_count: usize) -> f64 {
    2.0 * (6.0 * node_count as f64).ln()
}

/// Statistical tolerance of a region holding `size` nodes.
fn region_bound(normaliser: f64, size: usize) -> f64 {
    let size = size as f64;
    (normaliser + (1.0 + size).ln()) / size
}

impl MergePolicy for StatisticalMerge {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn apply(&self, store: &mut RegionStore, edges: &EdgeList) -> Result<usize> {
        ensure_mergeable(self.name(), store, edges)?;
        let factor = self.complexity * self.complexity;
        let normaliser = log_normaliser(store.node_count());
        let mut merges = 0;
        for edge in edges {
            let Some((left, right)) = distinct_roots(store, edge) else {
                continue;
            };
            let difference = store.root_mean(left) - store.root_mean(right);
            let bound = region_bound(normaliser, store.root_size(left))
                + region_bound(normaliser, store.root_size(right));
            if difference * difference < factor * bound {
                store.union_roots(left, right);
                merges += 1;
            }
        }
        let regions = store.region_count();
        record_merges(self.name(), merges, regions);
        Ok(regions)
    }
}
