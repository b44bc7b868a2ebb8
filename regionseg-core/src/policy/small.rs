//! Absorption of undersized regions.

use crate::{Result, edge::EdgeList, store::RegionStore};

use super::{MergePolicy, distinct_roots, ensure_mergeable, record_merges};

/// Joins any two adjacent regions when either holds fewer than `min_size`
/// nodes, regardless of the edge weight.
///
/// Runs as a separate pass after a primary policy so the clean-up never feeds
/// back into the primary policy's decisions. A `min_size` below one disables
/// the pass.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, EdgeList, MergePolicy, RegionStore, SmallRegionMerge};
///
/// let mut store = RegionStore::new(&[0.0, 0.0, 9.0]);
/// let mut edges = EdgeList::from(vec![Edge::new(0, 1, 0.0), Edge::new(1, 2, 9.0)]);
/// edges.sort();
/// assert_eq!(SmallRegionMerge::new(2).apply(&mut store, &edges)?, 1);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmallRegionMerge {
    min_size: usize,
}

impl SmallRegionMerge {
    /// Creates the pass for the given minimum region size.
    #[must_use]
    pub const fn new(min_size: usize) -> Self {
        Self { min_size }
    }

    /// Returns the configured minimum region size.
    #[must_use]
    #[rustfmt::skip]
    pub const fn min_size(&self) -> usize { self.min_size }
}

impl MergePolicy for SmallRegionMerge {
    fn name(&self) -> &'static str {
        "small"
    }

    fn apply(&self, store: &mut RegionStore, edges: &EdgeList) -> Result<usize> {
        ensure_mergeable(self.name(), store, edges)?;
        if self.min_size < 1 {
            return Ok(store.region_count());
        }
        let mut merges = 0;
        for edge in edges {
            let Some((left, right)) = distinct_roots(store, edge) else {
                continue;
            };
            if store.root_size(left) < self.min_size || store.root_size(right) < self.min_size {
                store.union_roots(left, right);
                merges += 1;
            }
        }
        let regions = store.region_count();
        record_merges(self.name(), merges, regions);
        Ok(regions)
    }
}
