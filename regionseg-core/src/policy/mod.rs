//! Region merge policies.
//!
//! A policy walks an ascending edge list once and unites regions in the
//! [`RegionStore`] according to its own criterion. Policies are sequential
//! and order dependent: the outcome of each edge depends on every union made
//! before it.
//!
//! - [`ThresholdMerge`] grows regions whose internal edges stay below a
//!   tolerance that relaxes as the region grows.
//! - [`StatisticalMerge`] applies the statistical region merging predicate to
//!   the region means.
//! - [`SmallRegionMerge`] absorbs regions below a minimum size into any
//!   neighbour, regardless of weight.

mod small;
mod statistical;
mod threshold;

use crate::{
    Result,
    edge::{Edge, EdgeList},
    error::SegmentError,
    segmenter::EngineState,
    store::RegionStore,
};

pub use self::{
    small::SmallRegionMerge, statistical::StatisticalMerge, threshold::ThresholdMerge,
};

/// A region-merging criterion applied over an ascending edge list.
pub trait MergePolicy {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Applies the policy to `store`, visiting `edges` in order, and returns
    /// the number of regions left afterwards.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] when `edges` has not been
    /// sorted, [`SegmentError::NodeOutOfRange`] when an endpoint is not a
    /// node of `store` and [`SegmentError::InvalidWeight`] for a negative or
    /// non-finite weight. The store is left untouched on error.
    fn apply(&self, store: &mut RegionStore, edges: &EdgeList) -> Result<usize>;
}

/// Rejects edge lists a policy cannot walk: unsorted lists and edges that
/// do not fit `store`.
fn ensure_mergeable(policy: &'static str, store: &RegionStore, edges: &EdgeList) -> Result<()> {
    if !edges.is_sorted() {
        return Err(SegmentError::InvalidState {
            operation: policy,
            state: EngineState::Built,
        });
    }
    edges.validate(store.node_count())
}

/// Resolves both endpoints of `edge` and returns the pair of roots when they
/// belong to different regions.
fn distinct_roots(store: &mut RegionStore, edge: &Edge) -> Option<(usize, usize)> {
    let left = store.find_root(edge.source());
    let right = store.find_root(edge.target());
    (left != right).then_some((left, right))
}

/// Emits the per-policy merge diagnostics.
fn record_merges(policy: &'static str, merges: usize, regions: usize) {
    tracing::debug!(policy, merges, regions, "merge policy finished");
    #[cfg(feature = "metrics")]
    metrics::counter!("regionseg_merges_total", "policy" => policy).increment(merges as u64);
}
