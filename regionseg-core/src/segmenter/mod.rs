//! Segmentation engine driving the store through its lifecycle.
//!
//! A [`Segmenter`] owns the node store and edge list of one segmentation and
//! only exposes operations in their permitted order:
//!
//! `Built → Sorted → Merged → (Cleaned) → Finalized`
//!
//! Primary policies may run again on a merged store; edges whose endpoints
//! already share a region are skipped. Sorting after a merge and reading
//! labels before finalization are rejected with
//! [`SegmentError::InvalidState`], leaving the engine untouched.

use std::fmt;

use tracing::{debug, instrument};

use crate::{
    Result,
    edge::EdgeList,
    error::SegmentError,
    policy::{MergePolicy, SmallRegionMerge, StatisticalMerge, ThresholdMerge},
    report::{RegionId, RegionSummary},
    store::RegionStore,
};

/// Lifecycle stage of a [`Segmenter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EngineState {
    /// Edges are in caller order.
    Built,
    /// Edges are sorted; every node is still a singleton region.
    Sorted,
    /// A primary merge policy has run.
    Merged,
    /// The small-region pass has run after a primary policy.
    Cleaned,
    /// Dense labels are assigned; the engine is read-only.
    Finalized,
}

impl EngineState {
    /// Returns a stable lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Sorted => "sorted",
            Self::Merged => "merged",
            Self::Cleaned => "cleaned",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graph-based region segmentation over caller-supplied nodes and edges.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, RegionId, Segmenter};
///
/// let values = [0.0, 0.0, 1.0, 1.0, 9.0, 9.0];
/// let edges = vec![
///     Edge::new(0, 1, 0.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 0.0),
///     Edge::new(3, 4, 8.0),
///     Edge::new(4, 5, 0.0),
/// ];
/// let mut segmenter = Segmenter::new(&values, edges)?;
/// segmenter.sort_edges()?;
/// assert_eq!(segmenter.merge_threshold(0.5)?, 3);
/// assert_eq!(segmenter.finalize()?, 3);
///
/// let region = segmenter.region_of(5)?;
/// assert_eq!(region.label(), RegionId::new(3));
/// assert_eq!(region.size(), 2);
/// assert_eq!(region.mean(), 9.0);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Segmenter {
    store: RegionStore,
    edges: EdgeList,
    state: EngineState,
}

impl Segmenter {
    /// Creates an engine with one node per value.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when an edge references a node
    /// outside `0..values.len()` and [`SegmentError::InvalidWeight`] when an
    /// edge weight is negative or non-finite.
    pub fn new(values: &[f64], edges: impl Into<EdgeList>) -> Result<Self> {
        let edges = edges.into();
        edges.validate(values.len())?;
        let state = if edges.is_sorted() {
            EngineState::Sorted
        } else {
            EngineState::Built
        };
        Ok(Self {
            store: RegionStore::new(values),
            edges,
            state,
        })
    }

    /// Returns the current lifecycle stage.
    #[must_use]
    #[rustfmt::skip]
    pub fn state(&self) -> EngineState { self.state }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Returns the number of regions currently alive.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.store.region_count()
    }

    /// Returns a read-only view of the node store.
    #[must_use]
    #[rustfmt::skip]
    pub fn store(&self) -> &RegionStore { &self.store }

    /// Returns the edge list in its current order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &EdgeList { &self.edges }

    /// Sorts the edges by ascending weight, keeping ties in insertion order.
    ///
    /// Sorting an already sorted engine is a no-op.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] once any merge policy has run.
    #[instrument(
        name = "segment.sort_edges",
        err,
        skip(self),
        fields(edges = self.edges.len(), state = %self.state),
    )]
    pub fn sort_edges(&mut self) -> Result<()> {
        self.require("sort_edges", &[EngineState::Built, EngineState::Sorted])?;
        if self.state == EngineState::Built {
            self.edges.sort();
            self.state = EngineState::Sorted;
        }
        Ok(())
    }

    /// Runs the size-adaptive threshold merge and returns the region count.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidParameter`] for a negative or NaN
    /// `threshold` and [`SegmentError::InvalidState`] before
    /// [`Self::sort_edges`] or after [`Self::finalize`].
    #[instrument(name = "segment.merge_threshold", err, skip(self), fields(state = %self.state))]
    pub fn merge_threshold(&mut self, threshold: f64) -> Result<usize> {
        self.require_primary("merge_threshold")?;
        let policy = ThresholdMerge::new(threshold)?;
        self.run_primary(&policy)
    }

    /// Runs statistical region merging and returns the region count.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidParameter`] unless `complexity` is
    /// strictly positive and [`SegmentError::InvalidState`] before
    /// [`Self::sort_edges`] or after [`Self::finalize`].
    #[instrument(name = "segment.merge_statistical", err, skip(self), fields(state = %self.state))]
    pub fn merge_statistical(&mut self, complexity: f64) -> Result<usize> {
        self.require_primary("merge_statistical")?;
        let policy = StatisticalMerge::new(complexity)?;
        self.run_primary(&policy)
    }

    /// Absorbs regions smaller than `min_size` into a neighbour and returns
    /// the region count. A `min_size` of zero leaves the regions unchanged.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] unless a primary policy has run
    /// and the engine is not finalized.
    #[instrument(name = "segment.merge_small", err, skip(self), fields(state = %self.state))]
    pub fn merge_small(&mut self, min_size: usize) -> Result<usize> {
        self.require("merge_small", &[EngineState::Merged, EngineState::Cleaned])?;
        let regions = SmallRegionMerge::new(min_size).apply(&mut self.store, &self.edges)?;
        self.state = EngineState::Cleaned;
        Ok(regions)
    }

    /// Assigns dense labels `1..=K` to the regions in node-index order of
    /// their roots and returns `K`. Calling it again returns `K` unchanged.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] when no merge policy has run.
    #[instrument(name = "segment.finalize", err, skip(self), fields(state = %self.state))]
    pub fn finalize(&mut self) -> Result<usize> {
        self.require(
            "finalize",
            &[
                EngineState::Merged,
                EngineState::Cleaned,
                EngineState::Finalized,
            ],
        )?;
        if self.state != EngineState::Finalized {
            let regions = self.store.relabel();
            debug!(regions, "regions relabelled");
            self.state = EngineState::Finalized;
        }
        Ok(self.store.region_count())
    }

    /// Returns the label, size and mean of the region containing `node`.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] before [`Self::finalize`] and
    /// [`SegmentError::NodeOutOfRange`] for an invalid `node`.
    pub fn region_of(&self, node: usize) -> Result<RegionSummary> {
        self.require("region_of", &[EngineState::Finalized])?;
        Ok(RegionSummary::new(
            RegionId::new(self.store.label(node)?),
            self.store.size(node)?,
            self.store.mean(node)?,
        ))
    }

    /// Returns the label of every node in node-index order.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] before [`Self::finalize`].
    pub fn labels(&self) -> Result<Vec<RegionId>> {
        self.require("labels", &[EngineState::Finalized])?;
        (0..self.node_count())
            .map(|node| self.store.label(node).map(RegionId::new))
            .collect()
    }

    /// Returns one summary per region, ordered by label.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidState`] before [`Self::finalize`].
    pub fn report(&self) -> Result<Vec<RegionSummary>> {
        self.require("report", &[EngineState::Finalized])?;
        self.store
            .roots()
            .map(|root| self.region_of(root))
            .collect()
    }

    fn require(&self, operation: &'static str, allowed: &[EngineState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SegmentError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn require_primary(&self, operation: &'static str) -> Result<()> {
        self.require(
            operation,
            &[
                EngineState::Sorted,
                EngineState::Merged,
                EngineState::Cleaned,
            ],
        )
    }

    fn run_primary(&mut self, policy: &impl MergePolicy) -> Result<usize> {
        let regions = policy.apply(&mut self.store, &self.edges)?;
        if self.state == EngineState::Sorted {
            self.state = EngineState::Merged;
        }
        Ok(regions)
    }
}


#[cfg(test)]
mod property;
