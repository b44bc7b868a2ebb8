//! Fixture types for segmentation property tests.

use crate::edge::Edge;

/// Shape of the generated graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum GraphTopology {
    /// A path through every node in index order.
    Line,
    /// A 4-connected rectangular grid.
    Grid,
    /// A 4-connected grid plus both diagonals of every cell, so many edges
    /// close cycles inside an already merged region.
    DiagonalGrid,
    /// Uniformly random pairs, possibly disconnected.
    Random,
}

/// Distribution of the generated node values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ValueProfile {
    /// Continuous values in `[0, 100)`.
    Continuous,
    /// A handful of plateaus with small noise, the typical image case.
    Plateaus,
    /// Every node has the same value, so every weight is zero.
    Flat,
}

/// A generated segmentation input.
#[derive(Clone, Debug)]
pub(super) struct SegmentFixture {
    /// Per-node values.
    pub values: Vec<f64>,
    /// Edges in caller order (unsorted).
    pub edges: Vec<Edge>,
    /// Topology used during generation.
    pub topology: GraphTopology,
    /// Value distribution used during generation.
    pub profile: ValueProfile,
}

impl SegmentFixture {
    /// Number of nodes in the fixture.
    pub fn node_count(&self) -> usize {
        self.values.len()
    }

    /// Compact description for failure messages.
    pub fn describe(&self) -> String {
        format!(
            "topology={:?}, profile={:?}, nodes={}, edges={}",
            self.topology,
            self.profile,
            self.node_count(),
            self.edges.len()
        )
    }
}

/// Parameters applied by a single property run.
#[derive(Clone, Copy, Debug)]
pub(super) struct MergeParams {
    /// Threshold for the size-adaptive policy.
    pub threshold: f64,
    /// Complexity for statistical merging.
    pub complexity: f64,
    /// Minimum size for the clean-up pass.
    pub min_size: usize,
}
