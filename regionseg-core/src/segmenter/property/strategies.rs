//! Fixture generators for segmentation property tests.
//!
//! Values and edges come from a seeded [`SmallRng`] so every failing case can
//! be replayed from its `(topology, profile, seed)` triple. Edge weights are
//! the absolute value difference of their endpoints, matching how images are
//! segmented in practice.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::edge::Edge;

use super::types::{GraphTopology, MergeParams, SegmentFixture, ValueProfile};

/// Smallest generated grid side.
const MIN_SIDE: usize = 2;
/// Largest generated grid side.
const MAX_SIDE: usize = 9;
/// Largest node count for line and random topologies.
const MAX_NODES: usize = 64;

/// Generates fixtures across every topology and value profile.
pub(super) fn segment_fixture_strategy() -> impl Strategy<Value = SegmentFixture> {
    (
        topology_strategy(),
        profile_strategy(),
        any::<u64>(),
    )
        .prop_map(|(topology, profile, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            generate_fixture(topology, profile, &mut rng)
        })
}

/// Generates merge parameters in the ranges used by real segmentations.
pub(super) fn merge_params_strategy() -> impl Strategy<Value = MergeParams> {
    (0.01_f64..50.0, 0.05_f64..4.0, 0_usize..8).prop_map(|(threshold, complexity, min_size)| {
        MergeParams {
            threshold,
            complexity,
            min_size,
        }
    })
}

fn topology_strategy() -> impl Strategy<Value = GraphTopology> {
    prop_oneof![
        1 => Just(GraphTopology::Line),
        2 => Just(GraphTopology::Grid),
        2 => Just(GraphTopology::DiagonalGrid),
        1 => Just(GraphTopology::Random),
    ]
}

fn profile_strategy() -> impl Strategy<Value = ValueProfile> {
    prop_oneof![
        2 => Just(ValueProfile::Continuous),
        3 => Just(ValueProfile::Plateaus),
        1 => Just(ValueProfile::Flat),
    ]
}

/// Generates a fixture for an explicit topology and profile.
pub(super) fn generate_fixture(
    topology: GraphTopology,
    profile: ValueProfile,
    rng: &mut SmallRng,
) -> SegmentFixture {
    let pairs = match topology {
        GraphTopology::Line => line_pairs(rng.gen_range(1..=MAX_NODES)),
        GraphTopology::Grid => {
            let (width, height) = grid_sides(rng);
            grid_pairs(width, height, false)
        }
        GraphTopology::DiagonalGrid => {
            let (width, height) = grid_sides(rng);
            grid_pairs(width, height, true)
        }
        GraphTopology::Random => random_pairs(rng),
    };
    let values = generate_values(profile, pairs.node_count, rng);
    let edges = pairs
        .pairs
        .into_iter()
        .map(|(source, target)| Edge::new(source, target, (values[source] - values[target]).abs()))
        .collect();

    SegmentFixture {
        values,
        edges,
        topology,
        profile,
    }
}

struct NodePairs {
    node_count: usize,
    pairs: Vec<(usize, usize)>,
}

fn grid_sides(rng: &mut SmallRng) -> (usize, usize) {
    (
        rng.gen_range(MIN_SIDE..=MAX_SIDE),
        rng.gen_range(MIN_SIDE..=MAX_SIDE),
    )
}

fn line_pairs(node_count: usize) -> NodePairs {
    NodePairs {
        node_count,
        pairs: (1..node_count).map(|node| (node - 1, node)).collect(),
    }
}

fn grid_pairs(width: usize, height: usize, diagonals: bool) -> NodePairs {
    let mut pairs = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let node = y * width + x;
            if x + 1 < width {
                pairs.push((node, node + 1));
            }
            if y + 1 < height {
                pairs.push((node, node + width));
                if diagonals && x + 1 < width {
                    pairs.push((node, node + width + 1));
                    pairs.push((node + 1, node + width));
                }
            }
        }
    }
    NodePairs {
        node_count: width * height,
        pairs,
    }
}

fn random_pairs(rng: &mut SmallRng) -> NodePairs {
    let node_count = rng.gen_range(2..=MAX_NODES);
    let edge_count = rng.gen_range(0..=node_count * 2);
    let pairs = (0..edge_count)
        .map(|_| (rng.gen_range(0..node_count), rng.gen_range(0..node_count)))
        .collect();
    NodePairs { node_count, pairs }
}

fn generate_values(profile: ValueProfile, node_count: usize, rng: &mut SmallRng) -> Vec<f64> {
    match profile {
        ValueProfile::Continuous => (0..node_count).map(|_| rng.gen_range(0.0..100.0)).collect(),
        ValueProfile::Plateaus => {
            let levels: Vec<f64> = (0..rng.gen_range(1..=4))
                .map(|_| f64::from(rng.gen_range(0_u8..=10)) * 10.0)
                .collect();
            let run = rng.gen_range(1..=8);
            (0..node_count)
                .map(|node| levels[(node / run) % levels.len()] + rng.gen_range(-0.5..0.5))
                .collect()
        }
        ValueProfile::Flat => vec![rng.gen_range(0.0..100.0); node_count],
    }
}
