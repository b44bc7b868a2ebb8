//! Invariant checks shared by the proptest runners and the seeded cases.
//!
//! Each runner drives a fresh [`Segmenter`] (or bare [`RegionStore`]) over a
//! generated fixture and fails with a message naming the fixture when an
//! invariant breaks.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    edge::{Edge, EdgeList},
    policy::ThresholdMerge,
    report::RegionId,
    segmenter::Segmenter,
    store::RegionStore,
};

use super::types::{MergeParams, SegmentFixture};

/// Relative tolerance for comparing incrementally maintained means.
const MEAN_EPSILON: f64 = 1e-9;

fn fail(fixture: &SegmentFixture, message: impl AsRef<str>) -> TestCaseError {
    TestCaseError::fail(format!("{} ({})", message.as_ref(), fixture.describe()))
}

fn sorted_segmenter(fixture: &SegmentFixture) -> Result<Segmenter, TestCaseError> {
    let mut segmenter = Segmenter::new(&fixture.values, fixture.edges.clone())
        .map_err(|err| fail(fixture, format!("construction failed: {err}")))?;
    segmenter
        .sort_edges()
        .map_err(|err| fail(fixture, format!("sort failed: {err}")))?;
    Ok(segmenter)
}

/// Runs threshold merging, the small-region pass and finalization, checking
/// that region counts never increase and the store stays a valid forest.
pub(super) fn run_pipeline_property(
    fixture: &SegmentFixture,
    params: MergeParams,
) -> TestCaseResult {
    let mut segmenter = sorted_segmenter(fixture)?;
    let initial = segmenter.region_count();
    if initial != fixture.node_count() {
        return Err(fail(fixture, "fresh engine must hold one region per node"));
    }

    let after_primary = segmenter
        .merge_threshold(params.threshold)
        .map_err(|err| fail(fixture, format!("threshold merge failed: {err}")))?;
    let after_statistical = segmenter
        .merge_statistical(params.complexity)
        .map_err(|err| fail(fixture, format!("statistical merge failed: {err}")))?;
    let after_small = segmenter
        .merge_small(params.min_size)
        .map_err(|err| fail(fixture, format!("small pass failed: {err}")))?;

    if !(initial >= after_primary && after_primary >= after_statistical
        && after_statistical >= after_small)
    {
        return Err(fail(
            fixture,
            format!(
                "region counts increased: {initial} -> {after_primary} -> \
                 {after_statistical} -> {after_small}"
            ),
        ));
    }
    if fixture.node_count() > 0 && after_small == 0 {
        return Err(fail(fixture, "non-empty graph lost every region"));
    }

    validate_forest(fixture, segmenter.store())?;
    validate_region_statistics(fixture, segmenter.store())?;

    let finalized = segmenter
        .finalize()
        .map_err(|err| fail(fixture, format!("finalize failed: {err}")))?;
    if finalized != after_small {
        return Err(fail(
            fixture,
            format!("finalize returned {finalized}, expected {after_small}"),
        ));
    }
    validate_labels(fixture, &segmenter, finalized)
}

/// Checks that following parent pointers from every node reaches a root
/// within `node_count` steps and that root sizes sum to the node count.
fn validate_forest(fixture: &SegmentFixture, store: &RegionStore) -> TestCaseResult {
    let node_count = store.node_count();
    for node in 0..node_count {
        let mut current = node;
        let mut steps = 0;
        loop {
            let parent = store
                .parent(current)
                .map_err(|err| fail(fixture, format!("parent lookup failed: {err}")))?;
            if parent == current {
                break;
            }
            steps += 1;
            if steps > node_count {
                return Err(fail(fixture, format!("cycle reachable from node {node}")));
            }
            current = parent;
        }
    }

    let roots: Vec<usize> = store.roots().collect();
    if roots.len() != store.region_count() {
        return Err(fail(
            fixture,
            format!(
                "{} roots but region count is {}",
                roots.len(),
                store.region_count()
            ),
        ));
    }
    let total: usize = roots
        .iter()
        .map(|&root| store.size(root).unwrap_or_default())
        .sum();
    if total != node_count {
        return Err(fail(
            fixture,
            format!("root sizes sum to {total}, expected {node_count}"),
        ));
    }
    Ok(())
}

/// Recomputes every region's size and mean from the node values and
/// compares them with the incrementally maintained root fields.
fn validate_region_statistics(fixture: &SegmentFixture, store: &RegionStore) -> TestCaseResult {
    let node_count = store.node_count();
    let mut sizes = vec![0_usize; node_count];
    let mut sums = vec![0.0_f64; node_count];
    for (node, value) in fixture.values.iter().enumerate() {
        let root = store
            .root_of(node)
            .map_err(|err| fail(fixture, format!("root lookup failed: {err}")))?;
        sizes[root] += 1;
        sums[root] += value;
    }

    for root in store.roots() {
        let size = store.size(root).unwrap_or_default();
        if size != sizes[root] {
            return Err(fail(
                fixture,
                format!("root {root} records size {size}, members {}", sizes[root]),
            ));
        }
        let expected = sums[root] / sizes[root] as f64;
        let actual = store.mean(root).unwrap_or(f64::NAN);
        let scale = expected.abs().max(1.0);
        if (actual - expected).abs() > MEAN_EPSILON * scale {
            return Err(fail(
                fixture,
                format!("root {root} mean {actual} differs from recomputed {expected}"),
            ));
        }
    }
    Ok(())
}

/// Checks labels are dense, start at one and follow root index order.
fn validate_labels(
    fixture: &SegmentFixture,
    segmenter: &Segmenter,
    regions: usize,
) -> TestCaseResult {
    let labels = segmenter
        .labels()
        .map_err(|err| fail(fixture, format!("labels failed: {err}")))?;
    let mut next_new = 1;
    let mut seen = vec![false; regions + 1];
    for (node, label) in labels.iter().map(|label| label.get()).enumerate() {
        if label == 0 || label > regions {
            return Err(fail(
                fixture,
                format!("node {node} has label {label} outside 1..={regions}"),
            ));
        }
        if !seen[label] {
            if label != next_new {
                return Err(fail(
                    fixture,
                    format!("label {label} first appears before label {next_new}"),
                ));
            }
            seen[label] = true;
            next_new += 1;
        }
    }

    let report = segmenter
        .report()
        .map_err(|err| fail(fixture, format!("report failed: {err}")))?;
    let reported: Vec<RegionId> = report.iter().map(|region| region.label()).collect();
    let expected: Vec<RegionId> = (1..=regions).map(RegionId::new).collect();
    if reported != expected {
        return Err(fail(fixture, "report labels are not 1..=K in order"));
    }
    Ok(())
}

/// Joining every edge twice must leave the store identical to joining once.
pub(super) fn run_join_idempotence_property(fixture: &SegmentFixture) -> TestCaseResult {
    let mut store = RegionStore::new(&fixture.values);
    for edge in &fixture.edges {
        store
            .join(edge.source(), edge.target())
            .map_err(|err| fail(fixture, format!("join failed: {err}")))?;
    }
    let once = store.clone();
    for edge in &fixture.edges {
        let merged = store
            .join(edge.source(), edge.target())
            .map_err(|err| fail(fixture, format!("join failed: {err}")))?;
        if merged {
            return Err(fail(fixture, "repeated join merged two regions"));
        }
    }
    if store.region_count() != once.region_count() {
        return Err(fail(fixture, "repeated joins changed the region count"));
    }
    for node in 0..store.node_count() {
        if store.root_of(node).ok() != once.root_of(node).ok() {
            return Err(fail(fixture, format!("node {node} changed region")));
        }
    }
    Ok(())
}

/// After every accepted threshold merge the surviving tolerance is at least
/// the accepted edge weight.
pub(super) fn run_tolerance_property(fixture: &SegmentFixture, threshold: f64) -> TestCaseResult {
    let policy = ThresholdMerge::new(threshold)
        .map_err(|err| fail(fixture, format!("policy rejected: {err}")))?;
    let mut edges = EdgeList::from(fixture.edges.clone());
    edges.sort();

    let mut store = RegionStore::new(&fixture.values);
    store.seed_tolerance(threshold);
    for edge in edges.iter() {
        if let Some(root) = policy.step(&mut store, edge) {
            let tolerance = store.root_tolerance(root);
            if tolerance < edge.weight() {
                return Err(fail(
                    fixture,
                    format!(
                        "tolerance {tolerance} below accepted weight {}",
                        edge.weight()
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Reversing every edge must not change the statistical partition.
pub(super) fn run_direction_symmetry_property(
    fixture: &SegmentFixture,
    complexity: f64,
) -> TestCaseResult {
    let forward = partition(fixture, fixture.edges.clone(), complexity)?;
    let reversed: Vec<Edge> = fixture.edges.iter().map(|edge| edge.reversed()).collect();
    let backward = partition(fixture, reversed, complexity)?;
    if forward != backward {
        return Err(fail(fixture, "edge direction changed the partition"));
    }
    Ok(())
}

/// Two runs over identical input produce identical labels.
pub(super) fn run_determinism_property(
    fixture: &SegmentFixture,
    params: MergeParams,
) -> TestCaseResult {
    let run = || -> Result<Vec<RegionId>, TestCaseError> {
        let mut segmenter = sorted_segmenter(fixture)?;
        segmenter
            .merge_threshold(params.threshold)
            .and_then(|_| segmenter.merge_small(params.min_size))
            .and_then(|_| segmenter.finalize())
            .and_then(|_| segmenter.labels())
            .map_err(|err| fail(fixture, format!("run failed: {err}")))
    };
    if run()? != run()? {
        return Err(fail(fixture, "identical runs produced different labels"));
    }
    Ok(())
}

/// Maps every node to the smallest node index in its region.
fn partition(
    fixture: &SegmentFixture,
    edges: Vec<Edge>,
    complexity: f64,
) -> Result<Vec<usize>, TestCaseError> {
    let mut segmenter = Segmenter::new(&fixture.values, edges)
        .map_err(|err| fail(fixture, format!("construction failed: {err}")))?;
    segmenter
        .sort_edges()
        .and_then(|()| segmenter.merge_statistical(complexity))
        .and_then(|_| segmenter.finalize())
        .map_err(|err| fail(fixture, format!("statistical run failed: {err}")))?;
    let labels = segmenter
        .labels()
        .map_err(|err| fail(fixture, format!("labels failed: {err}")))?;
    let mut first_member = vec![usize::MAX; labels.len() + 1];
    Ok(labels
        .iter()
        .enumerate()
        .map(|(node, label)| {
            let slot = &mut first_member[label.get()];
            if *slot == usize::MAX {
                *slot = node;
            }
            *slot
        })
        .collect())
}
