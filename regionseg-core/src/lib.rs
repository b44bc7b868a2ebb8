//! Graph-based region segmentation.
//!
//! Nodes carry a scalar value; weighted edges connect neighbouring nodes.
//! After sorting the edges by ascending weight, a merge policy walks them
//! once and unites regions in a union-find store that tracks each region's
//! size and mean. Two primary policies are provided, a size-adaptive
//! threshold merge and statistical region merging, plus a pass that absorbs
//! undersized regions. Finalization assigns dense 1-based labels.
//!
//! [`Segmenter`] drives an arbitrary graph through that lifecycle, and
//! [`Segmentation`] wraps it for regular 2D and 3D voxel grids.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod edge;
mod error;
mod grid;
mod policy;
mod report;
mod segmentation;
mod segmenter;
mod store;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{MergeAlgorithm, SegmentationBuilder},
    edge::{Edge, EdgeList},
    error::{Result, SegmentError, SegmentErrorCode},
    grid::{Connectivity, VolumeShape, grid_edges},
    policy::{MergePolicy, SmallRegionMerge, StatisticalMerge, ThresholdMerge},
    report::{RegionId, RegionSummary, write_region_table},
    segmentation::{Segmentation, SegmentationResult},
    segmenter::{EngineState, Segmenter},
    store::RegionStore,
};
