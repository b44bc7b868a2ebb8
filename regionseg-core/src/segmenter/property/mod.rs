//! Property-based tests for the segmentation engine.
//!
//! Generates random graphs over random node values and checks the
//! structural invariants of the region store (acyclic forest, conserved
//! sizes, incremental means), monotone region counts across passes, the
//! threshold tolerance relaxation, edge-direction symmetry of statistical
//! merging, and run-to-run determinism.

mod invariants;
mod strategies;
mod types;
