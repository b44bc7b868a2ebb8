//! Benchmark support crate for regionseg.
//!
//! Provides seeded synthetic volumes and parameter types used by the
//! Criterion benchmarks for edge construction, the merge policies and the
//! full pipeline.

pub mod error;
pub mod params;
pub mod volume;
