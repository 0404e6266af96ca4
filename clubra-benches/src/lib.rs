//! Benchmark support crate for clubra.
//!
//! Provides seeded synthetic routing instances and parameter types used by
//! the Criterion benchmarks for clustering, minimum cuts and candidate
//! ranking.

pub mod error;
pub mod params;
pub mod source;
