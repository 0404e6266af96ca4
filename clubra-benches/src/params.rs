//! Benchmark parameter types.

use std::fmt;

/// Parameters for a benchmark run over one synthetic instance.
#[derive(Clone, Debug)]
pub struct InstanceBenchParams {
    /// Number of customers, depot excluded.
    pub customer_count: usize,
}

impl fmt::Display for InstanceBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.customer_count)
    }
}

/// Parameters for a clustering benchmark run.
#[derive(Clone, Debug)]
pub struct ClusteringBenchParams {
    /// Number of customers, depot excluded.
    pub customer_count: usize,
    /// Name of the clustering mode.
    pub mode: &'static str,
}

impl fmt::Display for ClusteringBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},mode={}", self.customer_count, self.mode)
    }
}
