//! Clusters driven by the current fractional solution.

use tracing::{debug, instrument};

use crate::{
    error::ConfigError,
    graph::UnionFind,
    partition::{ClusterPartition, PartitionError},
    solution::FractionalSolution,
};

/// Settings for [`FractionalClustering`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionalClusteringConfig {
    threshold: f64,
}

impl Default for FractionalClusteringConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl FractionalClusteringConfig {
    /// Creates a configuration merging customer pairs with `X[i][j] >=
    /// threshold`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFractionalThreshold`] unless `threshold`
    /// lies in `(0, 2]`.
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if threshold > 0.0 && threshold <= 2.0 {
            Ok(Self { threshold })
        } else {
            Err(ConfigError::InvalidFractionalThreshold { got: threshold })
        }
    }

    /// Returns the merge threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Cumulative cluster list grown from successive fractional solutions.
///
/// The depot singleton is cluster `1`. Clusters are never removed; a
/// component already present is not added again.
///
/// # Examples
/// ```
/// use clubra_core::{FractionalClustering, FractionalClusteringConfig, FractionalSolution};
///
/// let mut clustering = FractionalClustering::new(FractionalClusteringConfig::default(), 3);
/// let solution = FractionalSolution::from_edges(4, [(1, 2, 0.7), (2, 3, 0.2)])
///     .expect("valid edges");
/// assert_eq!(clustering.update(&solution).expect("matching size"), 2);
/// assert_eq!(clustering.partition().to_string(), "C1 0\nC2 1 2\nC3 3\n");
/// assert_eq!(clustering.update(&solution).expect("matching size"), 0);
/// ```
#[derive(Clone, Debug)]
pub struct FractionalClustering {
    config: FractionalClusteringConfig,
    customer_count: usize,
    partition: ClusterPartition,
}

impl FractionalClustering {
    /// Starts a cluster list over `customer_count` customers holding only the
    /// depot cluster.
    #[must_use]
    pub fn new(config: FractionalClusteringConfig, customer_count: usize) -> Self {
        Self {
            config,
            customer_count,
            partition: ClusterPartition::depot_only(customer_count),
        }
    }

    /// Merges customers joined by heavy edges of `solution` and appends the
    /// resulting components that are not yet listed. Returns how many were
    /// appended.
    ///
    /// # Errors
    /// Returns [`PartitionError::NodeOutOfRange`] when `solution` covers more
    /// nodes than the cluster list.
    #[instrument(
        name = "clustering.fractional",
        skip(self, solution),
        fields(threshold = self.config.threshold),
        err
    )]
    pub fn update(&mut self, solution: &FractionalSolution) -> Result<usize, PartitionError> {
        let node_count = self.customer_count + 1;
        if solution.node_count() > node_count {
            return Err(PartitionError::NodeOutOfRange {
                node: solution.node_count() - 1,
                node_count,
            });
        }

        let mut sets = UnionFind::new(node_count);
        for (i, j, value) in solution.positive_edges() {
            if i > 0 && value >= self.config.threshold {
                sets.union(i, j);
            }
        }
        let components = sets.components(1..=self.customer_count);
        let added = self.partition.append_unique(components)?;

        #[cfg(feature = "metrics")]
        metrics::counter!("fractional_clusters_added").increment(added as u64);
        debug!(added, total = self.partition.len(), "fractional clusters updated");
        Ok(added)
    }

    /// Returns the cumulative cluster list.
    #[must_use]
    pub const fn partition(&self) -> &ClusterPartition {
        &self.partition
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FractionalClusteringConfig {
        &self.config
    }
}
