//! Customer clustering.
//!
//! Two static clusterers share the adaptive cutoff search in [`cutoff`]:
//! [`SingleLinkageClusterer`] cuts the minimum spanning tree of the customer
//! graph and [`TourClusterer`] cuts a Hamiltonian tour. [`cluster_instance`]
//! runs either or both over a Euclidean instance and returns a
//! [`ClusterPartition`] whose first cluster is the depot.
//! [`FractionalClustering`] instead grows its clusters from successive
//! fractional solutions.

mod cutoff;
mod fractional;
mod single_linkage;
mod tour;

use tracing::{info, instrument};

use crate::{
    Result,
    error::ConfigError,
    geometry::EuclideanDistances,
    graph::WeightedGraph,
    oracle::TourOracle,
    partition::ClusterPartition,
};

pub use self::{
    cutoff::{Cutoff, EdgeStatistics, adaptive_cutoff},
    fractional::{FractionalClustering, FractionalClusteringConfig},
    single_linkage::SingleLinkageClusterer,
    tour::TourClusterer,
};

/// Validated parameters shared by the static clusterers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusteringParams {
    std_dev_multiplier: f64,
    tour_std_dev_multiplier: f64,
    big_cluster_size_threshold: f64,
    decreasing_step: f64,
    enable_big_clusters: bool,
    enable_singletons: bool,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            std_dev_multiplier: 1.5,
            tour_std_dev_multiplier: 1.5,
            big_cluster_size_threshold: 0.4,
            decreasing_step: 0.25,
            enable_big_clusters: false,
            enable_singletons: false,
        }
    }
}

impl ClusteringParams {
    /// Returns the initial multiplier `m₀` for the tree cutoff.
    #[must_use]
    pub const fn std_dev_multiplier(&self) -> f64 {
        self.std_dev_multiplier
    }

    /// Returns the initial multiplier for the tour cutoff.
    #[must_use]
    pub const fn tour_std_dev_multiplier(&self) -> f64 {
        self.tour_std_dev_multiplier
    }

    /// Returns the fraction of nodes above which a cluster is split.
    #[must_use]
    pub const fn big_cluster_size_threshold(&self) -> f64 {
        self.big_cluster_size_threshold
    }

    /// Returns the multiplier decrement applied while the cutoff is too high.
    #[must_use]
    pub const fn decreasing_step(&self) -> f64 {
        self.decreasing_step
    }

    /// Returns `true` when oversized clusters are kept whole.
    #[must_use]
    pub const fn enable_big_clusters(&self) -> bool {
        self.enable_big_clusters
    }

    /// Returns `true` when isolated nodes may form their own cluster.
    #[must_use]
    pub const fn enable_singletons(&self) -> bool {
        self.enable_singletons
    }
}

/// Configures and validates [`ClusteringParams`].
///
/// # Examples
/// ```
/// use clubra_core::ClusteringParamsBuilder;
///
/// let params = ClusteringParamsBuilder::new()
///     .with_std_dev_multiplier(2.0)
///     .with_enable_singletons(true)
///     .build()
///     .expect("parameters are valid");
/// assert_eq!(params.std_dev_multiplier(), 2.0);
/// assert!(params.enable_singletons());
/// assert_eq!(params.decreasing_step(), 0.25);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClusteringParamsBuilder {
    params: ClusteringParams,
}

impl ClusteringParamsBuilder {
    /// Creates a builder populated with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the tree cutoff multiplier.
    #[must_use]
    pub const fn with_std_dev_multiplier(mut self, multiplier: f64) -> Self {
        self.params.std_dev_multiplier = multiplier;
        self
    }

    /// Overrides the tour cutoff multiplier.
    #[must_use]
    pub const fn with_tour_std_dev_multiplier(mut self, multiplier: f64) -> Self {
        self.params.tour_std_dev_multiplier = multiplier;
        self
    }

    /// Overrides the big-cluster size threshold.
    #[must_use]
    pub const fn with_big_cluster_size_threshold(mut self, threshold: f64) -> Self {
        self.params.big_cluster_size_threshold = threshold;
        self
    }

    /// Overrides the multiplier decrement.
    #[must_use]
    pub const fn with_decreasing_step(mut self, step: f64) -> Self {
        self.params.decreasing_step = step;
        self
    }

    /// Keeps oversized clusters whole when `enabled`.
    #[must_use]
    pub const fn with_enable_big_clusters(mut self, enabled: bool) -> Self {
        self.params.enable_big_clusters = enabled;
        self
    }

    /// Allows singleton clusters when `enabled`.
    #[must_use]
    pub const fn with_enable_singletons(mut self, enabled: bool) -> Self {
        self.params.enable_singletons = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a multiplier is not finite, the size
    /// threshold falls outside `(0, 1]`, or the decreasing step is not a
    /// finite positive number.
    pub fn build(self) -> core::result::Result<ClusteringParams, ConfigError> {
        let params = self.params;
        if !params.std_dev_multiplier.is_finite() {
            return Err(ConfigError::InvalidStdDevMultiplier {
                got: params.std_dev_multiplier,
            });
        }
        if !params.tour_std_dev_multiplier.is_finite() {
            return Err(ConfigError::InvalidStdDevMultiplier {
                got: params.tour_std_dev_multiplier,
            });
        }
        if !(params.big_cluster_size_threshold > 0.0 && params.big_cluster_size_threshold <= 1.0) {
            return Err(ConfigError::InvalidSizeThreshold {
                got: params.big_cluster_size_threshold,
            });
        }
        if !(params.decreasing_step.is_finite() && params.decreasing_step > 0.0) {
            return Err(ConfigError::InvalidDecreasingStep {
                got: params.decreasing_step,
            });
        }
        Ok(params)
    }
}

/// Which static clusterer(s) [`cluster_instance`] runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ClusteringMode {
    /// Cut the minimum spanning tree.
    #[default]
    SingleLinkage,
    /// Cut a Hamiltonian tour.
    Tour,
    /// Run both, listing tree clusters first.
    Both,
}

/// Clusters produced by one static clusterer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteringOutcome {
    clusters: Vec<Vec<usize>>,
    cutoff: Option<Cutoff>,
}

impl ClusteringOutcome {
    pub(crate) const fn new(clusters: Vec<Vec<usize>>, cutoff: Option<Cutoff>) -> Self {
        Self { clusters, cutoff }
    }

    /// Returns the clusters, each with ascending members, ordered by
    /// smallest member.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Returns the cutoff used, or `None` when there was no edge to cut.
    #[must_use]
    pub const fn cutoff(&self) -> Option<&Cutoff> {
        self.cutoff.as_ref()
    }

    /// Consumes the outcome and returns its clusters.
    #[must_use]
    pub fn into_clusters(self) -> Vec<Vec<usize>> {
        self.clusters
    }
}

/// Result of [`cluster_instance`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteringSummary {
    partition: ClusterPartition,
    single_linkage_clusters: usize,
    tour_clusters: usize,
    equivalent_clusters: usize,
}

impl ClusteringSummary {
    /// Returns the partition, depot cluster first.
    #[must_use]
    pub const fn partition(&self) -> &ClusterPartition {
        &self.partition
    }

    /// Consumes the summary and returns the partition.
    #[must_use]
    pub fn into_partition(self) -> ClusterPartition {
        self.partition
    }

    /// Returns how many clusters the tree clusterer produced.
    #[must_use]
    pub const fn single_linkage_clusters(&self) -> usize {
        self.single_linkage_clusters
    }

    /// Returns how many clusters the tour clusterer produced.
    #[must_use]
    pub const fn tour_clusters(&self) -> usize {
        self.tour_clusters
    }

    /// Returns how many tour clusters duplicated a tree cluster.
    #[must_use]
    pub const fn equivalent_clusters(&self) -> usize {
        self.equivalent_clusters
    }
}

/// Appends the clusters of `extra` missing from `primary`, comparing sorted
/// member lists. Returns the merged list and the number of duplicates.
#[must_use]
pub fn merge_clusters(
    mut primary: Vec<Vec<usize>>,
    extra: Vec<Vec<usize>>,
) -> (Vec<Vec<usize>>, usize) {
    let mut equivalent = 0;
    for cluster in extra {
        if primary.iter().any(|existing| *existing == cluster) {
            equivalent += 1;
        } else {
            primary.push(cluster);
        }
    }
    (primary, equivalent)
}

/// Clusters the customers of a Euclidean instance.
///
/// The depot becomes cluster `1` and the customer clusters follow in the
/// order the selected clusterer(s) produced them.
///
/// # Errors
/// Returns [`crate::ClubraError::Graph`] for an instance without customers,
/// [`crate::ClubraError::Tour`] when the oracle fails or returns an invalid
/// tour, and [`crate::ClubraError::Partition`] if the clusters do not fit
/// the instance.
///
/// # Examples
/// ```
/// use clubra_core::{
///     ClusteringMode, ClusteringParams, EuclideanDistances, Point,
///     clustering::cluster_instance, oracle::NearestNeighbourTour,
/// };
///
/// let distances = EuclideanDistances::new(vec![
///     Point::new(50.0, 50.0),
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(100.0, 100.0),
///     Point::new(101.0, 100.0),
///     Point::new(100.0, 101.0),
/// ]);
/// let summary = cluster_instance(
///     &distances,
///     &ClusteringParams::default(),
///     ClusteringMode::SingleLinkage,
///     &NearestNeighbourTour::default(),
/// )
/// .expect("instance is valid");
/// assert_eq!(summary.partition().to_string(), "C1 0\nC2 1 2\nC3 3 4 5\n");
/// ```
#[instrument(
    name = "clustering.instance",
    skip(distances, params, oracle),
    fields(customers = distances.customer_count()),
    err
)]
pub fn cluster_instance(
    distances: &EuclideanDistances,
    params: &ClusteringParams,
    mode: ClusteringMode,
    oracle: &dyn TourOracle,
) -> Result<ClusteringSummary> {
    let customer_count = distances.customer_count();
    let graph = WeightedGraph::customers(customer_count, |i, j| distances.distance(i, j))?;

    let tree_clusters = if mode == ClusteringMode::Tour {
        Vec::new()
    } else {
        SingleLinkageClusterer::new(*params)
            .cluster(&graph)
            .into_clusters()
    };
    let tour_clusters = if mode == ClusteringMode::SingleLinkage {
        Vec::new()
    } else {
        let tour = oracle.solve(distances.points())?;
        TourClusterer::new(*params)
            .cluster(&tour, customer_count, |i, j| distances.distance(i, j))?
            .into_clusters()
    };

    let single_linkage_clusters = tree_clusters.len();
    let tour_count = tour_clusters.len();
    let (clusters, equivalent_clusters) = merge_clusters(tree_clusters, tour_clusters);
    let partition = ClusterPartition::with_depot(customer_count, clusters)?;
    info!(
        clusters = partition.len(),
        single_linkage_clusters,
        tour_clusters = tour_count,
        equivalent_clusters,
        "instance clustered"
    );

    Ok(ClusteringSummary {
        partition,
        single_linkage_clusters,
        tour_clusters: tour_count,
        equivalent_clusters,
    })
}

#[cfg(test)]
mod tests;
