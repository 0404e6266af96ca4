//! Single-linkage clustering along a Hamiltonian tour.

use tracing::{debug, info, instrument};

use crate::{
    graph::UnionFind,
    oracle::{Tour, TourError},
};

use super::{
    ClusteringOutcome, ClusteringParams,
    cutoff::{EdgeStatistics, adaptive_cutoff},
};

/// Clusters customers by cutting a closed tour at its heavy edges.
///
/// Statistics cover every tour edge, the two depot edges included, but only
/// consecutive customer pairs are ever merged.
///
/// # Examples
/// ```
/// use clubra_core::{ClusteringParams, TourClusterer, oracle::Tour};
///
/// let positions: [f64; 5] = [50.0, 0.0, 1.0, 100.0, 101.0];
/// let tour = Tour::new(vec![0, 1, 2, 3, 4], 202.0);
/// let outcome = TourClusterer::new(ClusteringParams::default())
///     .cluster(&tour, 4, |i, j| (positions[i] - positions[j]).abs())
///     .expect("tour is valid");
/// assert_eq!(outcome.clusters(), &[vec![1, 2], vec![3, 4]]);
/// ```
#[derive(Clone, Debug)]
pub struct TourClusterer {
    params: ClusteringParams,
}

impl TourClusterer {
    /// Creates a clusterer with the given parameters.
    #[must_use]
    pub const fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    /// Partitions customers `1..=customer_count` along `tour`.
    ///
    /// # Errors
    /// Returns a [`TourError`] when `tour` is not a permutation of the depot
    /// and the customers.
    #[instrument(name = "clustering.tour", skip(self, tour, distance), err)]
    pub fn cluster<D>(
        &self,
        tour: &Tour,
        customer_count: usize,
        distance: D,
    ) -> Result<ClusteringOutcome, TourError>
    where
        D: Fn(usize, usize) -> f64,
    {
        let rooted = tour.rooted_at_depot(customer_count)?;
        let order = rooted.order();
        let weights: Vec<f64> = order
            .iter()
            .zip(order.iter().cycle().skip(1))
            .map(|(&from, &to)| distance(from, to))
            .collect();
        let customers = 1..=customer_count;
        let Some(stats) = EdgeStatistics::from_weights(&weights).filter(|_| customer_count > 1)
        else {
            return Ok(ClusteringOutcome::new(
                customers.map(|node| vec![node]).collect(),
                None,
            ));
        };
        debug!(
            tour_cost = rooted.cost(),
            mean = stats.mean(),
            std_dev = stats.std_dev(),
            max = stats.max(),
            "tour statistics computed"
        );

        let cutoff = adaptive_cutoff(
            &stats,
            self.params.tour_std_dev_multiplier(),
            self.params.decreasing_step(),
        );
        info!(
            cutoff = cutoff.value(),
            applied_multiplier = cutoff.applied_multiplier(),
            "tour cutoff selected"
        );

        let mut sets = UnionFind::new(customer_count + 1);
        for position in 1..order.len() - 1 {
            if weights[position] < cutoff.value() {
                sets.union(order[position], order[position + 1]);
            }
        }
        let clusters = sets.components(customers);
        debug!(clusters = clusters.len(), "tour clusters extracted");
        Ok(ClusteringOutcome::new(clusters, Some(cutoff)))
    }
}
