//! Synthetic routing instances for benchmarking.
//!
//! Provides [`SyntheticInstance`], a seeded set of customer coordinates and
//! demands on a square plane with the depot at its centre, together with a
//! fractional relaxation over the same nodes.

use clubra_core::{ClubraError, ClusterPartition, EuclideanDistances, FractionalSolution, Point};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Side length of the square the customers are drawn from.
const PLANE_SIDE: f64 = 1_000.0;

/// Customers served by each synthetic route.
const ROUTE_LENGTH: usize = 8;

/// Errors that may occur during synthetic instance generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// Fewer than two customers were requested.
    #[error("at least two customers are required, got {got}")]
    TooFewCustomers {
        /// Requested customer count.
        got: usize,
    },
}

/// Configuration for synthetic instance generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of customers, depot excluded.
    pub customer_count: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Seeded customer coordinates and demands.
///
/// # Examples
///
/// ```
/// use clubra_benches::source::{SyntheticConfig, SyntheticInstance};
///
/// let config = SyntheticConfig { customer_count: 10, seed: 42 };
/// let instance = SyntheticInstance::generate(&config).expect("valid config");
/// assert_eq!(instance.points().len(), 11);
/// assert_eq!(instance.demands()[0], 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticInstance {
    points: Vec<Point>,
    demands: Vec<f64>,
    seed: u64,
}

impl SyntheticInstance {
    /// Generates the instance eagerly from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::TooFewCustomers`] when fewer than two
    /// customers are requested.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.customer_count < 2 {
            return Err(SyntheticError::TooFewCustomers {
                got: config.customer_count,
            });
        }

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let centre = PLANE_SIDE / 2.0;
        let mut points = vec![Point::new(centre, centre)];
        let mut demands = vec![0.0];
        for _ in 0..config.customer_count {
            points.push(Point::new(
                rng.gen_range(0.0..PLANE_SIDE),
                rng.gen_range(0.0..PLANE_SIDE),
            ));
            demands.push(f64::from(rng.gen_range(1_u8..=20)));
        }
        Ok(Self {
            points,
            demands,
            seed: config.seed,
        })
    }

    /// Returns the coordinates, depot first.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the demands, `0` for the depot.
    #[must_use]
    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    /// Returns the number of customers.
    #[must_use]
    pub const fn customer_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns the Euclidean distance matrix over the instance.
    #[must_use]
    pub fn distances(&self) -> EuclideanDistances {
        EuclideanDistances::new(self.points.clone())
    }

    /// Builds a fractional relaxation over the instance.
    ///
    /// Every node sends flow to its ring successor and to the node two
    /// places ahead, the two shares summing to one.
    ///
    /// # Errors
    ///
    /// Returns [`ClubraError::Solution`] if the generated entries are
    /// rejected.
    pub fn relaxation(&self) -> Result<FractionalSolution, ClubraError> {
        let node_count = self.points.len();
        let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(1));
        let mut edges = Vec::with_capacity(node_count * 2);
        for node in 0..node_count {
            let share = rng.gen_range(0.2..0.8);
            edges.push((node, (node + 1) % node_count, share));
            edges.push((node, (node + 2) % node_count, 1.0 - share));
        }
        Ok(FractionalSolution::from_edges(node_count, edges)?)
    }

    /// Splits the customers, in index order, into routes of at most eight.
    ///
    /// # Errors
    ///
    /// Returns [`ClubraError::Partition`] if a route is rejected.
    pub fn routes(&self) -> Result<ClusterPartition, ClubraError> {
        let customers: Vec<usize> = (1..self.points.len()).collect();
        Ok(ClusterPartition::from_clusters(
            self.points.len(),
            customers.chunks(ROUTE_LENGTH).map(<[usize]>::to_vec),
        )?)
    }
}
