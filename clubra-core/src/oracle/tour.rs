//! Hamiltonian tours and the oracle interface that produces them.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    error::define_error_codes,
    geometry::{EuclideanDistances, Point, Rounding},
};

/// Errors describing an unusable tour.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TourError {
    /// The instance has no nodes to visit.
    #[error("cannot build a tour over an empty instance")]
    EmptyInstance,
    /// The tour does not visit the depot.
    #[error("tour does not visit the depot")]
    MissingDepot,
    /// The tour length differs from the number of nodes.
    #[error("tour visits {got} nodes but the instance has {expected}")]
    LengthMismatch {
        /// Number of nodes in the instance, depot included.
        expected: usize,
        /// Number of nodes in the tour.
        got: usize,
    },
    /// A node is visited twice.
    #[error("tour visits node {node} more than once")]
    DuplicateNode {
        /// Repeated node.
        node: usize,
    },
    /// A node id lies outside the instance.
    #[error("tour visits node {node} outside a {node_count}-node instance")]
    NodeOutOfRange {
        /// Offending node.
        node: usize,
        /// Number of nodes in the instance, depot included.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`TourError`] variants.
    enum TourErrorCode for TourError {
        /// The instance has no nodes to visit.
        EmptyInstance => EmptyInstance => "TOUR_EMPTY_INSTANCE",
        /// The tour does not visit the depot.
        MissingDepot => MissingDepot => "TOUR_MISSING_DEPOT",
        /// The tour length differs from the number of nodes.
        LengthMismatch => LengthMismatch { .. } => "TOUR_LENGTH_MISMATCH",
        /// A node is visited twice.
        DuplicateNode => DuplicateNode { .. } => "TOUR_DUPLICATE_NODE",
        /// A node id lies outside the instance.
        NodeOutOfRange => NodeOutOfRange { .. } => "TOUR_NODE_OUT_OF_RANGE",
    }
}

/// A closed tour: a visiting order plus its total cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Wraps a visiting order and the cost reported for it.
    #[must_use]
    pub const fn new(order: Vec<usize>, cost: f64) -> Self {
        Self { order, cost }
    }

    /// Returns the visiting order.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Returns the reported cost.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Checks the tour is a permutation of `0..=customer_count` and rotates
    /// it so the depot comes first.
    ///
    /// # Errors
    /// Returns [`TourError::LengthMismatch`], [`TourError::NodeOutOfRange`],
    /// [`TourError::DuplicateNode`] or [`TourError::MissingDepot`] when the
    /// order is not such a permutation.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::oracle::Tour;
    ///
    /// let tour = Tour::new(vec![2, 0, 1], 3.0).rooted_at_depot(2).expect("valid tour");
    /// assert_eq!(tour.order(), &[0, 1, 2]);
    /// ```
    pub fn rooted_at_depot(&self, customer_count: usize) -> Result<Self, TourError> {
        let node_count = customer_count + 1;
        if self.order.len() != node_count {
            return Err(TourError::LengthMismatch {
                expected: node_count,
                got: self.order.len(),
            });
        }
        let mut seen = vec![false; node_count];
        for &node in &self.order {
            let slot = seen
                .get_mut(node)
                .ok_or(TourError::NodeOutOfRange { node, node_count })?;
            if *slot {
                return Err(TourError::DuplicateNode { node });
            }
            *slot = true;
        }
        let depot = self
            .order
            .iter()
            .position(|&node| node == 0)
            .ok_or(TourError::MissingDepot)?;

        let mut order = self.order.clone();
        order.rotate_left(depot);
        Ok(Self {
            order,
            cost: self.cost,
        })
    }
}

/// Produces a closed tour over the depot (index `0`) and customers.
pub trait TourOracle {
    /// Returns a tour visiting every point exactly once.
    ///
    /// # Errors
    /// Implementations report instances they cannot tour.
    fn solve(&self, points: &[Point]) -> Result<Tour, TourError>;
}

impl<F> TourOracle for F
where
    F: Fn(&[Point]) -> Result<Tour, TourError>,
{
    fn solve(&self, points: &[Point]) -> Result<Tour, TourError> {
        self(points)
    }
}

/// Greedy nearest-neighbour tour starting at the depot.
///
/// Ties go to the smaller node id.
///
/// # Examples
/// ```
/// use clubra_core::{Point, oracle::{NearestNeighbourTour, TourOracle}};
///
/// let points = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(1.0, 0.0)];
/// let tour = NearestNeighbourTour::default().solve(&points).expect("non-empty");
/// assert_eq!(tour.order(), &[0, 2, 1]);
/// assert_eq!(tour.cost(), 10.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbourTour {
    rounding: Rounding,
}

impl NearestNeighbourTour {
    /// Creates the heuristic with the given distance rounding.
    #[must_use]
    pub const fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }
}

impl TourOracle for NearestNeighbourTour {
    #[instrument(name = "oracle.nearest_neighbour", skip(self, points), fields(nodes = points.len()))]
    fn solve(&self, points: &[Point]) -> Result<Tour, TourError> {
        if points.is_empty() {
            return Err(TourError::EmptyInstance);
        }
        let distances = EuclideanDistances::new(points.to_vec()).with_rounding(self.rounding);
        let mut visited = vec![false; points.len()];
        let mut order = Vec::with_capacity(points.len());
        let mut current = 0;
        let mut cost = 0.0;
        visited[0] = true;
        order.push(0);

        while order.len() < points.len() {
            let mut best: Option<(usize, f64)> = None;
            for (candidate, _) in visited.iter().enumerate().filter(|(_, seen)| !**seen) {
                let distance = distances.distance(current, candidate);
                if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                    best = Some((candidate, distance));
                }
            }
            let Some((next, distance)) = best else { break };
            visited[next] = true;
            order.push(next);
            cost += distance;
            current = next;
        }
        cost += distances.distance(current, 0);

        debug!(cost, "nearest-neighbour tour built");
        Ok(Tour::new(order, cost))
    }
}
