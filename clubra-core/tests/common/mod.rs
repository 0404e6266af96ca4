//! Conversions from the shared instances into engine types.

use clubra_core::{EuclideanDistances, FractionalSolution, Point};
use clubra_test_support::instances;

pub fn two_groups() -> EuclideanDistances {
    EuclideanDistances::new(
        instances::two_groups()
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect(),
    )
}

pub fn solution(node_count: usize, edges: Vec<(usize, usize, f64)>) -> FractionalSolution {
    FractionalSolution::from_edges(node_count, edges).expect("fixture edges are valid")
}

pub fn two_group_relaxation() -> FractionalSolution {
    solution(6, instances::two_group_relaxation())
}
