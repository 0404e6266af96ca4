//! Unit tests for the built-in oracles.

use rstest::rstest;

use crate::{geometry::Point, solution::FractionalSolution};

use super::{
    Cutset, CutsetOracle, CutsetRequest, NearestNeighbourTour, SupportComponentCutsets, Tour,
    TourError, TourOracle,
};

#[test]
fn rooting_rotates_the_depot_first() {
    let tour = Tour::new(vec![3, 1, 0, 2], 9.0)
        .rooted_at_depot(3)
        .expect("valid tour");
    assert_eq!(tour.order(), &[0, 2, 3, 1]);
    assert_eq!(tour.cost(), 9.0);
}

#[rstest]
#[case::no_depot(vec![1, 2, 3], 3, TourError::LengthMismatch { expected: 4, got: 3 })]
#[case::depot_replaced(vec![1, 2, 3], 2, TourError::NodeOutOfRange { node: 3, node_count: 3 })]
fn rooting_reports_invalid_orders(
    #[case] order: Vec<usize>,
    #[case] customers: usize,
    #[case] expected: TourError,
) {
    assert_eq!(Tour::new(order, 0.0).rooted_at_depot(customers), Err(expected));
}

#[test]
fn nearest_neighbour_visits_every_point() {
    let points: Vec<Point> = (0..9)
        .map(|index| Point::new(f64::from(index % 3), f64::from(index / 3)))
        .collect();
    let tour = NearestNeighbourTour::default()
        .solve(&points)
        .expect("non-empty instance");
    let mut visited = tour.order().to_vec();
    visited.sort_unstable();
    assert_eq!(visited, (0..9).collect::<Vec<_>>());
    assert_eq!(tour.order()[0], 0);
    assert!(tour.cost() >= 9.0);
}

#[test]
fn nearest_neighbour_rejects_empty_instances() {
    let err = NearestNeighbourTour::default()
        .solve(&[])
        .expect_err("empty instance");
    assert_eq!(err.code().as_str(), "TOUR_EMPTY_INSTANCE");
}

#[test]
fn closures_act_as_tour_oracles() {
    let oracle = |points: &[Point]| -> Result<Tour, TourError> {
        Ok(Tour::new((0..points.len()).rev().collect(), 1.0))
    };
    let tour = oracle
        .solve(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
        .expect("closure succeeds");
    assert_eq!(tour.order(), &[1, 0]);
}

fn three_components() -> CutsetRequest {
    let solution = FractionalSolution::from_edges(
        7,
        [
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.5),
            (0, 3, 1.2),
            (3, 4, 1.0),
            (0, 4, 1.2),
            (0, 5, 1.0),
            (5, 6, 1.0),
            (0, 6, 1.0),
        ],
    )
    .expect("valid edges");
    CutsetRequest::new(vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0], 5.0, &solution)
}

#[test]
fn support_cutsets_are_ordered_by_target_distance() {
    let cutsets = SupportComponentCutsets::default().separate(&three_components());
    let members: Vec<&[usize]> = cutsets.iter().map(Cutset::members).collect();
    assert_eq!(members, vec![&[1, 2][..], &[3, 4][..]]);
    assert_eq!(cutsets[0].boundary(), 2.5);
}

#[test]
fn support_cutsets_respect_the_cap() {
    let cutsets = SupportComponentCutsets::default()
        .with_max_sets(1)
        .separate(&three_components());
    assert_eq!(cutsets.len(), 1);
}

#[rstest]
#[case(2.0)]
#[case(4.0)]
#[case(f64::NAN)]
fn boundary_target_must_lie_inside_the_window(#[case] target: f64) {
    let err = SupportComponentCutsets::default()
        .with_boundary_target(target)
        .expect_err("target outside (2, 4)");
    assert_eq!(err.code().as_str(), "CONFIG_INVALID_BOUNDARY_TARGET");
}

#[test]
fn zero_capacity_yields_no_cutsets() {
    let solution = FractionalSolution::from_edges(2, [(0, 1, 2.0)]).expect("valid edges");
    let request = CutsetRequest::new(vec![0.0, 1.0], 0.0, &solution);
    assert!(SupportComponentCutsets::default().separate(&request).is_empty());
}
