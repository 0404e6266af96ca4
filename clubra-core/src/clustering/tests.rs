//! Unit tests for the static and fractional clusterers.

use proptest::prelude::*;
use rstest::{fixture, rstest};

use crate::{
    error::ConfigError,
    geometry::{EuclideanDistances, Point},
    graph::WeightedGraph,
    oracle::{NearestNeighbourTour, Tour, TourError},
    solution::FractionalSolution,
};

use super::{
    ClusteringMode, ClusteringParams, ClusteringParamsBuilder, EdgeStatistics,
    FractionalClustering, FractionalClusteringConfig, SingleLinkageClusterer, TourClusterer,
    adaptive_cutoff, cluster_instance, merge_clusters,
};

#[fixture]
fn two_groups() -> EuclideanDistances {
    EuclideanDistances::new(vec![
        Point::new(50.0, 50.0),
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(101.0, 100.0),
        Point::new(100.0, 101.0),
    ])
}

fn graph_of(distances: &EuclideanDistances) -> WeightedGraph {
    WeightedGraph::customers(distances.customer_count(), |i, j| distances.distance(i, j))
        .expect("valid graph")
}

fn params(multiplier: f64, big: bool, singletons: bool) -> ClusteringParams {
    ClusteringParamsBuilder::new()
        .with_std_dev_multiplier(multiplier)
        .with_enable_big_clusters(big)
        .with_enable_singletons(singletons)
        .build()
        .expect("valid parameters")
}

#[rstest]
fn separates_two_spatial_groups(two_groups: EuclideanDistances) {
    let outcome = SingleLinkageClusterer::new(ClusteringParams::default()).cluster(&graph_of(&two_groups));
    assert_eq!(outcome.clusters(), &[vec![1, 2], vec![3, 4, 5]]);
    let cutoff = outcome.cutoff().expect("tree has edges");
    assert_eq!(cutoff.value(), 127.0);
    assert_eq!(cutoff.iterations(), 0);
}

#[rstest]
fn instance_clustering_prepends_the_depot(two_groups: EuclideanDistances) {
    let summary = cluster_instance(
        &two_groups,
        &ClusteringParams::default(),
        ClusteringMode::SingleLinkage,
        &NearestNeighbourTour::default(),
    )
    .expect("valid instance");
    assert_eq!(summary.partition().to_string(), "C1 0\nC2 1 2\nC3 3 4 5\n");
    assert_eq!(summary.single_linkage_clusters(), 2);
    assert_eq!(summary.tour_clusters(), 0);
}

#[rstest]
fn both_modes_skip_equivalent_tour_clusters(two_groups: EuclideanDistances) {
    let oracle = |_: &[Point]| -> Result<Tour, TourError> { Ok(Tour::new(vec![0, 1, 2, 3, 4, 5], 0.0)) };
    let summary = cluster_instance(
        &two_groups,
        &ClusteringParams::default(),
        ClusteringMode::Both,
        &oracle,
    )
    .expect("valid instance");
    assert_eq!(summary.tour_clusters(), 2);
    assert_eq!(summary.equivalent_clusters(), 2);
    assert_eq!(summary.partition().len(), 3);
}

#[rstest]
fn invalid_tours_are_rejected(two_groups: EuclideanDistances) {
    let oracle = |_: &[Point]| -> Result<Tour, TourError> { Ok(Tour::new(vec![0, 1, 2], 0.0)) };
    let err = cluster_instance(&two_groups, &ClusteringParams::default(), ClusteringMode::Tour, &oracle)
        .expect_err("short tour");
    assert_eq!(err.code().as_str(), "CLUBRA_TOUR");
}

#[test]
fn tour_clusterer_ignores_depot_edges() {
    let positions = [50.0_f64, 0.0, 1.0, 100.0, 101.0];
    let tour = Tour::new(vec![3, 4, 0, 1, 2], 202.0);
    let outcome = TourClusterer::new(ClusteringParams::default())
        .cluster(&tour, 4, |i, j| (positions[i] - positions[j]).abs())
        .expect("valid tour");
    assert_eq!(outcome.clusters(), &[vec![1, 2], vec![3, 4]]);
}

#[rstest]
#[case::missing_node(vec![0, 1, 1], TourError::DuplicateNode { node: 1 })]
#[case::short(vec![0, 1], TourError::LengthMismatch { expected: 3, got: 2 })]
#[case::unknown(vec![0, 1, 5], TourError::NodeOutOfRange { node: 5, node_count: 3 })]
fn tour_clusterer_validates_the_tour(#[case] order: Vec<usize>, #[case] expected: TourError) {
    let result = TourClusterer::new(ClusteringParams::default()).cluster(&Tour::new(order, 0.0), 2, |_, _| 1.0);
    assert_eq!(result, Err(expected));
}

#[test]
fn merge_counts_duplicates() {
    let (merged, equivalent) = merge_clusters(
        vec![vec![1, 2], vec![3]],
        vec![vec![3], vec![1], vec![2]],
    );
    assert_eq!(merged, vec![vec![1, 2], vec![3], vec![1], vec![2]]);
    assert_eq!(equivalent, 1);
}

#[test]
fn oversized_components_are_split() {
    let positions = [0.0_f64, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
    let graph = WeightedGraph::customers(10, |i, j| (positions[i] - positions[j]).abs())
        .expect("valid graph");
    let split = SingleLinkageClusterer::new(params(1.5, false, false)).cluster(&graph);
    let whole = SingleLinkageClusterer::new(params(1.5, true, false)).cluster(&graph);

    assert!(split.clusters().len() > whole.clusters().len());
    assert!(split.clusters().iter().all(|cluster| cluster.len() > 1));
}

#[test]
fn constant_weights_clamp_the_cutoff() {
    let stats = EdgeStatistics::from_weights(&[2.5, 2.5, 2.5]).expect("non-empty");
    let cutoff = adaptive_cutoff(&stats, 1.5, 0.25);
    assert_eq!(cutoff.value(), 2.5);
    assert_eq!(cutoff.initial(), 3.0);
}

#[test]
fn cutoff_search_matches_stepwise_descent() {
    let stats = EdgeStatistics::from_weights(&[1.0, 1.0, 1.0, 1.000_001]).expect("non-empty");
    let cutoff = adaptive_cutoff(&stats, 1.5, 0.25);
    assert!(cutoff.value() <= stats.max());
    let previous = (stats.mean() + (cutoff.applied_multiplier() + 0.25) * stats.std_dev()).ceil();
    assert!(previous > stats.max());
}

#[test]
fn short_descents_subtract_the_step_repeatedly() {
    let stats = EdgeStatistics::from_weights(&[1.0, 3.0]).expect("non-empty");
    let mut applied = 1.5_f64;
    let mut iterations = 0_u64;
    while (stats.mean() + applied * stats.std_dev()).ceil() > stats.max() {
        applied -= 0.1;
        iterations += 1;
    }

    let cutoff = adaptive_cutoff(&stats, 1.5, 0.1);
    assert_eq!(cutoff.applied_multiplier().to_bits(), applied.to_bits());
    assert_eq!(cutoff.iterations(), iterations);
    assert_eq!(cutoff.value(), 3.0);
}

#[test]
fn long_descents_jump_to_the_boundary() {
    let stats = EdgeStatistics::from_weights(&[1.0, 3.0]).expect("non-empty");
    let step = 1e-6;
    let cutoff = adaptive_cutoff(&stats, 1.5, step);
    let at = |iterations: u64| 1.5 - iterations as f64 * step;

    assert!((499_999..=500_002).contains(&cutoff.iterations()), "{}", cutoff.iterations());
    assert_eq!(cutoff.applied_multiplier(), at(cutoff.iterations()));
    assert_eq!(cutoff.value(), 3.0);
    let previous = (stats.mean() + at(cutoff.iterations() - 1) * stats.std_dev()).ceil();
    assert!(previous > stats.max());
}

#[test]
fn vanishing_steps_stop_at_the_floor_of_the_maximum() {
    let stats = EdgeStatistics::from_weights(&[1.0, 3.5]).expect("non-empty");
    let cutoff = adaptive_cutoff(&stats, 1.5, 1e-300);
    assert_eq!(cutoff.value(), 3.0);
    assert_eq!(cutoff.iterations(), u64::MAX);
    assert!((cutoff.applied_multiplier() - 0.6).abs() < 1e-12);
}

#[rstest]
#[case::nan_multiplier(ClusteringParamsBuilder::new().with_std_dev_multiplier(f64::NAN), "CONFIG_INVALID_STD_DEV_MULTIPLIER")]
#[case::zero_threshold(ClusteringParamsBuilder::new().with_big_cluster_size_threshold(0.0), "CONFIG_INVALID_SIZE_THRESHOLD")]
#[case::negative_step(ClusteringParamsBuilder::new().with_decreasing_step(-0.5), "CONFIG_INVALID_DECREASING_STEP")]
fn builder_rejects_invalid_parameters(#[case] builder: ClusteringParamsBuilder, #[case] code: &str) {
    let err = builder.build().expect_err("invalid parameters");
    assert_eq!(err.code().as_str(), code);
}

#[test]
fn fractional_threshold_must_be_positive() {
    assert_eq!(
        FractionalClusteringConfig::new(0.0),
        Err(ConfigError::InvalidFractionalThreshold { got: 0.0 })
    );
}

#[test]
fn fractional_clustering_accumulates_new_components() {
    let mut clustering = FractionalClustering::new(FractionalClusteringConfig::default(), 4);
    let first = FractionalSolution::from_edges(5, [(0, 1, 1.0), (1, 2, 1.0), (3, 4, 0.4)])
        .expect("valid edges");
    assert_eq!(clustering.update(&first).expect("sizes match"), 3);
    assert_eq!(clustering.partition().to_string(), "C1 0\nC2 1 2\nC3 3\nC4 4\n");

    let second = FractionalSolution::from_edges(5, [(2, 3, 0.5), (3, 4, 0.5)]).expect("valid edges");
    assert_eq!(clustering.update(&second).expect("sizes match"), 2);
    assert_eq!(
        clustering.partition().to_string(),
        "C1 0\nC2 1 2\nC3 3\nC4 4\nC5 1\nC6 2 3 4\n"
    );
}

#[test]
fn fractional_clustering_rejects_larger_solutions() {
    let mut clustering = FractionalClustering::new(FractionalClusteringConfig::default(), 2);
    let err = clustering
        .update(&FractionalSolution::new(5))
        .expect_err("solution too large");
    assert_eq!(err.code().as_str(), "PARTITION_NODE_OUT_OF_RANGE");
}

fn scattered(coordinates: &[(u8, u8)]) -> WeightedGraph {
    let points: Vec<Point> = std::iter::once(Point::new(0.0, 0.0))
        .chain(
            coordinates
                .iter()
                .map(|&(x, y)| Point::new(f64::from(x), f64::from(y))),
        )
        .collect();
    let distances = EuclideanDistances::new(points);
    graph_of(&distances)
}

proptest! {
    #[test]
    fn clusters_cover_every_customer_once(
        coordinates in proptest::collection::vec((0_u8..60, 0_u8..60), 1..24),
        big in any::<bool>(),
        singletons in any::<bool>(),
    ) {
        let graph = scattered(&coordinates);
        let outcome = SingleLinkageClusterer::new(params(1.5, big, singletons)).cluster(&graph);
        let mut members: Vec<usize> = outcome.clusters().iter().flatten().copied().collect();
        members.sort_unstable();
        prop_assert_eq!(members, (1..=coordinates.len()).collect::<Vec<_>>());
    }

    #[test]
    fn no_singletons_when_disabled(
        coordinates in proptest::collection::vec((0_u8..60, 0_u8..60), 2..24),
        big in any::<bool>(),
    ) {
        let graph = scattered(&coordinates);
        let outcome = SingleLinkageClusterer::new(params(1.5, big, false)).cluster(&graph);
        prop_assert!(outcome.clusters().iter().all(|cluster| cluster.len() > 1));
    }

    #[test]
    fn larger_multiplier_never_lowers_the_initial_cutoff(
        coordinates in proptest::collection::vec((0_u8..60, 0_u8..60), 2..24),
        low in 0.0_f64..3.0,
        delta in 0.0_f64..3.0,
    ) {
        let graph = scattered(&coordinates);
        let lower = SingleLinkageClusterer::new(params(low, true, true)).cluster(&graph);
        let higher = SingleLinkageClusterer::new(params(low + delta, true, true)).cluster(&graph);
        let (Some(lower_cut), Some(higher_cut)) = (lower.cutoff(), higher.cutoff()) else {
            return Ok(());
        };
        prop_assert!(higher_cut.initial() >= lower_cut.initial());
        if lower_cut.iterations() == 0 && higher_cut.iterations() == 0 {
            prop_assert!(higher.clusters().len() <= lower.clusters().len());
        }
    }
}
