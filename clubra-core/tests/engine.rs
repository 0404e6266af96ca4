//! End-to-end scenarios: cluster an instance, then rank branching candidates
//! over a fractional solution.

mod common;

use clubra_core::{
    BranchingCandidateRanker, BranchingConfigBuilder, BranchingSession, BranchingStrategy,
    ClusteringMode, ClusteringParams, FractionalClustering, FractionalClusteringConfig,
    ClusterPartition, RankingInput,
    clustering::cluster_instance,
    mincut::{customer_min_cut, stoer_wagner},
    oracle::{CutsetOracle, CutsetRequest, NearestNeighbourTour, SupportComponentCutsets},
};
use clubra_test_support::instances;
use rstest::{fixture, rstest};

#[fixture]
fn partition() -> ClusterPartition {
    cluster_instance(
        &common::two_groups(),
        &ClusteringParams::default(),
        ClusteringMode::SingleLinkage,
        &NearestNeighbourTour::default(),
    )
    .expect("valid instance")
    .into_partition()
}

#[rstest]
fn clusters_feed_the_ranker(partition: ClusterPartition) {
    assert_eq!(partition.to_string(), "C1 0\nC2 1 2\nC3 3 4 5\n");

    let solution = common::two_group_relaxation();
    let ranked = BranchingCandidateRanker::default()
        .rank(&RankingInput::new(&solution, &partition), &mut BranchingSession::new())
        .expect("consistent inputs");
    let summary: Vec<(&str, f64)> = ranked
        .iter()
        .map(|candidate| (candidate.name(), candidate.value()))
        .collect();
    assert_eq!(summary, [("DegCluster 1", 2.5), ("DegCluster 3", 1.5)]);
}

#[rstest]
fn separated_cutsets_equal_to_clusters_are_discarded(partition: ClusterPartition) {
    let solution = common::two_group_relaxation();
    let request = CutsetRequest::new(instances::two_group_demands(), 10.0, &solution);
    let cutsets = SupportComponentCutsets::default().separate(&request);
    assert_eq!(cutsets.len(), 1);
    assert_eq!(cutsets[0].members(), &[3, 4, 5]);

    let mut session = BranchingSession::new();
    let with_degree = BranchingCandidateRanker::new(
        BranchingConfigBuilder::new()
            .with_strategies([BranchingStrategy::ClusterDegree, BranchingStrategy::Cutset])
            .build(),
    );
    let ranked = with_degree
        .rank(
            &RankingInput::new(&solution, &partition).with_cutsets(&cutsets),
            &mut session,
        )
        .expect("consistent inputs");
    assert!(ranked.iter().all(|candidate| !candidate.name().starts_with("Cutset")));
    assert_eq!(session.known_cutsets(), 1);

    let cutsets_only = BranchingCandidateRanker::new(
        BranchingConfigBuilder::new()
            .with_strategies([BranchingStrategy::Cutset])
            .build(),
    );
    let ranked = cutsets_only
        .rank(
            &RankingInput::new(&solution, &partition).with_cutsets(&cutsets),
            &mut session,
        )
        .expect("consistent inputs");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name(), "Cutset[0]");
    assert_eq!(ranked[0].value(), 1.5);
}

#[test]
fn fractional_clusters_follow_the_solution() {
    let solution = common::two_group_relaxation();
    let mut clustering = FractionalClustering::new(FractionalClusteringConfig::default(), 5);
    assert_eq!(clustering.update(&solution), Ok(2));
    assert_eq!(clustering.partition().to_string(), "C1 0\nC2 1 2\nC3 3 4 5\n");
    assert_eq!(clustering.update(&solution), Ok(0));

    let cut = customer_min_cut(&solution).expect("five customers");
    assert_eq!(cut.value(), 0.0);
    assert_eq!(cut.cuts()[0].nodes(), &[3, 4, 5]);
}

#[rstest]
#[case::four_cycle(instances::four_cycle(), 2.0, 3)]
#[case::bridge(instances::bridge(), 0.1, 1)]
fn shared_min_cut_instances(
    #[case] edges: Vec<(usize, usize, f64)>,
    #[case] value: f64,
    #[case] cuts: usize,
) {
    let node_count = edges.iter().map(|&(_, j, _)| j + 1).max().unwrap_or(0);
    let solution = common::solution(node_count, edges);
    let nodes: Vec<usize> = (1..node_count).collect();
    let result = stoer_wagner(solution.rows(), &nodes).expect("valid graph");
    assert!((result.value() - value).abs() < 1e-12);
    assert_eq!(result.len(), cuts);
}

#[test]
fn tour_and_tree_clusters_agree_on_separated_groups() {
    let summary = cluster_instance(
        &common::two_groups(),
        &ClusteringParams::default(),
        ClusteringMode::Both,
        &NearestNeighbourTour::default(),
    )
    .expect("valid instance");
    assert_eq!(summary.single_linkage_clusters(), 2);
    assert_eq!(summary.partition().len(), 3 + summary.tour_clusters() - summary.equivalent_clusters());
}
