//! Span and event assertions for the instrumented entry points.

mod common;

use clubra_core::{
    BranchingCandidateRanker, BranchingSession, ClusteringParams, RankingInput,
    SingleLinkageClusterer, WeightedGraph,
    clustering::cluster_instance,
    mincut::stoer_wagner,
    oracle::NearestNeighbourTour,
};
use clubra_test_support::{instances, tracing::RecordingLayer};
use tracing::Level;

#[test]
fn single_linkage_reports_its_cutoff() {
    let distances = common::two_groups();
    let graph = WeightedGraph::customers(distances.customer_count(), |i, j| distances.distance(i, j))
        .expect("valid graph");
    let (outcome, layer) = RecordingLayer::capture(|| {
        SingleLinkageClusterer::new(ClusteringParams::default()).cluster(&graph)
    });
    assert_eq!(outcome.clusters().len(), 2);

    let span = layer.span("clustering.single_linkage").expect("span recorded");
    assert_eq!(span.field("nodes"), Some("5"));
    let selected = layer.events_with_message("tree cutoff selected");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].level, Level::INFO);
    assert_eq!(selected[0].field("cutoff"), Some("127"));
    assert_eq!(selected[0].field("applied_multiplier"), Some("1.5"));
}

#[test]
fn instance_clustering_nests_its_spans() {
    let (result, layer) = RecordingLayer::capture(|| {
        cluster_instance(
            &common::two_groups(),
            &ClusteringParams::default(),
            clubra_core::ClusteringMode::Both,
            &NearestNeighbourTour::default(),
        )
    });
    assert!(result.is_ok());
    let names: Vec<String> = layer.spans().into_iter().map(|span| span.name).collect();
    for expected in [
        "clustering.single_linkage",
        "oracle.nearest_neighbour",
        "clustering.tour",
        "clustering.instance",
    ] {
        assert!(names.iter().any(|name| name == expected), "missing span {expected}: {names:?}");
    }
    assert_eq!(names.last().map(String::as_str), Some("clustering.instance"));
}

#[test]
fn ranking_records_the_candidate_count() {
    let solution = common::two_group_relaxation();
    let partition = clubra_core::ClusterPartition::with_depot(5, vec![vec![1, 2], vec![3, 4, 5]])
        .expect("valid clusters");
    let (ranked, layer) = RecordingLayer::capture(|| {
        BranchingCandidateRanker::default()
            .rank(&RankingInput::new(&solution, &partition), &mut BranchingSession::new())
    });
    assert_eq!(ranked.map(|ranked| ranked.len()), Ok(2));

    let span = layer.span("branching.rank").expect("span recorded");
    assert_eq!(span.field("clusters"), Some("3"));
    assert_eq!(span.field("candidates"), Some("2"));
}

#[test]
fn failing_min_cuts_record_the_error() {
    let (result, layer) = RecordingLayer::capture(|| stoer_wagner(&[vec![0.0]], &[0]));
    assert!(result.is_err());
    assert!(layer.span("mincut.stoer_wagner").is_some());
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR && event.field("error").is_some())
    );
}

#[test]
fn min_cut_reports_the_value() {
    let solution = common::solution(5, instances::four_cycle());
    let (result, layer) = RecordingLayer::capture(|| stoer_wagner(solution.rows(), &[1, 2, 3, 4]));
    assert_eq!(result.map(|cut| cut.value()), Ok(2.0));
    let found = layer.events_with_message("minimum cut found");
    assert_eq!(found[0].field("cuts"), Some("3"));
}
