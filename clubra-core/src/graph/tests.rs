//! Unit tests for complete graph construction.

use rstest::rstest;

use super::{GraphError, WeightedEdge, WeightedGraph};

#[test]
fn rejects_empty_node_set() {
    let result = WeightedGraph::complete(Vec::new(), |_, _| 1.0);
    assert!(matches!(result, Err(GraphError::EmptyGraph)));
}

#[test]
fn rejects_duplicate_nodes() {
    let result = WeightedGraph::complete([1, 2, 2], |_, _| 1.0);
    assert!(matches!(result, Err(GraphError::DuplicateNode { node: 2 })));
}

#[rstest]
#[case::nan(f64::NAN)]
#[case::infinite(f64::INFINITY)]
fn rejects_non_finite_weights(#[case] weight: f64) {
    let result = WeightedGraph::complete([1, 2], |_, _| weight);
    assert!(matches!(
        result,
        Err(GraphError::NonFiniteWeight { left: 1, right: 2 })
    ));
}

#[test]
fn rejects_negative_weights() {
    let err = WeightedGraph::complete([0, 4], |_, _| -1.0).expect_err("negative weight");
    assert_eq!(err.code().as_str(), "GRAPH_NEGATIVE_WEIGHT");
}

#[test]
fn customer_graph_excludes_depot() {
    let graph = WeightedGraph::customers(4, |i, j| (i + j) as f64).expect("valid graph");
    assert_eq!(graph.nodes(), &[1, 2, 3, 4]);
    assert_eq!(graph.edges().len(), 6);
    assert!(graph.edges().iter().all(|edge| edge.source() >= 1));
    assert!(graph.edges().iter().all(|edge| edge.source() < edge.target()));
    assert_eq!(graph.id_bound(), 5);
}

#[test]
fn single_node_graph_has_no_edges() {
    let graph = WeightedGraph::customers(1, |_, _| 1.0).expect("valid graph");
    assert!(graph.edges().is_empty());
    assert_eq!(graph.id_bound(), 2);
}

#[test]
fn sorted_edges_break_ties_by_endpoints() {
    let graph = WeightedGraph::complete([1, 2, 3], |i, j| if i + j == 5 { 2.0 } else { 1.0 })
        .expect("valid graph");
    let sorted = graph.sorted_edges();
    assert_eq!(
        sorted,
        vec![
            WeightedEdge::new(1, 2, 1.0),
            WeightedEdge::new(1, 3, 1.0),
            WeightedEdge::new(2, 3, 2.0),
        ]
    );
}

#[test]
fn edge_constructor_canonicalises_endpoints() {
    let edge = WeightedEdge::new(7, 3, 0.5);
    assert_eq!((edge.source(), edge.target()), (3, 7));
}
