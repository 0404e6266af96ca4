//! Unit tests for the Stoer–Wagner minimum cut.

use proptest::prelude::*;
use rstest::rstest;

use crate::solution::FractionalSolution;

use super::{MinCutError, customer_min_cut, stoer_wagner};

fn symmetric(size: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<f64>> {
    let mut weights = vec![vec![0.0; size]; size];
    for &(left, right, weight) in edges {
        weights[left][right] = weight;
        weights[right][left] = weight;
    }
    weights
}

fn crossing_weight(weights: &[Vec<f64>], nodes: &[usize], side: &[usize]) -> f64 {
    let mut total = 0.0;
    for &inside in side {
        for &outside in nodes.iter().filter(|node| !side.contains(node)) {
            total += weights[inside][outside];
        }
    }
    total
}

#[test]
fn unit_four_cycle_keeps_every_tied_phase() {
    let weights = symmetric(5, &[(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 1, 1.0)]);
    let result = stoer_wagner(&weights, &[1, 2, 3, 4]).expect("valid graph");

    assert_eq!(result.value(), 2.0);
    let sides: Vec<&[usize]> = result.cuts().iter().map(|cut| cut.nodes()).collect();
    assert_eq!(sides, vec![&[4][..], &[3, 4][..], &[2, 3, 4][..]]);
    assert_eq!(result.to_string(), "Cut#1 4\nCut#2 3 4\nCut#3 2 3 4\n");
}

#[test]
fn bridge_is_the_unique_minimum_cut() {
    let weights = symmetric(
        7,
        &[
            (1, 2, 10.0),
            (2, 3, 10.0),
            (1, 3, 10.0),
            (4, 5, 10.0),
            (5, 6, 10.0),
            (4, 6, 10.0),
            (3, 4, 0.1),
        ],
    );
    let result = stoer_wagner(&weights, &[1, 2, 3, 4, 5, 6]).expect("valid graph");

    assert!((result.value() - 0.1).abs() < 1e-12);
    assert_eq!(result.len(), 1);
    assert_eq!(result.cuts()[0].nodes(), &[4, 5, 6]);
}

#[test]
fn customer_cut_ignores_the_depot() {
    let solution = FractionalSolution::from_edges(
        4,
        [(0, 1, 5.0), (0, 2, 5.0), (0, 3, 5.0), (1, 2, 1.0), (2, 3, 0.5)],
    )
    .expect("valid edges");
    let result = customer_min_cut(&solution).expect("three customers");
    assert_eq!(result.value(), 0.5);
    assert_eq!(result.cuts()[0].nodes(), &[3]);
}

#[test]
fn disconnected_graphs_have_zero_cuts() {
    let weights = symmetric(4, &[(0, 1, 2.0), (2, 3, 2.0)]);
    let result = stoer_wagner(&weights, &[0, 1, 2, 3]).expect("valid graph");
    assert_eq!(result.value(), 0.0);
    assert!(!result.is_empty());
}

#[rstest]
#[case::single_node(vec![vec![0.0]], vec![0], MinCutError::TooFewNodes { count: 1 })]
#[case::ragged(vec![vec![0.0, 1.0], vec![1.0]], vec![0, 1], MinCutError::NotSquare { row: 1, expected: 2, got: 1 })]
#[case::outside(vec![vec![0.0; 2]; 2], vec![0, 2], MinCutError::NodeOutOfRange { node: 2, size: 2 })]
#[case::repeated(vec![vec![0.0; 3]; 3], vec![1, 1], MinCutError::DuplicateNode { node: 1 })]
#[case::not_a_number(vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]], vec![0, 1], MinCutError::NonFinite { row: 0, column: 1 })]
#[case::infinite(vec![vec![0.0, 1.0], vec![f64::INFINITY, 0.0]], vec![0, 1], MinCutError::NonFinite { row: 1, column: 0 })]
#[case::negative(vec![vec![0.0, -1.0], vec![-1.0, 0.0]], vec![0, 1], MinCutError::NegativeWeight { row: 0, column: 1 })]
#[case::asymmetric(vec![vec![0.0, 1.0, 0.0], vec![2.0, 0.0, 0.0], vec![0.0; 3]], vec![2, 0, 1], MinCutError::Asymmetric { row: 0, column: 1 })]
fn rejects_invalid_inputs(
    #[case] weights: Vec<Vec<f64>>,
    #[case] nodes: Vec<usize>,
    #[case] expected: MinCutError,
) {
    assert_eq!(stoer_wagner(&weights, &nodes), Err(expected));
}

#[test]
fn error_codes_are_stable() {
    let err = stoer_wagner(&[], &[]).expect_err("no nodes");
    assert_eq!(err.code().as_str(), "MIN_CUT_TOO_FEW_NODES");
    let err = stoer_wagner(&[vec![0.0, f64::NAN], vec![f64::NAN, 0.0]], &[0, 1])
        .expect_err("weights are not finite");
    assert_eq!(err.code().as_str(), "MIN_CUT_NON_FINITE");
}

#[test]
fn weights_outside_the_selected_nodes_are_not_checked() {
    let mut weights = symmetric(3, &[(1, 2, 0.5)]);
    weights[0][1] = f64::NAN;
    weights[2][0] = -3.0;
    weights[1][1] = f64::INFINITY;
    let result = stoer_wagner(&weights, &[1, 2]).expect("selected weights are valid");
    assert_eq!(result.value(), 0.5);
}

proptest! {
    #[test]
    fn matches_exhaustive_search(
        size in 2_usize..7,
        raw in proptest::collection::vec(0_u8..5, 21),
    ) {
        let mut weights = vec![vec![0.0; size]; size];
        let mut next = raw.iter();
        for left in 0..size {
            for right in left + 1..size {
                let weight = next.next().copied().map_or(0.0, f64::from) / 2.0;
                weights[left][right] = weight;
                weights[right][left] = weight;
            }
        }
        let nodes: Vec<usize> = (0..size).collect();
        let result = stoer_wagner(&weights, &nodes).expect("valid graph");

        let mut exhaustive = f64::INFINITY;
        for mask in 1..(1_u32 << size) - 1 {
            let side: Vec<usize> = nodes.iter().copied().filter(|&node| mask & (1 << node) != 0).collect();
            exhaustive = exhaustive.min(crossing_weight(&weights, &nodes, &side));
        }
        prop_assert!((result.value() - exhaustive).abs() < 1e-9);
        for cut in result.cuts() {
            prop_assert!(!cut.nodes().is_empty() && cut.nodes().len() < size);
            prop_assert!((crossing_weight(&weights, &nodes, cut.nodes()) - result.value()).abs() < 1e-9);
        }
    }
}
