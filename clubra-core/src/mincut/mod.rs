//! Global minimum cut by the Stoer–Wagner algorithm.
//!
//! Each phase grows a maximum-adjacency ordering from the first node, which
//! is never merged away. The last node added defines the cut of the phase and
//! is then merged into the node added before it. Every phase whose cut ties
//! the running minimum is kept, so the result lists all minimum cuts the
//! phases encountered, not just the first.

use std::fmt;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{error::define_error_codes, solution::FractionalSolution};

/// Cut values closer than this are treated as tied.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Largest accepted difference between `w[i][j]` and `w[j][i]`.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Errors raised while computing a minimum cut.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MinCutError {
    /// The weight matrix is not square.
    #[error("row {row} has {got} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows.
        expected: usize,
        /// Entries in the offending row.
        got: usize,
    },
    /// Fewer than two nodes were supplied.
    #[error("a cut needs at least two nodes (got {count})")]
    TooFewNodes {
        /// Number of nodes supplied.
        count: usize,
    },
    /// A node label lies outside the matrix.
    #[error("node {node} lies outside a {size}-row weight matrix")]
    NodeOutOfRange {
        /// Offending node.
        node: usize,
        /// Number of rows in the matrix.
        size: usize,
    },
    /// A node label was listed twice.
    #[error("node {node} is listed more than once")]
    DuplicateNode {
        /// Repeated node.
        node: usize,
    },
    /// A weight between two selected nodes is NaN or infinite.
    #[error("weight between nodes {row} and {column} is not finite")]
    NonFinite {
        /// Row node.
        row: usize,
        /// Column node.
        column: usize,
    },
    /// A weight between two selected nodes is negative.
    #[error("weight between nodes {row} and {column} is negative")]
    NegativeWeight {
        /// Row node.
        row: usize,
        /// Column node.
        column: usize,
    },
    /// `w[row][column]` and `w[column][row]` differ.
    #[error("weights between nodes {row} and {column} are not symmetric")]
    Asymmetric {
        /// Row node.
        row: usize,
        /// Column node.
        column: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MinCutError`] variants.
    enum MinCutErrorCode for MinCutError {
        /// The weight matrix is not square.
        NotSquare => NotSquare { .. } => "MIN_CUT_NOT_SQUARE",
        /// Fewer than two nodes were supplied.
        TooFewNodes => TooFewNodes { .. } => "MIN_CUT_TOO_FEW_NODES",
        /// A node label lies outside the matrix.
        NodeOutOfRange => NodeOutOfRange { .. } => "MIN_CUT_NODE_OUT_OF_RANGE",
        /// A node label was listed twice.
        DuplicateNode => DuplicateNode { .. } => "MIN_CUT_DUPLICATE_NODE",
        /// A weight between two selected nodes is NaN or infinite.
        NonFinite => NonFinite { .. } => "MIN_CUT_NON_FINITE",
        /// A weight between two selected nodes is negative.
        NegativeWeight => NegativeWeight { .. } => "MIN_CUT_NEGATIVE_WEIGHT",
        /// The weights between two selected nodes are not symmetric.
        Asymmetric => Asymmetric { .. } => "MIN_CUT_ASYMMETRIC",
    }
}

/// One side of a cut and the weight crossing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    nodes: Vec<usize>,
    weight: f64,
}

impl Cut {
    /// Returns the nodes on the recorded side, ascending.
    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the weight of the edges crossing the cut.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Minimum cut value and every phase cut tied with it, in phase order.
#[derive(Clone, Debug, PartialEq)]
pub struct MinCutResult {
    value: f64,
    cuts: Vec<Cut>,
}

impl MinCutResult {
    /// Returns the minimum cut value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns the tied minimum cuts.
    #[must_use]
    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    /// Returns the number of tied minimum cuts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Returns `true` when no cut was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

impl fmt::Display for MinCutResult {
    /// Renders one `Cut#<k> n1 n2 ...` line per cut, `k` starting at `1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cut) in self.cuts.iter().enumerate() {
            write!(f, "Cut#{}", index + 1)?;
            for node in &cut.nodes {
                write!(f, " {node}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Computes the global minimum cut of the graph induced by `nodes` on the
/// symmetric matrix `weights`.
///
/// # Errors
/// Returns [`MinCutError`] when the matrix is not square, fewer than two
/// nodes are given, or a node is out of range or repeated. Weights between
/// the given nodes must be finite, nonnegative and symmetric.
///
/// # Examples
/// ```
/// use clubra_core::mincut::stoer_wagner;
///
/// let weights = vec![
///     vec![0.0, 3.0, 1.0],
///     vec![3.0, 0.0, 1.0],
///     vec![1.0, 1.0, 0.0],
/// ];
/// let result = stoer_wagner(&weights, &[0, 1, 2]).expect("valid graph");
/// assert_eq!(result.value(), 2.0);
/// assert_eq!(result.cuts()[0].nodes(), &[2]);
/// ```
#[instrument(name = "mincut.stoer_wagner", skip(weights, nodes), fields(nodes = nodes.len()), err)]
pub fn stoer_wagner(weights: &[Vec<f64>], nodes: &[usize]) -> Result<MinCutResult, MinCutError> {
    validate(weights, nodes)?;
    let count = nodes.len();
    let mut graph: Vec<Vec<f64>> = nodes
        .iter()
        .map(|&row| {
            nodes
                .iter()
                .map(|&column| if row == column { 0.0 } else { weights[row][column] })
                .collect()
        })
        .collect();
    let mut bins: Vec<Vec<usize>> = nodes.iter().map(|&node| vec![node]).collect();
    let mut shrunk = vec![false; count];
    let mut best: Option<MinCutResult> = None;

    for _phase in 1..count {
        let active: Vec<usize> = (0..count).filter(|&index| !shrunk[index]).collect();
        let mut added = vec![false; count];
        let mut tightness = graph[0].clone();
        added[0] = true;
        let mut previous = 0;

        for step in 1..active.len() {
            let Some(tight) = most_tightly_connected(&active, &added, &tightness) else {
                break;
            };
            if step + 1 < active.len() {
                added[tight] = true;
                for &other in active.iter().filter(|&&other| !added[other]) {
                    tightness[other] += graph[tight][other];
                }
                previous = tight;
                continue;
            }

            let mut side = bins[tight].clone();
            side.sort_unstable();
            record(
                &mut best,
                Cut {
                    nodes: side,
                    weight: tightness[tight],
                },
            );
            merge(&mut graph, previous, tight);
            shrunk[tight] = true;
            let absorbed = std::mem::take(&mut bins[tight]);
            bins[previous].extend(absorbed);
        }
    }

    let result = best.unwrap_or(MinCutResult {
        value: 0.0,
        cuts: Vec::new(),
    });
    debug!(value = result.value, cuts = result.cuts.len(), "minimum cut found");
    Ok(result)
}

/// Computes the minimum cut of `solution` restricted to the customers.
///
/// # Errors
/// Returns [`MinCutError::TooFewNodes`] when the solution has fewer than two
/// customers.
pub fn customer_min_cut(solution: &FractionalSolution) -> Result<MinCutResult, MinCutError> {
    let customers: Vec<usize> = (1..solution.node_count()).collect();
    stoer_wagner(solution.rows(), &customers)
}

fn validate(weights: &[Vec<f64>], nodes: &[usize]) -> Result<(), MinCutError> {
    let size = weights.len();
    if let Some((row, entries)) = weights
        .iter()
        .enumerate()
        .find(|(_, entries)| entries.len() != size)
    {
        return Err(MinCutError::NotSquare {
            row,
            expected: size,
            got: entries.len(),
        });
    }
    if nodes.len() < 2 {
        return Err(MinCutError::TooFewNodes { count: nodes.len() });
    }
    let mut seen = vec![false; size];
    for &node in nodes {
        let slot = seen
            .get_mut(node)
            .ok_or(MinCutError::NodeOutOfRange { node, size })?;
        if *slot {
            return Err(MinCutError::DuplicateNode { node });
        }
        *slot = true;
    }
    for (position, &row) in nodes.iter().enumerate() {
        for &column in &nodes[position + 1..] {
            for (from, to) in [(row, column), (column, row)] {
                let weight = weights[from][to];
                if !weight.is_finite() {
                    return Err(MinCutError::NonFinite { row: from, column: to });
                }
                if weight < 0.0 {
                    return Err(MinCutError::NegativeWeight { row: from, column: to });
                }
            }
            if (weights[row][column] - weights[column][row]).abs() > SYMMETRY_TOLERANCE {
                return Err(MinCutError::Asymmetric { row, column });
            }
        }
    }
    Ok(())
}

/// First active node outside the ordering with maximal tightness.
fn most_tightly_connected(active: &[usize], added: &[bool], tightness: &[f64]) -> Option<usize> {
    let mut tight: Option<usize> = None;
    for &candidate in active.iter().filter(|&&candidate| !added[candidate]) {
        if tight.is_none_or(|current| tightness[candidate] > tightness[current]) {
            tight = Some(candidate);
        }
    }
    tight
}

fn merge(graph: &mut [Vec<f64>], into: usize, from: usize) {
    for other in 0..graph.len() {
        let combined = graph[into][other] + graph[from][other];
        graph[into][other] = combined;
        graph[other][into] = combined;
    }
    graph[into][into] = 0.0;
}

fn record(best: &mut Option<MinCutResult>, cut: Cut) {
    match best {
        Some(current) if cut.weight < current.value - TIE_TOLERANCE => {
            current.value = cut.weight;
            current.cuts = vec![cut];
        }
        Some(current) if (cut.weight - current.value).abs() <= TIE_TOLERANCE => {
            current.cuts.push(cut);
        }
        Some(_) => {}
        None => {
            *best = Some(MinCutResult {
                value: cut.weight,
                cuts: vec![cut],
            });
        }
    }
}

#[cfg(test)]
mod tests;
