//! Complete weighted graphs over routing nodes.
//!
//! [`WeightedGraph::complete`] evaluates a caller-supplied distance for every
//! unordered node pair and stores the result as canonical edges
//! (`source < target`). The graph is immutable once built; clustering sorts a
//! copy of its edges.

mod union_find;

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub use self::union_find::UnionFind;

/// Errors returned while building a [`WeightedGraph`].
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// The caller supplied no nodes.
    #[error("cannot build a graph without nodes")]
    EmptyGraph,
    /// The same node id was listed twice.
    #[error("node {node} is listed more than once")]
    DuplicateNode {
        /// Repeated node id.
        node: usize,
    },
    /// The distance function returned a non-finite weight.
    #[error("edge ({left}, {right}) has non-finite weight")]
    NonFiniteWeight {
        /// Smaller endpoint id.
        left: usize,
        /// Larger endpoint id.
        right: usize,
    },
    /// The distance function returned a negative weight.
    #[error("edge ({left}, {right}) has negative weight {weight}")]
    NegativeWeight {
        /// Smaller endpoint id.
        left: usize,
        /// Larger endpoint id.
        right: usize,
        /// Offending weight.
        weight: f64,
    },
}

impl GraphError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> GraphErrorCode {
        match self {
            Self::EmptyGraph => GraphErrorCode::EmptyGraph,
            Self::DuplicateNode { .. } => GraphErrorCode::DuplicateNode,
            Self::NonFiniteWeight { .. } => GraphErrorCode::NonFiniteWeight,
            Self::NegativeWeight { .. } => GraphErrorCode::NegativeWeight,
        }
    }
}

/// Machine-readable error codes for [`GraphError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GraphErrorCode {
    /// The caller supplied no nodes.
    EmptyGraph,
    /// The same node id was listed twice.
    DuplicateNode,
    /// The distance function returned a non-finite weight.
    NonFiniteWeight,
    /// The distance function returned a negative weight.
    NegativeWeight,
}

impl GraphErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyGraph => "GRAPH_EMPTY",
            Self::DuplicateNode => "GRAPH_DUPLICATE_NODE",
            Self::NonFiniteWeight => "GRAPH_NON_FINITE_WEIGHT",
            Self::NegativeWeight => "GRAPH_NEGATIVE_WEIGHT",
        }
    }
}

/// An undirected edge in canonical form (`source < target`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEdge {
    source: usize,
    target: usize,
    weight: f64,
}

impl WeightedEdge {
    /// Creates an edge, swapping the endpoints into canonical order.
    #[must_use]
    pub fn new(left: usize, right: usize, weight: f64) -> Self {
        let (source, target) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }
}

impl Eq for WeightedEdge {}

impl Ord for WeightedEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for WeightedEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A complete graph over a set of node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedGraph {
    nodes: Vec<usize>,
    edges: Vec<WeightedEdge>,
}

impl WeightedGraph {
    /// Builds the complete graph over `nodes` weighted by `distance`.
    ///
    /// Nodes are stored in ascending order; every unordered pair yields one
    /// edge.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyGraph`] when `nodes` is empty,
    /// [`GraphError::DuplicateNode`] when an id repeats, and a weight error
    /// when `distance` returns a negative or non-finite value.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::WeightedGraph;
    ///
    /// let graph = WeightedGraph::complete([3, 1, 2], |i, j| i.abs_diff(j) as f64)
    ///     .expect("distances are valid");
    /// assert_eq!(graph.nodes(), &[1, 2, 3]);
    /// assert_eq!(graph.edges().len(), 3);
    /// ```
    pub fn complete<D>(nodes: impl IntoIterator<Item = usize>, distance: D) -> Result<Self, GraphError>
    where
        D: Fn(usize, usize) -> f64,
    {
        let mut nodes: Vec<usize> = nodes.into_iter().collect();
        if nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        nodes.sort_unstable();
        if let Some(pair) = nodes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GraphError::DuplicateNode { node: pair[0] });
        }

        let mut edges = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
        for (position, &left) in nodes.iter().enumerate() {
            for &right in &nodes[position + 1..] {
                let weight = distance(left, right);
                if !weight.is_finite() {
                    return Err(GraphError::NonFiniteWeight { left, right });
                }
                if weight < 0.0 {
                    return Err(GraphError::NegativeWeight {
                        left,
                        right,
                        weight,
                    });
                }
                edges.push(WeightedEdge::new(left, right, weight));
            }
        }

        Ok(Self { nodes, edges })
    }

    /// Builds the complete graph over customers `1..=customer_count`,
    /// leaving the depot out.
    ///
    /// # Errors
    /// Same conditions as [`Self::complete`].
    pub fn customers<D>(customer_count: usize, distance: D) -> Result<Self, GraphError>
    where
        D: Fn(usize, usize) -> f64,
    {
        Self::complete(1..=customer_count, distance)
    }

    /// Returns the node ids in ascending order.
    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the edges in construction order.
    #[must_use]
    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Returns one past the largest node id, the size an id-indexed table
    /// needs.
    #[must_use]
    pub fn id_bound(&self) -> usize {
        self.nodes.last().map_or(0, |last| last + 1)
    }

    /// Returns the edges sorted by ascending weight, ties broken by endpoints.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<WeightedEdge> {
        let mut edges = self.edges.clone();
        #[cfg(feature = "parallel")]
        edges.par_sort_unstable();
        #[cfg(not(feature = "parallel"))]
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests;
