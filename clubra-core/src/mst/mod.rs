//! Kruskal minimum spanning tree construction.
//!
//! Edges are visited in ascending weight order (ties broken by endpoints) and
//! accepted whenever they join two components. The tree keeps a per-node
//! degree table because the single-linkage clusterer edits degrees while it
//! cuts and repairs the tree.

use crate::graph::{UnionFind, WeightedEdge, WeightedGraph};

/// Minimum spanning tree of a [`WeightedGraph`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTree {
    edges: Vec<WeightedEdge>,
    degrees: Vec<usize>,
    node_count: usize,
}

impl SpanningTree {
    /// Returns the accepted edges in ascending weight order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[WeightedEdge] { &self.edges }

    /// Returns the tree degree of every node id below the graph's id bound.
    #[must_use]
    #[rustfmt::skip]
    pub fn degrees(&self) -> &[usize] { &self.degrees }

    /// Returns the sum of edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(WeightedEdge::weight).sum()
    }

    /// Returns the heaviest edge weight, or `None` for an edgeless tree.
    #[must_use]
    pub fn max_weight(&self) -> Option<f64> {
        self.edges.last().map(WeightedEdge::weight)
    }

    /// Returns `true` when the tree spans every node of its graph.
    #[must_use]
    pub fn is_spanning(&self) -> bool {
        self.edges.len() + 1 == self.node_count
    }
}

/// Computes the minimum spanning tree of `graph` with Kruskal's algorithm.
///
/// # Examples
/// ```
/// use clubra_core::{WeightedGraph, kruskal};
///
/// let graph = WeightedGraph::complete([1, 2, 3], |i, j| (i * j) as f64)
///     .expect("valid graph");
/// let tree = kruskal(&graph);
/// assert!(tree.is_spanning());
/// assert_eq!(tree.total_weight(), 5.0);
/// ```
#[must_use]
pub fn kruskal(graph: &WeightedGraph) -> SpanningTree {
    let node_count = graph.nodes().len();
    let mut sets = UnionFind::new(graph.id_bound());
    let mut degrees = vec![0; graph.id_bound()];
    let mut edges = Vec::with_capacity(node_count.saturating_sub(1));

    for edge in graph.sorted_edges() {
        if edges.len() + 1 >= node_count {
            break;
        }
        if sets.union(edge.source(), edge.target()) {
            degrees[edge.source()] += 1;
            degrees[edge.target()] += 1;
            edges.push(edge);
        }
    }

    SpanningTree {
        edges,
        degrees,
        node_count,
    }
}
