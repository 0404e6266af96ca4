//! Single-linkage clustering over the minimum spanning tree.
//!
//! The tree is cut at the adaptive cutoff, oversized components are split by
//! dropping their heaviest removable edges, and nodes left isolated are
//! reattached through their cheapest cut edge. Both repairs are optional.

use tracing::{debug, info, instrument};

use crate::{
    graph::{UnionFind, WeightedEdge, WeightedGraph},
    mst::{SpanningTree, kruskal},
};

use super::{
    ClusteringOutcome, ClusteringParams,
    cutoff::{Cutoff, EdgeStatistics, adaptive_cutoff},
};

/// Clusters a [`WeightedGraph`] by cutting its minimum spanning tree.
///
/// # Examples
/// ```
/// use clubra_core::{ClusteringParams, SingleLinkageClusterer, WeightedGraph};
///
/// let positions: [f64; 5] = [0.0, 0.0, 1.0, 50.0, 51.0];
/// let graph = WeightedGraph::customers(4, |i, j| (positions[i] - positions[j]).abs())
///     .expect("valid graph");
/// let outcome = SingleLinkageClusterer::new(ClusteringParams::default()).cluster(&graph);
/// assert_eq!(outcome.clusters(), &[vec![1, 2], vec![3, 4]]);
/// ```
#[derive(Clone, Debug)]
pub struct SingleLinkageClusterer {
    params: ClusteringParams,
}

impl SingleLinkageClusterer {
    /// Creates a clusterer with the given parameters.
    #[must_use]
    pub const fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    /// Returns the configured parameters.
    #[must_use]
    pub const fn params(&self) -> &ClusteringParams {
        &self.params
    }

    /// Partitions the nodes of `graph` into clusters.
    ///
    /// Clusters are ordered by smallest member and list members in ascending
    /// order. A single-node graph yields one singleton cluster.
    #[must_use]
    #[instrument(
        name = "clustering.single_linkage",
        skip(self, graph),
        fields(nodes = graph.nodes().len())
    )]
    pub fn cluster(&self, graph: &WeightedGraph) -> ClusteringOutcome {
        let tree = kruskal(graph);
        let weights: Vec<f64> = tree.edges().iter().map(WeightedEdge::weight).collect();
        let Some(stats) = EdgeStatistics::from_weights(&weights) else {
            return ClusteringOutcome::new(graph.nodes().iter().map(|&node| vec![node]).collect(), None);
        };
        debug!(
            tree_weight = tree.total_weight(),
            mean = stats.mean(),
            std_dev = stats.std_dev(),
            max = stats.max(),
            "spanning tree built"
        );

        let cutoff = adaptive_cutoff(
            &stats,
            self.params.std_dev_multiplier(),
            self.params.decreasing_step(),
        );
        let max_cluster_size = max_cluster_size(self.params.big_cluster_size_threshold(), graph);
        info!(
            cutoff = cutoff.value(),
            applied_multiplier = cutoff.applied_multiplier(),
            max_cluster_size,
            "tree cutoff selected"
        );

        let mut cut = TreeCut::new(graph, &tree, &cutoff);
        if !self.params.enable_big_clusters() {
            cut.split_oversized(max_cluster_size);
        }
        if !self.params.enable_singletons() {
            cut.reattach_isolated();
        }

        let clusters = cut.components(graph);
        debug!(clusters = clusters.len(), "single-linkage clusters extracted");
        ClusteringOutcome::new(clusters, Some(cutoff))
    }
}

fn max_cluster_size(threshold: f64, graph: &WeightedGraph) -> usize {
    let size = (threshold * graph.nodes().len() as f64).floor();
    if size >= 1.0 { size as usize } else { 1 }
}

/// Working state while the tree is being cut and repaired.
struct TreeCut<'a> {
    edges: &'a [WeightedEdge],
    kept: Vec<bool>,
    degrees: Vec<usize>,
    cutoff: f64,
    id_bound: usize,
}

impl<'a> TreeCut<'a> {
    fn new(graph: &WeightedGraph, tree: &'a SpanningTree, cutoff: &Cutoff) -> Self {
        let mut degrees = tree.degrees().to_vec();
        let kept = tree
            .edges()
            .iter()
            .map(|edge| {
                let keep = edge.weight() < cutoff.value();
                if !keep {
                    degrees[edge.source()] -= 1;
                    degrees[edge.target()] -= 1;
                }
                keep
            })
            .collect();
        Self {
            edges: tree.edges(),
            kept,
            degrees,
            cutoff: cutoff.value(),
            id_bound: graph.id_bound(),
        }
    }

    fn drop_edge(&mut self, index: usize) {
        let edge = self.edges[index];
        self.kept[index] = false;
        self.degrees[edge.source()] -= 1;
        self.degrees[edge.target()] -= 1;
    }

    fn keep_edge(&mut self, index: usize) {
        let edge = self.edges[index];
        self.kept[index] = true;
        self.degrees[edge.source()] += 1;
        self.degrees[edge.target()] += 1;
    }

    /// Kept edge indices grouped by component root, roots ascending.
    fn kept_groups(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::new(self.id_bound);
        for (edge, _) in self.edges.iter().zip(&self.kept).filter(|(_, kept)| **kept) {
            sets.union(edge.source(), edge.target());
        }
        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); self.id_bound];
        for (index, edge) in self.edges.iter().enumerate() {
            if self.kept[index] {
                by_root[sets.find(edge.source())].push(index);
            }
        }
        by_root.retain(|group| !group.is_empty());
        by_root
    }

    fn split_oversized(&mut self, max_cluster_size: usize) {
        for group in self.kept_groups() {
            let size = group.len() + 1;
            if size <= max_cluster_size {
                continue;
            }
            let mut remaining = size.div_ceil(max_cluster_size);
            debug!(size, splits = remaining, "splitting oversized cluster");
            for &index in group.iter().rev() {
                if remaining == 0 {
                    break;
                }
                let edge = self.edges[index];
                if self.degrees[edge.source()] > 1 && self.degrees[edge.target()] > 1 {
                    self.drop_edge(index);
                    remaining -= 1;
                }
            }
        }
    }

    fn reattach_isolated(&mut self) {
        for index in 0..self.edges.len() {
            let edge = self.edges[index];
            if self.kept[index] || edge.weight() < self.cutoff {
                continue;
            }
            if self.degrees[edge.source()] == 0 || self.degrees[edge.target()] == 0 {
                self.keep_edge(index);
            }
        }
    }

    fn components(&self, graph: &WeightedGraph) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::new(self.id_bound);
        for (edge, _) in self.edges.iter().zip(&self.kept).filter(|(_, kept)| **kept) {
            sets.union(edge.source(), edge.target());
        }
        sets.components(graph.nodes().iter().copied())
    }
}
