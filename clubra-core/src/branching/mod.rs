//! Branching-candidate ranking.
//!
//! [`BranchingCandidateRanker`] turns a fractional solution, a cluster
//! partition, optional route clusters and optional cutsets into branching
//! disjunctions. The cluster degree, inter-cluster aggregate, route-cluster
//! degree and cutset strategies keep candidates whose fractional part lies
//! strictly inside `(0.1, 0.9)` and rank them together, most fractional
//! first, ties kept in discovery order. The costly-edge strategy is ranked on
//! its own by descending cost and appended after them.

mod candidate;
mod session;
mod strategy;

use thiserror::Error;
use tracing::{Span, debug, field, instrument};

use crate::{
    error::define_error_codes, oracle::Cutset, partition::ClusterPartition,
    solution::FractionalSolution,
};

pub use self::{
    candidate::{BranchingDisjunction, CandidateKind, LinearExpression, Term},
    session::BranchingSession,
    strategy::{
        BranchingStrategy, EDGE_MAX_VALUE, EDGE_MIN_VALUE, FRACTIONAL_THRESHOLD, admits,
        fractional_part,
    },
};

/// Errors raised when ranking inputs are inconsistent.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RankingError {
    /// The solution and the partition cover different node counts.
    #[error("solution covers {solution_nodes} nodes but the partition covers {partition_nodes}")]
    SizeMismatch {
        /// Nodes in the fractional solution.
        solution_nodes: usize,
        /// Nodes in the cluster partition.
        partition_nodes: usize,
    },
    /// The solution and the route clusters cover different node counts.
    #[error("solution covers {solution_nodes} nodes but the routes cover {route_nodes}")]
    RouteSizeMismatch {
        /// Nodes in the fractional solution.
        solution_nodes: usize,
        /// Nodes covered by the route clusters.
        route_nodes: usize,
    },
    /// Route-cluster branching is enabled but no routes were supplied.
    #[error("route-cluster branching requires route clusters")]
    MissingRoutes,
    /// A cutset lists a node outside the solution.
    #[error("cutset member {node} lies outside a {node_count}-node solution")]
    CutsetOutOfRange {
        /// Offending node.
        node: usize,
        /// Nodes in the fractional solution.
        node_count: usize,
    },
    /// The edge strategy is enabled but no edge cost was supplied.
    #[error("edge branching requires an edge cost function")]
    MissingEdgeCost,
}

define_error_codes! {
    /// Stable codes describing [`RankingError`] variants.
    enum RankingErrorCode for RankingError {
        /// The solution and the partition cover different node counts.
        SizeMismatch => SizeMismatch { .. } => "RANKING_SIZE_MISMATCH",
        /// The solution and the route clusters cover different node counts.
        RouteSizeMismatch => RouteSizeMismatch { .. } => "RANKING_ROUTE_SIZE_MISMATCH",
        /// Route-cluster branching is enabled but no routes were supplied.
        MissingRoutes => MissingRoutes => "RANKING_MISSING_ROUTES",
        /// A cutset lists a node outside the solution.
        CutsetOutOfRange => CutsetOutOfRange { .. } => "RANKING_CUTSET_OUT_OF_RANGE",
        /// The edge strategy is enabled but no edge cost was supplied.
        MissingEdgeCost => MissingEdgeCost => "RANKING_MISSING_EDGE_COST",
    }
}

/// Which strategies run and how they are bounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchingConfig {
    strategies: Vec<BranchingStrategy>,
    max_edge_candidates: usize,
    cutset_deduplication: bool,
}

impl Default for BranchingConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                BranchingStrategy::ClusterDegree,
                BranchingStrategy::InterClusterAggregate,
            ],
            max_edge_candidates: 10,
            cutset_deduplication: true,
        }
    }
}

impl BranchingConfig {
    /// Returns `true` when `strategy` is enabled.
    #[must_use]
    pub fn is_enabled(&self, strategy: BranchingStrategy) -> bool {
        self.strategies.contains(&strategy)
    }

    /// Returns the enabled strategies in emission order.
    #[must_use]
    pub fn strategies(&self) -> &[BranchingStrategy] {
        &self.strategies
    }

    /// Returns the cap `K` on edge candidates.
    #[must_use]
    pub const fn max_edge_candidates(&self) -> usize {
        self.max_edge_candidates
    }

    /// Returns `true` when cutsets equal to a cluster are dropped. This only
    /// applies while cluster-degree branching is enabled.
    #[must_use]
    pub fn deduplicates_cutsets(&self) -> bool {
        self.cutset_deduplication && self.is_enabled(BranchingStrategy::ClusterDegree)
    }
}

/// Configures [`BranchingConfig`].
///
/// # Examples
/// ```
/// use clubra_core::{BranchingConfigBuilder, BranchingStrategy};
///
/// let config = BranchingConfigBuilder::new()
///     .with_strategy(BranchingStrategy::Cutset, true)
///     .with_strategy(BranchingStrategy::InterClusterAggregate, false)
///     .with_max_edge_candidates(4)
///     .build();
/// assert_eq!(
///     config.strategies(),
///     &[BranchingStrategy::ClusterDegree, BranchingStrategy::Cutset]
/// );
/// assert_eq!(config.max_edge_candidates(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BranchingConfigBuilder {
    config: BranchingConfig,
}

impl BranchingConfigBuilder {
    /// Creates a builder with cluster-degree and aggregate branching enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables `strategy`.
    #[must_use]
    pub fn with_strategy(mut self, strategy: BranchingStrategy, enabled: bool) -> Self {
        self.config.strategies.retain(|&existing| existing != strategy);
        if enabled {
            self.config.strategies.push(strategy);
        }
        self
    }

    /// Enables exactly the listed strategies.
    #[must_use]
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = BranchingStrategy>) -> Self {
        self.config.strategies.clear();
        for strategy in strategies {
            self = self.with_strategy(strategy, true);
        }
        self
    }

    /// Caps the number of edge candidates.
    #[must_use]
    pub const fn with_max_edge_candidates(mut self, limit: usize) -> Self {
        self.config.max_edge_candidates = limit;
        self
    }

    /// Drops cutsets whose members equal a cluster when `enabled`.
    #[must_use]
    pub const fn with_cutset_deduplication(mut self, enabled: bool) -> Self {
        self.config.cutset_deduplication = enabled;
        self
    }

    /// Finalises the configuration with strategies in emission order.
    #[must_use]
    pub fn build(mut self) -> BranchingConfig {
        self.config
            .strategies
            .sort_by_key(|strategy| BranchingStrategy::ALL.iter().position(|s| s == strategy));
        self.config
    }
}

/// Borrowed inputs of one ranking call.
#[derive(Clone, Copy)]
pub struct RankingInput<'a> {
    solution: &'a FractionalSolution,
    partition: &'a ClusterPartition,
    routes: Option<&'a ClusterPartition>,
    cutsets: &'a [Cutset],
    edge_cost: Option<&'a dyn Fn(usize, usize) -> f64>,
}

impl<'a> RankingInput<'a> {
    /// Ranks over `solution` with the clusters of `partition`.
    #[must_use]
    pub const fn new(solution: &'a FractionalSolution, partition: &'a ClusterPartition) -> Self {
        Self {
            solution,
            partition,
            routes: None,
            cutsets: &[],
            edge_cost: None,
        }
    }

    /// Supplies the route clusters used by route-cluster degree branching.
    /// Routes list customers only and need not cover the depot.
    #[must_use]
    pub const fn with_routes(mut self, routes: &'a ClusterPartition) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Supplies the cutsets returned by a separation oracle.
    #[must_use]
    pub const fn with_cutsets(mut self, cutsets: &'a [Cutset]) -> Self {
        self.cutsets = cutsets;
        self
    }

    /// Supplies the edge cost used by the costly-edge strategy.
    #[must_use]
    pub const fn with_edge_cost(mut self, cost: &'a dyn Fn(usize, usize) -> f64) -> Self {
        self.edge_cost = Some(cost);
        self
    }

    /// Returns the fractional solution.
    #[must_use]
    pub const fn solution(&self) -> &'a FractionalSolution {
        self.solution
    }

    /// Returns the cluster partition.
    #[must_use]
    pub const fn partition(&self) -> &'a ClusterPartition {
        self.partition
    }

    /// Returns the route clusters, if any.
    #[must_use]
    pub const fn routes(&self) -> Option<&'a ClusterPartition> {
        self.routes
    }

    /// Returns the supplied cutsets.
    #[must_use]
    pub const fn cutsets(&self) -> &'a [Cutset] {
        self.cutsets
    }

    /// Returns the edge cost function, if any.
    #[must_use]
    pub const fn edge_cost(&self) -> Option<&'a dyn Fn(usize, usize) -> f64> {
        self.edge_cost
    }
}

impl std::fmt::Debug for RankingInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingInput")
            .field("nodes", &self.solution.node_count())
            .field("clusters", &self.partition.len())
            .field("routes", &self.routes.map(ClusterPartition::len))
            .field("cutsets", &self.cutsets.len())
            .field("edge_cost", &self.edge_cost.is_some())
            .finish()
    }
}

/// Produces ranked branching disjunctions.
///
/// # Examples
/// ```
/// use clubra_core::{
///     BranchingCandidateRanker, BranchingConfig, BranchingSession, ClusterPartition,
///     FractionalSolution, RankingInput,
/// };
///
/// let partition = ClusterPartition::with_depot(2, vec![vec![1], vec![2]]).expect("valid");
/// let solution = FractionalSolution::from_edges(3, [(0, 1, 1.0), (0, 2, 2.0), (1, 2, 1.0)])
///     .expect("valid edges");
/// let ranked = BranchingCandidateRanker::new(BranchingConfig::default())
///     .rank(&RankingInput::new(&solution, &partition), &mut BranchingSession::new())
///     .expect("consistent inputs");
/// let names: Vec<&str> = ranked.iter().map(|candidate| candidate.name()).collect();
/// assert_eq!(names, ["DegCluster 1", "DegCluster 3"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BranchingCandidateRanker {
    config: BranchingConfig,
}

impl BranchingCandidateRanker {
    /// Creates a ranker with the given configuration.
    #[must_use]
    pub const fn new(config: BranchingConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BranchingConfig {
        &self.config
    }

    /// Ranks the candidates of every enabled strategy.
    ///
    /// Cutset ordinals are assigned in `session` even for cutsets that end
    /// up discarded, so ordinals stay stable across calls.
    ///
    /// # Errors
    /// Returns [`RankingError::SizeMismatch`] when the solution and the
    /// partition disagree on the node count,
    /// [`RankingError::RouteSizeMismatch`] when the routes do,
    /// [`RankingError::CutsetOutOfRange`] for cutset members outside the
    /// solution, [`RankingError::MissingRoutes`] when route-cluster branching
    /// is enabled without routes and [`RankingError::MissingEdgeCost`] when
    /// edge branching is enabled without a cost function.
    #[instrument(
        name = "branching.rank",
        skip(self, input, session),
        fields(
            clusters = input.partition().len(),
            cutsets = input.cutsets().len(),
            candidates = field::Empty,
        ),
        err
    )]
    pub fn rank(
        &self,
        input: &RankingInput<'_>,
        session: &mut BranchingSession,
    ) -> Result<Vec<BranchingDisjunction>, RankingError> {
        let node_count = input.solution().node_count();
        if input.partition().node_count() != node_count {
            return Err(RankingError::SizeMismatch {
                solution_nodes: node_count,
                partition_nodes: input.partition().node_count(),
            });
        }
        if let Some(routes) = input.routes()
            && routes.node_count() != node_count
        {
            return Err(RankingError::RouteSizeMismatch {
                solution_nodes: node_count,
                route_nodes: routes.node_count(),
            });
        }
        if let Some(&node) = input
            .cutsets()
            .iter()
            .flat_map(Cutset::members)
            .find(|&&node| node >= node_count)
        {
            return Err(RankingError::CutsetOutOfRange { node, node_count });
        }

        let mut ranked = Vec::new();
        let mut edges = Vec::new();
        for &strategy in self.config.strategies() {
            let produced = strategy.candidates(input, &self.config, session)?;
            if strategy == BranchingStrategy::Edge {
                edges = produced;
            } else {
                ranked.extend(produced);
            }
        }
        ranked.sort_by(|left, right| {
            distance_from_half(left).total_cmp(&distance_from_half(right))
        });
        ranked.extend(edges);

        #[cfg(feature = "metrics")]
        metrics::counter!("branching_candidates_emitted").increment(ranked.len() as u64);
        Span::current().record("candidates", ranked.len());
        debug!(candidates = ranked.len(), "branching candidates ranked");
        Ok(ranked)
    }
}

fn distance_from_half(candidate: &BranchingDisjunction) -> f64 {
    (0.5 - candidate.fractional_part()).abs()
}
