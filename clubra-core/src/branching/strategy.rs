//! Candidate generation for each branching strategy.

use std::{cmp::Ordering, fmt, str::FromStr};

use tracing::debug;

use super::{
    BranchingConfig, RankingError, RankingInput,
    candidate::{BranchingDisjunction, CandidateKind, LinearExpression},
    session::BranchingSession,
};

/// Candidates whose fractional part is within this distance of an integer
/// are rejected.
pub const FRACTIONAL_THRESHOLD: f64 = 0.1;

/// Smallest edge value eligible for costly-edge branching.
pub const EDGE_MIN_VALUE: f64 = 0.2;

/// Largest edge value eligible for costly-edge branching.
pub const EDGE_MAX_VALUE: f64 = 0.8;

/// Returns `value - trunc(value)`.
#[must_use]
pub fn fractional_part(value: f64) -> f64 {
    value - value.trunc()
}

/// Returns `true` when `fraction` lies strictly inside
/// `(FRACTIONAL_THRESHOLD, 1 - FRACTIONAL_THRESHOLD)`.
///
/// # Examples
/// ```
/// use clubra_core::branching::admits;
///
/// assert!(admits(0.5));
/// assert!(!admits(0.1));
/// assert!(!admits(0.9));
/// ```
#[must_use]
pub fn admits(fraction: f64) -> bool {
    fraction > FRACTIONAL_THRESHOLD && fraction < 1.0 - FRACTIONAL_THRESHOLD
}

/// The closed set of branching strategies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BranchingStrategy {
    /// Half the boundary flow of every cluster.
    ClusterDegree,
    /// Flow between every pair of disjoint clusters.
    InterClusterAggregate,
    /// Half the flow between each route and the other routes.
    RouteClusterDegree,
    /// Half the boundary flow of oracle-supplied cutsets.
    Cutset,
    /// The costliest edges with mid-range values.
    Edge,
}

impl BranchingStrategy {
    /// Every strategy in emission order.
    pub const ALL: [Self; 5] = [
        Self::ClusterDegree,
        Self::InterClusterAggregate,
        Self::RouteClusterDegree,
        Self::Cutset,
        Self::Edge,
    ];

    /// Returns the command-line spelling of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClusterDegree => "cluster-degree",
            Self::InterClusterAggregate => "aggregate",
            Self::RouteClusterDegree => "route-degree",
            Self::Cutset => "cutset",
            Self::Edge => "edge",
        }
    }

    /// Produces the candidates of this strategy, unsorted.
    ///
    /// Fractional strategies return only admitted candidates in discovery
    /// order. The edge strategy returns its top candidates by cost.
    pub(crate) fn candidates(
        self,
        input: &RankingInput<'_>,
        config: &BranchingConfig,
        session: &mut BranchingSession,
    ) -> Result<Vec<BranchingDisjunction>, RankingError> {
        let candidates = match self {
            Self::ClusterDegree => cluster_degree(input),
            Self::InterClusterAggregate => inter_cluster_aggregate(input),
            Self::RouteClusterDegree => route_cluster_degree(input)?,
            Self::Cutset => cutsets(input, config, session),
            Self::Edge => costly_edges(input, config.max_edge_candidates())?,
        };
        debug!(strategy = self.as_str(), candidates = candidates.len(), "strategy evaluated");
        Ok(candidates)
    }
}

impl fmt::Display for BranchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchingStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == value)
            .ok_or_else(|| format!("unknown branching strategy `{value}`"))
    }
}

fn admitted(kind: CandidateKind, expression: LinearExpression, value: f64) -> Option<BranchingDisjunction> {
    admits(fractional_part(value)).then(|| BranchingDisjunction::new(kind, expression, value))
}

fn cluster_degree(input: &RankingInput<'_>) -> Vec<BranchingDisjunction> {
    let partition = input.partition();
    let node_count = input.solution().node_count();
    let mut candidates = Vec::new();
    for cluster in partition.clusters() {
        let mut expression = LinearExpression::new();
        let mut total = 0.0;
        for outside in (0..node_count).filter(|&node| !partition.contains(cluster.id(), node)) {
            for &inside in cluster.members() {
                total += input.solution().get(outside, inside);
                expression.push(outside, inside, 0.5);
            }
        }
        candidates.extend(admitted(
            CandidateKind::ClusterDegree { cluster: cluster.id() },
            expression,
            total / 2.0,
        ));
    }
    candidates
}

fn inter_cluster_aggregate(input: &RankingInput<'_>) -> Vec<BranchingDisjunction> {
    let partition = input.partition();
    let clusters = partition.clusters();
    let mut candidates = Vec::new();
    for (position, first) in clusters.iter().enumerate() {
        for second in &clusters[position + 1..] {
            if !partition.is_disjoint(first.id(), second.id()) {
                continue;
            }
            let mut expression = LinearExpression::new();
            let mut total = 0.0;
            for &left in first.members() {
                for &right in second.members() {
                    total += input.solution().get(left, right);
                    expression.push(left, right, 1.0);
                }
            }
            candidates.extend(admitted(
                CandidateKind::InterClusterAggregate {
                    first: first.id(),
                    second: second.id(),
                },
                expression,
                total,
            ));
        }
    }
    candidates
}

/// Depot edges are not counted; only flow from a route to members of the
/// other routes contributes.
fn route_cluster_degree(
    input: &RankingInput<'_>,
) -> Result<Vec<BranchingDisjunction>, RankingError> {
    let routes = input.routes().ok_or(RankingError::MissingRoutes)?;
    let mut candidates = Vec::new();
    for route in routes.clusters() {
        let mut expression = LinearExpression::new();
        let mut total = 0.0;
        for other in routes.clusters().iter().filter(|other| other.id() != route.id()) {
            for &inside in route.members() {
                for &outside in other.members() {
                    total += input.solution().get(inside, outside);
                    expression.push(inside, outside, 0.5);
                }
            }
        }
        candidates.extend(admitted(
            CandidateKind::RouteClusterDegree { route: route.id() },
            expression,
            total / 2.0,
        ));
    }
    Ok(candidates)
}

fn cutsets(
    input: &RankingInput<'_>,
    config: &BranchingConfig,
    session: &mut BranchingSession,
) -> Vec<BranchingDisjunction> {
    let node_count = input.solution().node_count();
    let deduplicate = config.deduplicates_cutsets();
    let mut candidates = Vec::new();
    let mut discarded = 0_u64;
    for cutset in input.cutsets() {
        let ordinal = session.cutset_ordinal(&cutset.canonical_name());
        if deduplicate && input.partition().contains_members(cutset.members()) {
            discarded += 1;
            continue;
        }
        let mut inside = vec![false; node_count];
        for &member in cutset.members() {
            inside[member] = true;
        }
        let mut expression = LinearExpression::new();
        for &member in cutset.members() {
            for outside in (0..node_count).filter(|&node| !inside[node]) {
                expression.push(member, outside, 0.5);
            }
        }
        candidates.extend(admitted(
            CandidateKind::Cutset { ordinal },
            expression,
            cutset.boundary() / 2.0,
        ));
    }

    #[cfg(feature = "metrics")]
    metrics::counter!("cutsets_discarded_duplicate").increment(discarded);
    debug!(discarded, "cutsets matching clusters discarded");
    candidates
}

fn costly_edges(
    input: &RankingInput<'_>,
    limit: usize,
) -> Result<Vec<BranchingDisjunction>, RankingError> {
    let cost_of = input.edge_cost().ok_or(RankingError::MissingEdgeCost)?;
    let solution = input.solution();
    let mut eligible: Vec<(usize, usize, f64, f64)> = Vec::new();
    for left in 0..solution.node_count() {
        for right in left + 1..solution.node_count() {
            let value = solution.get(left, right);
            if (EDGE_MIN_VALUE..=EDGE_MAX_VALUE).contains(&value) {
                eligible.push((left, right, value, cost_of(left, right)));
            }
        }
    }

    let by_cost = |a: &(usize, usize, f64, f64), b: &(usize, usize, f64, f64)| -> Ordering {
        b.3.total_cmp(&a.3)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
    };
    if limit < eligible.len() {
        if limit > 0 {
            eligible.select_nth_unstable_by(limit - 1, by_cost);
        }
        eligible.truncate(limit);
    }
    eligible.sort_by(by_cost);

    Ok(eligible
        .into_iter()
        .map(|(left, right, value, cost)| {
            let mut expression = LinearExpression::new();
            expression.push(left, right, 1.0);
            BranchingDisjunction::new(CandidateKind::Edge { left, right, cost }, expression, value)
        })
        .collect())
}
