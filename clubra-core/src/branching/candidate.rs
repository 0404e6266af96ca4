//! Branching disjunctions and the linear expressions they constrain.

use std::fmt;

use crate::{partition::ClusterId, solution::FractionalSolution};

/// What a disjunction branches on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CandidateKind {
    /// Half the flow crossing the boundary of a cluster.
    ClusterDegree {
        /// Cluster whose boundary is measured.
        cluster: ClusterId,
    },
    /// Total flow between two disjoint clusters.
    InterClusterAggregate {
        /// Cluster with the smaller position.
        first: ClusterId,
        /// Cluster with the larger position.
        second: ClusterId,
    },
    /// Half the flow between one route and the members of the other
    /// routes.
    RouteClusterDegree {
        /// Route whose outgoing flow is measured.
        route: ClusterId,
    },
    /// Half the boundary flow of an oracle-supplied cutset.
    Cutset {
        /// Session-stable ordinal of the cutset.
        ordinal: usize,
    },
    /// A single costly fractional edge.
    Edge {
        /// Smaller endpoint.
        left: usize,
        /// Larger endpoint.
        right: usize,
        /// Edge cost used for ranking.
        cost: f64,
    },
}

impl CandidateKind {
    /// Returns the coefficient applied to every edge variable.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::ClusterDegree { .. }
            | Self::RouteClusterDegree { .. }
            | Self::Cutset { .. } => 0.5,
            Self::InterClusterAggregate { .. } | Self::Edge { .. } => 1.0,
        }
    }

    /// Returns the name used to recognise repeated branching on the same
    /// condition.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::{CandidateKind, ClusterId};
    ///
    /// let kind = CandidateKind::InterClusterAggregate {
    ///     first: ClusterId::new(2),
    ///     second: ClusterId::new(5),
    /// };
    /// assert_eq!(kind.canonical_name(), "AggClusters[2,5]");
    /// ```
    #[must_use]
    pub fn canonical_name(&self) -> String {
        match self {
            Self::ClusterDegree { cluster } => format!("DegCluster {cluster}"),
            Self::InterClusterAggregate { first, second } => format!("AggClusters[{first},{second}]"),
            Self::RouteClusterDegree { route } => format!("DegRouteCluster {route}"),
            Self::Cutset { ordinal } => format!("Cutset[{ordinal}]"),
            Self::Edge { left, right, .. } => format!("EDGE[{left},{right}]"),
        }
    }
}

/// One weighted edge variable `coefficient · x[left][right]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    /// Smaller endpoint.
    pub left: usize,
    /// Larger endpoint.
    pub right: usize,
    /// Coefficient applied to the edge variable.
    pub coefficient: f64,
}

/// Sum of weighted edge variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpression {
    terms: Vec<Term>,
}

impl LinearExpression {
    /// Creates an empty expression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `coefficient · x[i][j]`, storing the endpoints in ascending
    /// order.
    pub fn push(&mut self, i: usize, j: usize, coefficient: f64) {
        self.terms.push(Term {
            left: i.min(j),
            right: i.max(j),
            coefficient,
        });
    }

    /// Returns the terms in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` when the expression has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression at `solution`.
    #[must_use]
    pub fn evaluate(&self, solution: &FractionalSolution) -> f64 {
        self.terms
            .iter()
            .map(|term| term.coefficient * solution.get(term.left, term.right))
            .sum()
    }
}

impl fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, term) in self.terms.iter().enumerate() {
            if index > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{}*x[{},{}]", term.coefficient, term.left, term.right)?;
        }
        Ok(())
    }
}

/// A ranked branching candidate: the expression the two children bound and
/// its current value.
///
/// The caller turns it into the children `expression <= down_bound()` and
/// `expression >= up_bound()`.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchingDisjunction {
    kind: CandidateKind,
    name: String,
    expression: LinearExpression,
    value: f64,
}

impl BranchingDisjunction {
    pub(crate) fn new(kind: CandidateKind, expression: LinearExpression, value: f64) -> Self {
        Self {
            name: kind.canonical_name(),
            kind,
            expression,
            value,
        }
    }

    /// Returns what the disjunction branches on.
    #[must_use]
    pub const fn kind(&self) -> &CandidateKind {
        &self.kind
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the branched expression.
    #[must_use]
    pub const fn expression(&self) -> &LinearExpression {
        &self.expression
    }

    /// Returns the value of the expression at ranking time.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns `value - trunc(value)`.
    #[must_use]
    pub fn fractional_part(&self) -> f64 {
        super::strategy::fractional_part(self.value)
    }

    /// Returns `⌊value⌋`, the bound of the down child.
    #[must_use]
    pub fn down_bound(&self) -> f64 {
        self.value.floor()
    }

    /// Returns `⌈value⌉`, the bound of the up child.
    #[must_use]
    pub fn up_bound(&self) -> f64 {
        self.value.ceil()
    }

    /// Evaluates the expression at another solution.
    #[must_use]
    pub fn evaluate(&self, solution: &FractionalSolution) -> f64 {
        self.expression.evaluate(solution)
    }
}
