//! Capacity cutsets and the separation oracle interface.

use tracing::{debug, instrument};

use crate::{error::ConfigError, graph::UnionFind, solution::FractionalSolution};

/// A customer subset together with the flow crossing its boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Cutset {
    members: Vec<usize>,
    boundary: f64,
}

impl Cutset {
    /// Creates a cutset; members are sorted and deduplicated.
    #[must_use]
    pub fn new(mut members: Vec<usize>, boundary: f64) -> Self {
        members.sort_unstable();
        members.dedup();
        Self { members, boundary }
    }

    /// Returns the members in ascending order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the boundary right-hand side reported by the oracle.
    #[must_use]
    pub const fn boundary(&self) -> f64 {
        self.boundary
    }

    /// Returns a name identifying the member set regardless of the order the
    /// oracle listed it in.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::oracle::Cutset;
    ///
    /// assert_eq!(Cutset::new(vec![4, 2, 9], 3.0).canonical_name(), "cutset_2-4-9");
    /// ```
    #[must_use]
    pub fn canonical_name(&self) -> String {
        let members: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        format!("cutset_{}", members.join("-"))
    }
}

/// Inputs handed to a [`CutsetOracle`].
#[derive(Clone, Debug, PartialEq)]
pub struct CutsetRequest {
    demands: Vec<f64>,
    capacity: f64,
    edges: Vec<(usize, usize, f64)>,
}

impl CutsetRequest {
    /// Builds a request from node demands (index `0` is the depot), the
    /// vehicle capacity and the positive edges of `solution`.
    #[must_use]
    pub fn new(demands: Vec<f64>, capacity: f64, solution: &FractionalSolution) -> Self {
        Self {
            demands,
            capacity,
            edges: solution.positive_edges(),
        }
    }

    /// Returns the demand of every node, depot first.
    #[must_use]
    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    /// Returns the vehicle capacity.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the positive edges `(i, j, x)` with `i < j`.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    /// Returns the number of customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.demands.len().saturating_sub(1)
    }
}

/// Finds customer subsets whose boundary flow is worth branching on.
pub trait CutsetOracle {
    /// Returns the separated cutsets in the oracle's preferred order.
    fn separate(&self, request: &CutsetRequest) -> Vec<Cutset>;
}

impl<F> CutsetOracle for F
where
    F: Fn(&CutsetRequest) -> Vec<Cutset>,
{
    fn separate(&self, request: &CutsetRequest) -> Vec<Cutset> {
        self(request)
    }
}

/// Cutsets from the connected components of the customer support graph.
///
/// A component `S` is reported when its boundary flow lies strictly between
/// `2⌈d(S)/Q⌉` and `2⌈d(S)/Q⌉ + 2`. Results are ordered by distance to the
/// boundary target and capped at `max_sets` (default: the customer count).
///
/// # Examples
/// ```
/// use clubra_core::{FractionalSolution, oracle::{CutsetOracle, CutsetRequest, SupportComponentCutsets}};
///
/// let solution = FractionalSolution::from_edges(
///     4,
///     [(0, 1, 1.5), (1, 2, 1.0), (0, 2, 1.5), (0, 3, 2.0)],
/// )
/// .expect("valid edges");
/// let request = CutsetRequest::new(vec![0.0, 3.0, 3.0, 5.0], 10.0, &solution);
/// let cutsets = SupportComponentCutsets::default().separate(&request);
/// assert_eq!(cutsets.len(), 1);
/// assert_eq!(cutsets[0].members(), &[1, 2]);
/// assert_eq!(cutsets[0].boundary(), 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SupportComponentCutsets {
    boundary_target: f64,
    max_sets: Option<usize>,
}

impl Default for SupportComponentCutsets {
    fn default() -> Self {
        Self {
            boundary_target: 3.0,
            max_sets: None,
        }
    }
}

impl SupportComponentCutsets {
    /// Overrides the boundary flow the ordering prefers.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBoundaryTarget`] unless `target` lies in
    /// `(2, 4)`.
    pub fn with_boundary_target(mut self, target: f64) -> Result<Self, ConfigError> {
        if target > 2.0 && target < 4.0 {
            self.boundary_target = target;
            Ok(self)
        } else {
            Err(ConfigError::InvalidBoundaryTarget { got: target })
        }
    }

    /// Caps the number of cutsets returned.
    #[must_use]
    pub const fn with_max_sets(mut self, max_sets: usize) -> Self {
        self.max_sets = Some(max_sets);
        self
    }

    /// Returns the preferred boundary flow.
    #[must_use]
    pub const fn boundary_target(&self) -> f64 {
        self.boundary_target
    }
}

impl CutsetOracle for SupportComponentCutsets {
    #[instrument(
        name = "oracle.support_cutsets",
        skip(self, request),
        fields(customers = request.customer_count(), edges = request.edges().len())
    )]
    fn separate(&self, request: &CutsetRequest) -> Vec<Cutset> {
        let customer_count = request.customer_count();
        if customer_count == 0 || request.capacity() <= 0.0 {
            return Vec::new();
        }
        let node_count = customer_count + 1;
        let in_range = |&&(i, j, _): &&(usize, usize, f64)| i < node_count && j < node_count;

        let mut sets = UnionFind::new(node_count);
        for &(i, j, _) in request.edges().iter().filter(in_range) {
            if i > 0 && j > 0 {
                sets.union(i, j);
            }
        }

        let mut cutsets = Vec::new();
        for component in sets.components(1..=customer_count) {
            let mut inside = vec![false; node_count];
            for &node in &component {
                inside[node] = true;
            }
            let boundary: f64 = request
                .edges()
                .iter()
                .filter(in_range)
                .filter(|&&(i, j, _)| inside[i] != inside[j])
                .map(|&(_, _, value)| value)
                .sum();
            let demand: f64 = component
                .iter()
                .map(|&node| request.demands()[node])
                .sum();
            let required = 2.0 * (demand / request.capacity()).ceil();
            if boundary > required && boundary < required + 2.0 {
                cutsets.push(Cutset::new(component, boundary));
            }
        }

        cutsets.sort_by(|left, right| {
            (left.boundary - self.boundary_target)
                .abs()
                .total_cmp(&(right.boundary - self.boundary_target).abs())
        });
        cutsets.truncate(self.max_sets.unwrap_or(customer_count));
        debug!(cutsets = cutsets.len(), "support cutsets separated");
        cutsets
    }
}
