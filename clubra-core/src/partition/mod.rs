//! Cluster partitions and their disjointness and membership relations.
//!
//! A [`ClusterPartition`] is an append-only list of clusters numbered from
//! `1`. Alongside the clusters it maintains two id-indexed tables:
//! `disjoint[a][b]` (no shared member) and `membership[id][node]`. Clusters
//! are not required to be pairwise disjoint; fractional clustering appends
//! overlapping clusters over time.

use std::fmt;

use thiserror::Error;

use crate::error::define_error_codes;

/// Identifier of a cluster inside a [`ClusterPartition`], starting at `1`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cluster: its identifier and its members in ascending order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cluster {
    id: ClusterId,
    members: Vec<usize>,
}

impl Cluster {
    /// Returns the cluster identifier.
    #[must_use]
    pub const fn id(&self) -> ClusterId {
        self.id
    }

    /// Returns the members in ascending order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Errors raised by [`ClusterPartition`] construction and queries.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PartitionError {
    /// A node lookup was requested before any cluster exists.
    #[error("no clusters are defined")]
    NoClusters,
    /// A node id is outside `0..node_count`.
    #[error("node {node} is outside the partition (node_count {node_count})")]
    NodeOutOfRange {
        /// Offending node id.
        node: usize,
        /// Number of nodes covered by the partition.
        node_count: usize,
    },
    /// The node belongs to no cluster.
    #[error("node {node} belongs to no cluster")]
    NodeUnassigned {
        /// Node that was looked up.
        node: usize,
    },
    /// A cluster without members was supplied.
    #[error("cluster at position {position} has no members")]
    EmptyCluster {
        /// Zero-based position of the cluster in the supplied list.
        position: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`PartitionError`] variants.
    enum PartitionErrorCode for PartitionError {
        /// A node lookup was requested before any cluster exists.
        NoClusters => NoClusters => "PARTITION_NO_CLUSTERS",
        /// A node id is outside the partition.
        NodeOutOfRange => NodeOutOfRange { .. } => "PARTITION_NODE_OUT_OF_RANGE",
        /// The node belongs to no cluster.
        NodeUnassigned => NodeUnassigned { .. } => "PARTITION_NODE_UNASSIGNED",
        /// A cluster without members was supplied.
        EmptyCluster => EmptyCluster { .. } => "PARTITION_EMPTY_CLUSTER",
    }
}

/// Clusters over nodes `0..node_count` with disjointness and membership
/// tables.
///
/// # Examples
/// ```
/// use clubra_core::{ClusterId, ClusterPartition};
///
/// let partition = ClusterPartition::with_depot(4, vec![vec![2, 1], vec![3, 4]])
///     .expect("clusters are valid");
/// assert_eq!(partition.len(), 3);
/// assert_eq!(partition.to_string(), "C1 0\nC2 1 2\nC3 3 4\n");
/// assert!(partition.is_disjoint(ClusterId::new(2), ClusterId::new(3)));
/// assert_eq!(partition.cluster_of(4), Ok(ClusterId::new(3)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterPartition {
    node_count: usize,
    clusters: Vec<Cluster>,
    disjoint: Vec<Vec<bool>>,
    membership: Vec<Vec<bool>>,
}

impl ClusterPartition {
    /// Creates an empty partition over nodes `0..node_count`.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            clusters: Vec::new(),
            disjoint: vec![Vec::new()],
            membership: vec![vec![false; node_count]],
        }
    }

    /// Creates a partition over the depot and `customer_count` customers
    /// holding only the depot cluster.
    #[must_use]
    pub fn depot_only(customer_count: usize) -> Self {
        let node_count = customer_count + 1;
        let mut depot_row = vec![false; node_count];
        depot_row[0] = true;
        Self {
            node_count,
            clusters: vec![Cluster {
                id: ClusterId::new(1),
                members: vec![0],
            }],
            disjoint: vec![Vec::new(), vec![false, false]],
            membership: vec![vec![false; node_count], depot_row],
        }
    }

    /// Builds a partition from member lists, numbering clusters from `1` in
    /// list order.
    ///
    /// # Errors
    /// Returns [`PartitionError::EmptyCluster`] for an empty member list and
    /// [`PartitionError::NodeOutOfRange`] for ids outside `0..node_count`.
    pub fn from_clusters(
        node_count: usize,
        clusters: impl IntoIterator<Item = Vec<usize>>,
    ) -> Result<Self, PartitionError> {
        let mut partition = Self::new(node_count);
        for members in clusters {
            partition.push(members)?;
        }
        Ok(partition)
    }

    /// Builds a partition over the depot and `customer_count` customers where
    /// cluster `1` is the depot singleton and the customer clusters follow.
    ///
    /// # Errors
    /// Same conditions as [`Self::from_clusters`].
    pub fn with_depot(
        customer_count: usize,
        customer_clusters: impl IntoIterator<Item = Vec<usize>>,
    ) -> Result<Self, PartitionError> {
        Self::from_clusters(
            customer_count + 1,
            std::iter::once(vec![0]).chain(customer_clusters),
        )
    }

    /// Appends a cluster and extends the relation tables.
    ///
    /// Members are sorted and deduplicated.
    ///
    /// # Errors
    /// Returns [`PartitionError::EmptyCluster`] for an empty member list and
    /// [`PartitionError::NodeOutOfRange`] for ids outside `0..node_count`.
    pub fn push(&mut self, members: Vec<usize>) -> Result<ClusterId, PartitionError> {
        let members = self.normalise(members, self.clusters.len())?;
        Ok(self.push_normalised(members))
    }

    /// Appends every candidate whose member set is not already present,
    /// comparing sorted member lists. Returns the number appended.
    ///
    /// Every candidate is checked before any is appended, so on error the
    /// partition is unchanged.
    ///
    /// # Errors
    /// Same conditions as [`Self::push`]. The position in
    /// [`PartitionError::EmptyCluster`] is the candidate's index.
    pub fn append_unique(
        &mut self,
        candidates: impl IntoIterator<Item = Vec<usize>>,
    ) -> Result<usize, PartitionError> {
        let prepared = candidates
            .into_iter()
            .enumerate()
            .map(|(position, members)| self.normalise(members, position))
            .collect::<Result<Vec<_>, _>>()?;
        let mut added = 0;
        for members in prepared {
            if self.contains_members(&members) {
                continue;
            }
            self.push_normalised(members);
            added += 1;
        }
        Ok(added)
    }

    fn normalise(&self, mut members: Vec<usize>, position: usize) -> Result<Vec<usize>, PartitionError> {
        if members.is_empty() {
            return Err(PartitionError::EmptyCluster { position });
        }
        members.sort_unstable();
        members.dedup();
        if let Some(&node) = members.iter().find(|&&node| node >= self.node_count) {
            return Err(PartitionError::NodeOutOfRange {
                node,
                node_count: self.node_count,
            });
        }
        Ok(members)
    }

    /// Appends sorted, in-range members.
    fn push_normalised(&mut self, members: Vec<usize>) -> ClusterId {
        let id = ClusterId::new(self.clusters.len() + 1);
        let mut row = vec![false; self.node_count];
        for &node in &members {
            row[node] = true;
        }

        let mut disjoint_row = vec![true; id.get() + 1];
        disjoint_row[0] = false;
        disjoint_row[id.get()] = false;
        for existing in &self.clusters {
            let other = existing.id.get();
            let separate = !members.iter().any(|&node| self.membership[other][node]);
            disjoint_row[other] = separate;
            self.disjoint[other].push(separate);
        }
        self.disjoint.push(disjoint_row);
        self.membership.push(row);
        self.clusters.push(Cluster { id, members });
        id
    }

    /// Returns the number of nodes covered, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the clusters in id order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the number of clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns `true` when no cluster is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns the cluster with identifier `id`.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        id.get()
            .checked_sub(1)
            .and_then(|index| self.clusters.get(index))
    }

    /// Returns `true` when clusters `a` and `b` are distinct and share no
    /// member. Unknown ids are never disjoint.
    #[must_use]
    pub fn is_disjoint(&self, a: ClusterId, b: ClusterId) -> bool {
        self.disjoint
            .get(a.get())
            .and_then(|row| row.get(b.get()))
            .copied()
            .unwrap_or(false)
    }

    /// Returns `true` when `node` is a member of cluster `id`.
    #[must_use]
    pub fn contains(&self, id: ClusterId, node: usize) -> bool {
        self.membership
            .get(id.get())
            .and_then(|row| row.get(node))
            .copied()
            .unwrap_or(false)
    }

    /// Returns `true` when some cluster has exactly the sorted `members`.
    #[must_use]
    pub fn contains_members(&self, members: &[usize]) -> bool {
        self.clusters
            .iter()
            .any(|cluster| cluster.members.as_slice() == members)
    }

    /// Returns the id of the last cluster containing `node`.
    ///
    /// # Errors
    /// Returns [`PartitionError::NoClusters`] when the partition is empty,
    /// [`PartitionError::NodeOutOfRange`] for an unknown node and
    /// [`PartitionError::NodeUnassigned`] when no cluster holds the node.
    pub fn cluster_of(&self, node: usize) -> Result<ClusterId, PartitionError> {
        if self.clusters.is_empty() {
            return Err(PartitionError::NoClusters);
        }
        if node >= self.node_count {
            return Err(PartitionError::NodeOutOfRange {
                node,
                node_count: self.node_count,
            });
        }
        self.clusters
            .iter()
            .rev()
            .find(|cluster| self.contains(cluster.id, node))
            .map(Cluster::id)
            .ok_or(PartitionError::NodeUnassigned { node })
    }

    /// Returns `true` when every node belongs to at least one cluster.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        (0..self.node_count).all(|node| {
            self.membership
                .iter()
                .any(|row| row.get(node).copied().unwrap_or(false))
        })
    }
}

impl fmt::Display for ClusterPartition {
    /// Renders one `C<id> n1 n2 ...` line per cluster.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cluster in &self.clusters {
            write!(f, "C{}", cluster.id)?;
            for node in &cluster.members {
                write!(f, " {node}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
